//! Download filenames and the `Content-Disposition` header carrying them.

/// `<sanitized title>.<container>` for a media download.
pub fn media_filename(title: &str, container: &str) -> String {
  format!("{}.{container}", sanitize_title(title))
}

/// `<ascii title>.<ext>` for a thumbnail download.
pub fn thumbnail_filename(title: Option<&str>, content_type: &str) -> String {
  let title = title
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .unwrap_or("thumbnail");

  format!(
    "{}.{}",
    sanitize_ascii(title),
    extension_from_content_type(content_type)
  )
}

// strip what common filesystems reject, keep everything else verbatim
pub fn sanitize_title(title: &str) -> String {
  let sanitized: String = title
    .chars()
    .filter(|c| {
      !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        && !c.is_control()
    })
    .collect();

  let sanitized = sanitized.trim();
  if sanitized.is_empty() {
    return "video".to_string();
  }
  sanitized.to_string()
}

pub fn sanitize_ascii(title: &str) -> String {
  title
    .chars()
    .map(|c| match c {
      c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
      _ => '_',
    })
    .collect()
}

pub fn extension_from_content_type(content_type: &str) -> &'static str {
  let content_type = content_type.to_lowercase();
  if content_type.contains("webp") {
    "webp"
  } else if content_type.contains("png") {
    "png"
  } else {
    "jpg"
  }
}

/// `attachment` disposition with an ASCII fallback and the exact name
/// percent-encoded per RFC 5987.
pub fn content_disposition(filename: &str) -> String {
  let fallback: String = filename
    .chars()
    .map(|c| match c {
      ' '..='~' if c != '"' && c != '\\' => c,
      _ => '_',
    })
    .collect();

  format!(
    "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
    urlencoding::encode(filename)
  )
}
