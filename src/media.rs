use tracing::debug;

/// One encoding advertised by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingDescriptor {
  pub id: String,
  pub url: String,
  pub mime_type: String,
  pub container: String,
  pub quality_label: Option<String>,
  pub audio_quality: Option<String>,
  pub has_video: bool,
  pub has_audio: bool,
  pub is_muxed: bool,
  pub audio_bitrate_kbps: Option<u32>,
  pub approximate_size_bytes: Option<u64>,
}

impl EncodingDescriptor {
  /// A descriptor is usable when it carries at least one track and its muxed
  /// flag agrees with its tracks.
  pub fn is_consistent(&self) -> bool {
    (self.has_video || self.has_audio)
      && self.is_muxed == (self.has_video && self.has_audio)
  }

  pub fn is_audio_only(&self) -> bool {
    self.has_audio && !self.has_video
  }

  pub fn is_video_only(&self) -> bool {
    self.has_video && !self.has_audio
  }

  pub fn size_label(&self) -> Option<String> {
    self
      .approximate_size_bytes
      .map(|bytes| format!("{:.1} MB", bytes as f64 / 1e6))
  }
}

#[derive(Clone, Debug)]
pub struct MediaSummary {
  pub title: String,
  pub thumbnail: String,
  pub duration: String,
  pub author: String,
  encodings: Vec<EncodingDescriptor>,
}

impl MediaSummary {
  pub fn new(
    title: String,
    thumbnail: String,
    duration: String,
    author: String,
    encodings: Vec<EncodingDescriptor>,
  ) -> Self {
    let encodings = encodings
      .into_iter()
      .filter(|d| {
        let keep = d.is_consistent();
        if !keep {
          debug!(itag = %d.id, "dropping encoding with inconsistent tracks");
        }
        keep
      })
      .collect();

    Self {
      title,
      thumbnail,
      duration,
      author,
      encodings,
    }
  }

  pub fn encodings(&self) -> &[EncodingDescriptor] {
    &self.encodings
  }

  pub fn find(&self, id: &str) -> Option<&EncodingDescriptor> {
    self.encodings.iter().find(|d| d.id == id)
  }
}

pub fn format_duration(seconds: u64) -> String {
  let hours = seconds / 3600;
  let minutes = (seconds % 3600) / 60;
  let seconds = seconds % 60;
  format!("{hours:02}:{minutes:02}:{seconds:02}")
}

// "video/mp4; codecs=..." -> "mp4"
pub fn container_from_mime(mime_type: &str) -> String {
  let essence = mime_type.split(';').next().unwrap_or_default().trim();
  match essence.split_once('/').map(|(_, sub)| sub) {
    Some("3gpp") => "3gp".to_string(),
    Some("x-flv") => "flv".to_string(),
    Some(sub) if !sub.is_empty() => sub.to_lowercase(),
    _ => "bin".to_string(),
  }
}
