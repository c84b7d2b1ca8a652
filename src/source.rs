use std::{fmt, sync::LazyLock};

use http_types::Url;
use regex::Regex;

use crate::{Error, Result};

const YOUTUBE_HOSTS: &[&str] = &[
  "youtube.com",
  "www.youtube.com",
  "m.youtube.com",
  "music.youtube.com",
];

// path shapes carrying the id as the second segment, e.g. /shorts/<id>
const ID_PATH_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

static VIDEO_ID_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceReference {
  video_id: String,
  url: String,
}

impl SourceReference {
  pub fn parse(raw: &str) -> Result<Self> {
    let raw = raw.trim();
    let url: Url = raw
      .parse()
      .map_err(|_| Error::InvalidInput("Invalid YouTube URL".into()))?;

    if !matches!(url.scheme(), "http" | "https") {
      return Err(Error::InvalidInput("Invalid YouTube URL".into()));
    }

    let video_id = match url.host_str() {
      Some("youtu.be") => url
        .path_segments()
        .and_then(|mut segs| segs.next())
        .map(str::to_owned),
      Some(host) if YOUTUBE_HOSTS.contains(&host) => id_from_youtube_url(&url),
      _ => None,
    };

    video_id
      .filter(|id| VIDEO_ID_REGEX.is_match(id))
      .map(Self::from_video_id)
      .ok_or_else(|| Error::InvalidInput("Invalid YouTube URL".into()))
  }

  fn from_video_id(video_id: String) -> Self {
    let url = format!("https://www.youtube.com/watch?v={video_id}");
    Self { video_id, url }
  }

  pub fn video_id(&self) -> &str {
    &self.video_id
  }
}

impl fmt::Display for SourceReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.url)
  }
}

fn id_from_youtube_url(url: &Url) -> Option<String> {
  let segs: Vec<_> = url.path_segments()?.take(2).collect();

  match segs.as_slice() {
    ["watch", ..] => url
      .query_pairs()
      .find_map(|(k, v)| (k == "v").then(|| v.into_owned())),
    [prefix, id] if ID_PATH_PREFIXES.contains(prefix) => Some(id.to_string()),
    _ => None,
  }
}
