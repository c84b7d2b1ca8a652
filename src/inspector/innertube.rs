use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use tracing::debug;

use crate::{
  config::Config,
  media::{container_from_mime, format_duration, EncodingDescriptor, MediaSummary},
  source::SourceReference,
  Error, Result,
};

use super::MetadataSource;

// the android client hands out direct media urls, no signature deciphering
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_NAME_ID: &str = "3";
const CLIENT_VERSION: &str = "19.44.38";
const ANDROID_SDK_VERSION: u32 = 34;
const USER_AGENT: &str = "com.google.android.youtube/19.44.38 (Linux; U; Android 14; en_US; Pixel 8) gzip";

// fetch metadata from the innertube player endpoint
pub struct InnerTube {
  client: reqwest::Client,
  base_url: String,
  timeout: Duration,
  cookie: Option<String>,
}

impl InnerTube {
  pub fn new(config: &Config) -> Result<Self> {
    let client = reqwest::Client::builder()
      .connect_timeout(config.connect_timeout)
      .build()?;

    Ok(Self {
      client,
      base_url: config.innertube_base_url.trim_end_matches('/').to_string(),
      timeout: config.metadata_timeout,
      cookie: config.cookie.clone(),
    })
  }

  fn player_url(&self) -> String {
    format!("{}/youtubei/v1/player?prettyPrint=false", self.base_url)
  }
}

#[async_trait]
impl MetadataSource for InnerTube {
  async fn fetch(&self, source: &SourceReference) -> Result<MediaSummary> {
    let body = serde_json::json!({
      "context": {
        "client": {
          "clientName": CLIENT_NAME,
          "clientVersion": CLIENT_VERSION,
          "androidSdkVersion": ANDROID_SDK_VERSION,
          "osName": "Android",
          "osVersion": "14",
          "hl": "en",
          "gl": "US",
          "userAgent": USER_AGENT,
        }
      },
      "videoId": source.video_id(),
      "contentCheckOk": true,
      "racyCheckOk": true,
    });

    let mut request = self
      .client
      .post(self.player_url())
      .timeout(self.timeout)
      .header(header::USER_AGENT, USER_AGENT)
      .header("X-YouTube-Client-Name", CLIENT_NAME_ID)
      .header("X-YouTube-Client-Version", CLIENT_VERSION)
      .json(&body);

    if let Some(cookie) = &self.cookie {
      request = request.header(header::COOKIE, cookie);
    }

    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Upstream {
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or("error").to_string(),
      });
    }

    let player = resp.json::<PlayerResponse>().await?;
    player.into_summary()
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
  playability_status: Option<PlayabilityStatus>,
  video_details: Option<VideoDetails>,
  streaming_data: Option<StreamingData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
  status: String,
  reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VideoDetails {
  title: String,
  author: String,
  length_seconds: String,
  thumbnail: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
  thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
  url: String,
  #[serde(default)]
  width: u32,
  #[serde(default)]
  height: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StreamingData {
  formats: Vec<Format>,
  adaptive_formats: Vec<Format>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Format {
  itag: u32,
  url: Option<String>,
  mime_type: String,
  bitrate: Option<u64>,
  average_bitrate: Option<u64>,
  width: Option<u32>,
  quality_label: Option<String>,
  audio_quality: Option<String>,
  audio_sample_rate: Option<String>,
  content_length: Option<String>,
}

impl PlayerResponse {
  fn into_summary(self) -> Result<MediaSummary> {
    if let Some(playability) = &self.playability_status {
      playability.check()?;
    }

    let details = self
      .video_details
      .ok_or_else(|| Error::NotFound("No video info available".into()))?;
    let streaming = self.streaming_data.unwrap_or_default();

    // progressive formats are declared muxed, adaptive ones are not
    let encodings = streaming
      .formats
      .into_iter()
      .map(|f| (f, true))
      .chain(streaming.adaptive_formats.into_iter().map(|f| (f, false)))
      .filter_map(|(f, declared_muxed)| f.into_descriptor(declared_muxed))
      .collect();

    let thumbnail = details
      .thumbnail
      .thumbnails
      .into_iter()
      .max_by_key(|t| u64::from(t.width) * u64::from(t.height))
      .map(|t| t.url)
      .unwrap_or_default();

    let duration = format_duration(details.length_seconds.parse().unwrap_or(0));

    Ok(MediaSummary::new(
      details.title,
      thumbnail,
      duration,
      details.author,
      encodings,
    ))
  }
}

impl PlayabilityStatus {
  fn check(&self) -> Result<()> {
    let reason = || {
      self
        .reason
        .clone()
        .unwrap_or_else(|| "Video unavailable".to_string())
    };

    match self.status.as_str() {
      "OK" => Ok(()),
      "LOGIN_REQUIRED" => Err(Error::Upstream {
        status: 403,
        message: reason(),
      }),
      _ => Err(Error::NotFound(reason())),
    }
  }
}

impl Format {
  fn into_descriptor(self, declared_muxed: bool) -> Option<EncodingDescriptor> {
    let Some(url) = self.url else {
      debug!(itag = self.itag, "skipping ciphered encoding");
      return None;
    };

    let has_video = self.mime_type.starts_with("video/")
      && (self.quality_label.is_some() || self.width.is_some());
    let has_audio = self.mime_type.starts_with("audio/")
      || self.audio_quality.is_some()
      || self.audio_sample_rate.is_some();

    let audio_bitrate_kbps = (has_audio && !has_video)
      .then_some(self.average_bitrate.or(self.bitrate))
      .flatten()
      .and_then(|bps| u32::try_from((bps + 500) / 1000).ok());

    let audio_quality = self.audio_quality.map(|q| {
      q.strip_prefix("AUDIO_QUALITY_")
        .unwrap_or(&q)
        .to_lowercase()
    });

    Some(EncodingDescriptor {
      id: self.itag.to_string(),
      url,
      container: container_from_mime(&self.mime_type),
      mime_type: self.mime_type,
      quality_label: self.quality_label,
      audio_quality,
      has_video,
      has_audio,
      is_muxed: declared_muxed,
      audio_bitrate_kbps,
      approximate_size_bytes: self
        .content_length
        .and_then(|len| len.parse().ok()),
    })
  }
}
