//! Builders and mock servers shared by the test modules.

use std::{
  net::SocketAddr,
  sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::Router;

use crate::{
  inspector::MetadataSource,
  media::{EncodingDescriptor, MediaSummary},
  source::SourceReference,
  Error, Result,
};

fn descriptor(id: &str, mime_type: &str) -> EncodingDescriptor {
  EncodingDescriptor {
    id: id.to_string(),
    url: format!("http://media.invalid/videoplayback?itag={id}"),
    mime_type: mime_type.to_string(),
    container: crate::media::container_from_mime(mime_type),
    quality_label: None,
    audio_quality: None,
    has_video: false,
    has_audio: false,
    is_muxed: false,
    audio_bitrate_kbps: None,
    approximate_size_bytes: None,
  }
}

pub fn video(id: &str, quality_label: &str) -> EncodingDescriptor {
  EncodingDescriptor {
    quality_label: Some(quality_label.to_string()),
    has_video: true,
    ..descriptor(id, "video/mp4; codecs=\"avc1.640028\"")
  }
}

pub fn muxed(id: &str, quality_label: &str) -> EncodingDescriptor {
  EncodingDescriptor {
    quality_label: Some(quality_label.to_string()),
    audio_quality: Some("low".to_string()),
    has_video: true,
    has_audio: true,
    is_muxed: true,
    ..descriptor(id, "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"")
  }
}

pub fn audio(id: &str, kbps: u32) -> EncodingDescriptor {
  EncodingDescriptor {
    audio_quality: Some("medium".to_string()),
    has_audio: true,
    audio_bitrate_kbps: Some(kbps),
    ..descriptor(id, "audio/webm; codecs=\"opus\"")
  }
}

pub fn summary_of(encodings: Vec<EncodingDescriptor>) -> MediaSummary {
  MediaSummary::new(
    "Test Video".to_string(),
    "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".to_string(),
    "00:03:33".to_string(),
    "Test Author".to_string(),
    encodings,
  )
}

/// Answers every fetch with the same summary, or the same upstream status.
pub struct FixtureSource {
  outcome: std::result::Result<MediaSummary, u16>,
  calls: AtomicUsize,
}

impl FixtureSource {
  pub fn new(summary: MediaSummary) -> Self {
    Self {
      outcome: Ok(summary),
      calls: AtomicUsize::new(0),
    }
  }

  pub fn failing(status: u16) -> Self {
    Self {
      outcome: Err(status),
      calls: AtomicUsize::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl MetadataSource for FixtureSource {
  async fn fetch(&self, _source: &SourceReference) -> Result<MediaSummary> {
    self.calls.fetch_add(1, Ordering::SeqCst);

    match &self.outcome {
      Ok(summary) => Ok(summary.clone()),
      Err(status) => Err(Error::Upstream {
        status: *status,
        message: "fixture failure".to_string(),
      }),
    }
  }
}

/// Serve `app` on an ephemeral local port.
pub fn spawn(app: Router) -> SocketAddr {
  let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
    .serve(app.into_make_service());
  let addr = server.local_addr();
  tokio::spawn(server);
  addr
}

pub const PLAYER_RESPONSE: &str = r#"{
  "playabilityStatus": {"status": "OK"},
  "videoDetails": {
    "videoId": "dQw4w9WgXcQ",
    "title": "Never Gonna Give You Up",
    "author": "Rick Astley",
    "lengthSeconds": "213",
    "thumbnail": {
      "thumbnails": [
        {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg", "width": 120, "height": 90},
        {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg", "width": 1920, "height": 1080},
        {"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg", "width": 480, "height": 360}
      ]
    }
  },
  "streamingData": {
    "formats": [
      {
        "itag": 18,
        "url": "https://rr1.googlevideo.com/videoplayback?itag=18",
        "mimeType": "video/mp4; codecs=\"avc1.42001E, mp4a.40.2\"",
        "bitrate": 503000,
        "width": 640,
        "height": 360,
        "qualityLabel": "360p",
        "audioQuality": "AUDIO_QUALITY_LOW",
        "audioSampleRate": "44100",
        "contentLength": "13000000"
      }
    ],
    "adaptiveFormats": [
      {
        "itag": 137,
        "url": "https://rr1.googlevideo.com/videoplayback?itag=137",
        "mimeType": "video/mp4; codecs=\"avc1.640028\"",
        "bitrate": 4400000,
        "width": 1920,
        "height": 1080,
        "qualityLabel": "1080p",
        "contentLength": "80000000"
      },
      {
        "itag": 248,
        "signatureCipher": "s=AAA&sp=sig&url=https%3A%2F%2Frr1.googlevideo.com",
        "mimeType": "video/webm; codecs=\"vp9\"",
        "bitrate": 2600000,
        "width": 1920,
        "height": 1080,
        "qualityLabel": "1080p"
      },
      {
        "itag": 140,
        "url": "https://rr1.googlevideo.com/videoplayback?itag=140",
        "mimeType": "audio/mp4; codecs=\"mp4a.40.2\"",
        "bitrate": 130000,
        "averageBitrate": 129000,
        "audioQuality": "AUDIO_QUALITY_MEDIUM",
        "audioSampleRate": "44100",
        "contentLength": "3400000"
      },
      {
        "itag": 251,
        "url": "https://rr1.googlevideo.com/videoplayback?itag=251",
        "mimeType": "audio/webm; codecs=\"opus\"",
        "bitrate": 150000,
        "averageBitrate": 140600,
        "audioQuality": "AUDIO_QUALITY_MEDIUM",
        "audioSampleRate": "48000",
        "contentLength": "3600000"
      },
      {
        "itag": 999,
        "url": "https://rr1.googlevideo.com/videoplayback?itag=999",
        "mimeType": "video/mp4; codecs=\"avc1.4d401f, mp4a.40.2\"",
        "bitrate": 900000,
        "width": 1280,
        "height": 720,
        "qualityLabel": "720p",
        "audioQuality": "AUDIO_QUALITY_LOW"
      }
    ]
  }
}"#;
