//! Turns a raw encoding list into client-facing options, and a chosen option
//! back into fetch targets.

use std::str::FromStr;

use itertools::Itertools;
use serde::Serialize;

use crate::{
  media::{EncodingDescriptor, MediaSummary},
  util::filename::media_filename,
  Error, Result,
};

pub const QUALITY_LADDER: &[&str] = &[
  "2160p", "1440p", "1080p", "720p", "480p", "360p", "240p", "144p",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Video,
  Audio,
}

impl FromStr for Mode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "video" => Ok(Mode::Video),
      "audio" => Ok(Mode::Audio),
      _ => Err(Error::InvalidInput(format!("Unknown mode: {s}"))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOption {
  pub id: String,
  pub label: String,
  #[serde(rename = "format")]
  pub format_hint: String,
  #[serde(rename = "quality")]
  pub quality_hint: String,
  #[serde(rename = "size", skip_serializing_if = "Option::is_none")]
  pub size_label: Option<String>,
  pub mime_type: String,
  pub has_video: bool,
  pub has_audio: bool,
  pub is_muxed: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub audio_bitrate: Option<u32>,
}

impl From<&EncodingDescriptor> for SelectionOption {
  fn from(d: &EncodingDescriptor) -> Self {
    // audio tracks are told apart by bitrate, video by resolution
    let detail = match (&d.quality_label, d.audio_bitrate_kbps) {
      (Some(label), _) => label.clone(),
      (None, Some(kbps)) => format!("{kbps}kbps"),
      (None, None) => d.audio_quality.clone().unwrap_or_default(),
    };

    Self {
      id: d.id.clone(),
      label: format!("{} {}", d.container.to_uppercase(), detail)
        .trim()
        .to_string(),
      format_hint: d.container.clone(),
      quality_hint: d
        .quality_label
        .clone()
        .or_else(|| d.audio_quality.clone())
        .unwrap_or_else(|| "Audio".to_string()),
      size_label: d.size_label(),
      mime_type: d.mime_type.clone(),
      has_video: d.has_video,
      has_audio: d.has_audio,
      is_muxed: d.is_muxed,
      audio_bitrate: d.audio_bitrate_kbps,
    }
  }
}

/// Narrow the encodings of `summary` down to the options offered for `mode`.
///
/// Audio options keep upstream order. Video options follow the quality
/// ladder with at most one option per tier, muxed encodings preferred.
pub fn narrow(summary: &MediaSummary, mode: Mode) -> Vec<SelectionOption> {
  match mode {
    Mode::Audio => summary
      .encodings()
      .iter()
      .filter(|d| d.is_audio_only())
      .unique_by(|d| d.id.clone())
      .map(SelectionOption::from)
      .collect(),
    Mode::Video => QUALITY_LADDER
      .iter()
      .filter_map(|tier| pick_for_tier(summary.encodings(), tier))
      .map(SelectionOption::from)
      .collect(),
  }
}

fn pick_for_tier<'a>(
  encodings: &'a [EncodingDescriptor],
  tier: &str,
) -> Option<&'a EncodingDescriptor> {
  let candidates = || {
    encodings.iter().filter(move |d| {
      d.has_video
        && d
          .quality_label
          .as_deref()
          .is_some_and(|label| label.starts_with(tier))
    })
  };

  candidates()
    .find(|d| d.is_muxed)
    .or_else(|| candidates().next())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
  pub primary: EncodingDescriptor,
  pub audio: Option<EncodingDescriptor>,
  pub filename: String,
}

/// Resolve the option chosen by the client into what has to be fetched.
pub fn resolve(summary: &MediaSummary, chosen_id: &str) -> Result<DownloadTarget> {
  let primary = summary
    .find(chosen_id)
    .ok_or_else(|| Error::NotFound(format!("Format {chosen_id} not found")))?;

  let audio = primary
    .is_video_only()
    .then(|| best_audio(summary.encodings()))
    .flatten();

  Ok(DownloadTarget {
    filename: media_filename(&summary.title, &primary.container),
    primary: primary.clone(),
    audio: audio.cloned(),
  })
}

// highest bitrate, first seen on ties
fn best_audio(encodings: &[EncodingDescriptor]) -> Option<&EncodingDescriptor> {
  encodings
    .iter()
    .filter(|d| d.is_audio_only())
    .fold(None, |best: Option<&EncodingDescriptor>, d| match best {
      Some(b) if b.audio_bitrate_kbps >= d.audio_bitrate_kbps => Some(b),
      _ => Some(d),
    })
}

impl DownloadTarget {
  /// Replace the automatic pairing with the audio track the client asked
  /// for. Only meaningful for a video-only primary.
  pub fn with_requested_audio(
    mut self,
    summary: &MediaSummary,
    audio_id: &str,
  ) -> Result<Self> {
    let audio = summary
      .find(audio_id)
      .filter(|d| d.is_audio_only())
      .ok_or_else(|| {
        Error::NotFound(format!("Audio format {audio_id} not found"))
      })?;

    if self.primary.is_video_only() {
      self.audio = Some(audio.clone());
    }

    Ok(self)
  }
}
