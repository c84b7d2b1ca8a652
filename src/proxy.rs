use axum::{
  body::{boxed, StreamBody},
  http::{header, StatusCode},
  response::Response,
};
use futures::StreamExt;
use tracing::{info, warn};

use crate::{
  selector::DownloadTarget, source::SourceReference,
  util::filename::content_disposition, util::RelayStream, Error, Result,
};

/// Open a single upstream GET. Anything but a success status is an error,
/// reported before a single header went out to the client.
pub async fn open(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
  let resp = client.get(url).send().await?;

  let status = resp.status();
  if !status.is_success() {
    return Err(Error::Upstream {
      status: status.as_u16(),
      message: status.canonical_reason().unwrap_or("error").to_string(),
    });
  }

  Ok(resp)
}

/// Turn an opened upstream response into the client response, streaming the
/// body through as it arrives.
pub fn respond(
  upstream: reqwest::Response,
  content_type: &str,
  filename: &str,
  label: String,
) -> Result<Response> {
  let mut builder = Response::builder()
    .status(StatusCode::OK)
    .header(header::CONTENT_TYPE, content_type)
    .header(header::CONTENT_DISPOSITION, content_disposition(filename));

  if let Some(len) = upstream.content_length() {
    builder = builder.header(header::CONTENT_LENGTH, len);
  }

  let stream = RelayStream::new(upstream.bytes_stream().boxed(), label);
  Ok(builder.body(boxed(StreamBody::new(stream)))?)
}

/// Relay the primary encoding of `target` to the client.
pub async fn relay(
  client: &reqwest::Client,
  source: &SourceReference,
  target: &DownloadTarget,
) -> Result<Response> {
  let primary = &target.primary;

  if let Some(audio) = &target.audio {
    info!(
      url = %source,
      itag = %primary.id,
      audio_itag = %audio.id,
      "video-only encoding delivered without its audio track"
    );
  }

  let upstream = open(client, &primary.url).await.map_err(|err| {
    warn!(
      url = %source,
      itag = %primary.id,
      upstream_status = err.upstream_status(),
      error = %err,
      "failed to open upstream"
    );
    err
  })?;

  info!(
    url = %source,
    itag = %primary.id,
    filename = %target.filename,
    bytes = upstream.content_length(),
    "relaying media"
  );

  respond(
    upstream,
    &primary.mime_type,
    &target.filename,
    format!("{} itag {}", source.video_id(), primary.id),
  )
}
