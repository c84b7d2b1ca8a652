use axum::{
  extract::{Query, State},
  http::header,
  response::Response,
};
use http_types::Url;
use serde::Deserialize;
use tracing::warn;

use crate::{
  proxy, util::filename::thumbnail_filename, util::required, AppState, Error,
  Result,
};

#[derive(Debug, Deserialize)]
pub struct ThumbnailQuery {
  url: Option<String>,
  title: Option<String>,
}

/// Fetch a single image and relay it as an attachment.
pub async fn relay_thumbnail(
  client: &reqwest::Client,
  url: &str,
  title_hint: Option<&str>,
) -> Result<Response> {
  let parsed: Url = url
    .parse()
    .map_err(|_| Error::InvalidInput("Invalid thumbnail URL".into()))?;
  if !matches!(parsed.scheme(), "http" | "https") {
    return Err(Error::InvalidInput("Invalid thumbnail URL".into()));
  }

  // whatever the image host answered, the client sees a bad gateway
  let upstream = proxy::open(client, url).await.map_err(|err| {
    warn!(
      url,
      upstream_status = err.upstream_status(),
      error = %err,
      "failed to fetch thumbnail"
    );
    match err {
      Error::Upstream { .. } => Error::Upstream {
        status: 502,
        message: "Thumbnail fetch failed".into(),
      },
      other => other,
    }
  })?;

  let content_type = upstream
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or("image/jpeg")
    .to_string();
  let filename = thumbnail_filename(title_hint, &content_type);

  let label = format!("thumbnail {filename}");
  proxy::respond(upstream, &content_type, &filename, label)
}

pub async fn download_thumbnail(
  State(state): State<AppState>,
  Query(query): Query<ThumbnailQuery>,
) -> Result<Response> {
  let url = query.url.clone();

  fetch_thumbnail(&state, query).await.map_err(|err| {
    err.log_failure(url.as_deref(), None);
    err
  })
}

async fn fetch_thumbnail(
  state: &AppState,
  query: ThumbnailQuery,
) -> Result<Response> {
  let url = required(query.url, "url")?;
  relay_thumbnail(&state.media, &url, query.title.as_deref()).await
}
