use axum::{
  extract::{Query, State},
  response::Response,
};
use serde::Deserialize;

use crate::{
  inspector::inspect, proxy, selector::resolve, util::required, AppState,
  Result,
};

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
  url: Option<String>,
  itag: Option<String>,
  title: Option<String>,
  #[serde(rename = "audioItag")]
  audio_itag: Option<String>,
}

pub async fn download(
  State(state): State<AppState>,
  Query(query): Query<DownloadQuery>,
) -> Result<Response> {
  let url = query.url.clone();
  let itag = query.itag.clone();

  start_download(&state, query).await.map_err(|err| {
    err.log_failure(url.as_deref(), itag.as_deref());
    err
  })
}

async fn start_download(
  state: &AppState,
  query: DownloadQuery,
) -> Result<Response> {
  let url = required(query.url, "url")?;
  let itag = required(query.itag, "itag")?;

  let (source, mut summary) = inspect(state.source.as_ref(), &url).await?;

  if summary.title.trim().is_empty() {
    if let Some(title) = query.title {
      summary.title = title;
    }
  }

  let mut target = resolve(&summary, &itag)?;

  if let Some(audio_itag) = query.audio_itag.filter(|s| !s.is_empty()) {
    target = target.with_requested_audio(&summary, &audio_itag)?;
  }

  proxy::relay(&state.media, &source, &target).await
}
