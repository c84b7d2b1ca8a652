use axum::{
  extract::{Query, State},
  Json,
};
use serde::{Deserialize, Serialize};

use crate::{
  inspector::inspect,
  selector::{narrow, Mode, SelectionOption},
  util::required,
  AppState, Result,
};

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
  url: Option<String>,
  mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
  title: String,
  thumbnail: String,
  duration: String,
  author: String,
  options: Vec<SelectionOption>,
}

pub async fn get_info(
  State(state): State<AppState>,
  Query(query): Query<InfoQuery>,
) -> Result<Json<InfoResponse>> {
  let url = query.url.clone();

  describe(&state, query).await.map(Json).map_err(|err| {
    err.log_failure(url.as_deref(), None);
    err
  })
}

async fn describe(state: &AppState, query: InfoQuery) -> Result<InfoResponse> {
  let url = required(query.url, "url")?;
  let mode = query.mode.as_deref().map(str::parse::<Mode>).transpose()?;

  let (_source, summary) = inspect(state.source.as_ref(), &url).await?;

  let options = match mode {
    Some(mode) => narrow(&summary, mode),
    None => {
      let mut options = narrow(&summary, Mode::Video);
      options.extend(narrow(&summary, Mode::Audio));
      options
    }
  };

  Ok(InfoResponse {
    title: summary.title,
    thumbnail: summary.thumbnail,
    duration: summary.duration,
    author: summary.author,
    options,
  })
}
