use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{middleware, response::IntoResponse, routing::get, Router};
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};
use tracing::info;

mod classify;
mod config;
mod cors;
mod download;
mod error;
mod info;
mod inspector;
mod media;
mod proxy;
mod selector;
mod source;
mod thumbnail;
mod util;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};

use config::Config;
use inspector::{InnerTube, MetadataSource};

#[derive(Clone)]
pub struct AppState {
  source: Arc<dyn MetadataSource + Send + Sync>,
  // media and thumbnail fetches
  media: reqwest::Client,
}

impl AppState {
  fn from_config(config: &Config) -> Result<Self> {
    Ok(Self {
      source: Arc::new(InnerTube::new(config)?),
      media: media_client(config)?,
    })
  }
}

// no total timeout, a long download must not be cut off
fn media_client(config: &Config) -> Result<reqwest::Client> {
  let client = reqwest::Client::builder()
    .connect_timeout(config.connect_timeout)
    .pool_max_idle_per_host(0)
    .build()?;
  Ok(client)
}

fn router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/info", get(info::get_info))
    .route("/download", get(download::download))
    .route("/downloadThumbnail", get(thumbnail::download_thumbnail))
    .with_state(state)
    .layer(middleware::from_fn(cors::open_cors))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let config = Config::from_env();
  let state = AppState::from_config(&config)?;
  let addr = config.bind_addr;

  Toplevel::new(move |s| async move {
    s.start(SubsystemBuilder::new("http", move |subsys| {
      serve(subsys, addr, state)
    }));
  })
  .catch_signals()
  .handle_shutdown_requests(Duration::from_secs(10))
  .await
  .map_err(Into::into)
}

async fn serve(
  subsys: SubsystemHandle,
  addr: SocketAddr,
  state: AppState,
) -> anyhow::Result<()> {
  let server = axum::Server::try_bind(&addr)?
    .serve(router(state).into_make_service());

  info!("Listening on {}", server.local_addr());

  server
    .with_graceful_shutdown(subsys.on_shutdown_requested())
    .await?;

  Ok(())
}

async fn health() -> impl IntoResponse {
  "ok".to_owned()
}
