use std::{net::SocketAddr, str::FromStr, time::Duration};

pub const DEFAULT_INNERTUBE_BASE_URL: &str = "https://www.youtube.com";

#[derive(Clone, Debug)]
pub struct Config {
  pub bind_addr: SocketAddr,
  pub innertube_base_url: String,
  // the metadata fetch has no natural end, the media fetch does
  pub metadata_timeout: Duration,
  pub connect_timeout: Duration,
  pub cookie: Option<String>,
}

impl Config {
  pub fn from_env() -> Self {
    let default = Self::default();

    Self {
      bind_addr: env_parse("BIND_ADDR").unwrap_or(default.bind_addr),
      innertube_base_url: std::env::var("INNERTUBE_BASE_URL")
        .unwrap_or(default.innertube_base_url),
      metadata_timeout: env_parse("METADATA_TIMEOUT_SECS")
        .map(Duration::from_secs)
        .unwrap_or(default.metadata_timeout),
      connect_timeout: env_parse("UPSTREAM_CONNECT_TIMEOUT_SECS")
        .map(Duration::from_secs)
        .unwrap_or(default.connect_timeout),
      cookie: std::env::var("YT_COOKIE").ok().filter(|s| !s.is_empty()),
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
      innertube_base_url: DEFAULT_INNERTUBE_BASE_URL.to_string(),
      metadata_timeout: Duration::from_secs(20),
      connect_timeout: Duration::from_secs(10),
      cookie: None,
    }
  }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
  std::env::var(key).ok().and_then(|s| s.parse::<T>().ok())
}
