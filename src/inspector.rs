mod innertube;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{media::MediaSummary, source::SourceReference, Error, Result};

pub use innertube::InnerTube;

#[async_trait]
pub trait MetadataSource {
  // one provider round trip per call, nothing cached
  async fn fetch(&self, source: &SourceReference) -> Result<MediaSummary>;
}

/// Validate `raw_url` and fetch fresh metadata for it.
///
/// Malformed urls fail before any network call. A video without a single
/// usable encoding is reported as not found.
pub async fn inspect(
  provider: &(dyn MetadataSource + Send + Sync),
  raw_url: &str,
) -> Result<(SourceReference, MediaSummary)> {
  let source = SourceReference::parse(raw_url)?;

  let summary = provider.fetch(&source).await.map_err(|err| {
    warn!(url = %source, error = %err, "metadata fetch failed");
    err
  })?;

  if summary.encodings().is_empty() {
    warn!(url = %source, "no usable encodings");
    return Err(Error::NotFound("No video info available".into()));
  }

  info!(
    url = %source,
    encodings = summary.encodings().len(),
    "fetched video metadata"
  );

  Ok((source, summary))
}
