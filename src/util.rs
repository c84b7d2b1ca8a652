pub mod filename;
mod relay_stream;

pub use relay_stream::RelayStream;

use crate::{Error, Result};

// a blank value counts as missing
pub fn required(value: Option<String>, name: &str) -> Result<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
    .ok_or_else(|| Error::InvalidInput(format!("Missing parameter: {name}")))
}
