//! Campaign feed: the JSON document the demo provider reads.
//!
//! ```json
//! [
//!   {
//!     "name": "Summer",
//!     "description": "Sun, sand and a long weekend.",
//!     "image": { "width": 400, "height": 300, "delay_ms": 120 }
//!   }
//! ]
//! ```
//!
//! A missing or `null` image means the image never arrives.

use crate::model::error::ProviderError;
use serde::Deserialize;
use std::path::Path;

/// One campaign as described by the feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedEntry {
    /// Campaign title.
    pub name: String,
    /// Campaign description.
    #[serde(default)]
    pub description: String,
    /// Mood image, if one will ever load.
    #[serde(default)]
    pub image: Option<FeedImage>,
}

/// Simulated mood image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedImage {
    /// Natural width in pixels.
    pub width: f64,
    /// Natural height in pixels.
    pub height: f64,
    /// Decode latency.
    #[serde(default)]
    pub delay_ms: u64,
    /// Where the image comes from; defaults to the campaign name.
    #[serde(default)]
    pub origin: Option<String>,
}

/// Read and parse the feed at `path`.
///
/// # Errors
///
/// Returns `ProviderError::Read` if the file cannot be read and
/// `ProviderError::Parse` if it is not a campaign list.
pub fn load_feed(path: &Path) -> Result<Vec<FeedEntry>, ProviderError> {
    let text = std::fs::read_to_string(path).map_err(|source| ProviderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_feed(&text, path)
}

/// Parse feed text; `path` is only used for error reporting.
///
/// # Errors
///
/// Returns `ProviderError::Parse` if `text` is not a campaign list.
pub fn parse_feed(text: &str, path: &Path) -> Result<Vec<FeedEntry>, ProviderError> {
    let entries: Vec<FeedEntry> =
        serde_json::from_str(text).map_err(|e| ProviderError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    tracing::debug!(path = %path.display(), count = entries.len(), "campaign feed parsed");
    Ok(entries)
}
