//! Error types for the campaign browser.
//!
//! The height pipeline itself has no error channel: every measurement source
//! either eventually emits or never emits, and a row that never completes
//! keeps the default height. Errors exist only at the edges, where the binary
//! reads its configuration and campaign feed and sets up logging.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`ProviderError`] - Campaign feed read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// Every variant is fatal for the binary: it reports the error and exits.
/// `From` conversions let `main` compose the fallible steps with `?`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration file exists but could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The campaign feed could not be loaded.
    #[error("Campaign feed error: {0}")]
    Provider(#[from] ProviderError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

/// Errors from the campaign data provider.
///
/// The provider is read once, before the listing leaves its loading state.
/// A failure here means the listing never leaves that state.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use campaign_browser::model::error::ProviderError;
///
/// let err = ProviderError::Parse {
///     path: PathBuf::from("/tmp/feed.json"),
///     reason: "expected `[`".to_string(),
/// };
/// assert!(err.to_string().contains("/tmp/feed.json"));
/// ```
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The feed file could not be read.
    #[error("Failed to read campaign feed at {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The feed is not a valid campaign list.
    #[error("Invalid campaign feed in {path}: {reason}")]
    Parse {
        /// Path with the invalid feed.
        path: PathBuf,
        /// Parser error details.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_read_error_mentions_path_and_cause() {
        let err = ProviderError::Read {
            path: PathBuf::from("/missing/feed.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/missing/feed.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn app_error_wraps_provider_error() {
        let err: AppError = ProviderError::Parse {
            path: PathBuf::from("feed.json"),
            reason: "trailing comma".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Provider(_)));
        assert!(err.to_string().starts_with("Campaign feed error"));
    }

    #[test]
    fn app_error_wraps_config_error() {
        let err: AppError = ConfigError::InvalidPath("??".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
    }
}
