//! Configuration file loading with precedence handling.

use crate::cell::MonospaceMeasurer;
use crate::listing::ListingSettings;
use crate::model::Size;
use crate::view_state::{HeightFormula, DEFAULT_ROW_HEIGHT, DEFAULT_TITLE_SPACING};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CAMPAIGN_BROWSER_CONFIG";

/// Environment variable overriding the viewport width.
pub const VIEWPORT_WIDTH_ENV: &str = "CAMPAIGN_BROWSER_VIEWPORT_WIDTH";

const APP_DIR: &str = "campaign-browser";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/campaign-browser/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Viewport width in points.
    #[serde(default)]
    pub viewport_width: Option<f64>,

    /// Viewport height in points.
    #[serde(default)]
    pub viewport_height: Option<f64>,

    /// Height of rows that have not finished measuring.
    #[serde(default)]
    pub default_row_height: Option<f64>,

    /// Constant added to every combined row height.
    #[serde(default)]
    pub title_spacing: Option<f64>,

    /// Advance of one glyph for text measurement.
    #[serde(default)]
    pub glyph_width: Option<f64>,

    /// Height of one text line for text measurement.
    #[serde(default)]
    pub line_height: Option<f64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Viewport width.
    pub viewport_width: f64,
    /// Viewport height.
    pub viewport_height: f64,
    /// Default row height.
    pub default_row_height: f64,
    /// Title spacing.
    pub title_spacing: f64,
    /// Glyph advance.
    pub glyph_width: f64,
    /// Line height.
    pub line_height: f64,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        let measurer = MonospaceMeasurer::default();
        Self {
            viewport_width: 375.0,
            viewport_height: 667.0,
            default_row_height: DEFAULT_ROW_HEIGHT,
            title_spacing: DEFAULT_TITLE_SPACING,
            glyph_width: measurer.glyph_width,
            line_height: measurer.line_height,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Viewport as a size.
    pub fn viewport(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }

    /// Height pipeline settings.
    pub fn listing_settings(&self) -> ListingSettings {
        ListingSettings {
            formula: HeightFormula::with_spacing(self.title_spacing),
            default_row_height: self.default_row_height,
        }
    }

    /// Text measurer for campaign cells.
    pub fn measurer(&self) -> MonospaceMeasurer {
        MonospaceMeasurer::new(self.glyph_width, self.line_height)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/campaign-browser/campaign-browser.log` on
/// Unix-like systems, or the platform equivalent.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join(APP_DIR).join("campaign-browser.log")
    } else {
        PathBuf::from("campaign-browser.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/campaign-browser/config.toml` on Unix, appropriate path
/// on other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CAMPAIGN_BROWSER_CONFIG` environment variable
/// 3. Default path `~/.config/campaign-browser/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPath` if the environment variable is not
/// valid Unicode, and read/parse errors for an existing file.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    match std::env::var(CONFIG_PATH_ENV) {
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()))
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for `CAMPAIGN_BROWSER_VIEWPORT_WIDTH`. A value that is not a
/// positive number is ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(VIEWPORT_WIDTH_ENV) {
        match raw.trim().parse::<f64>() {
            Ok(width) => {
                config.viewport_width = positive_or(VIEWPORT_WIDTH_ENV, width, config.viewport_width)
            }
            Err(_) => tracing::warn!(value = %raw, "ignoring invalid {VIEWPORT_WIDTH_ENV}"),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
/// Sizes must be positive and finite, spacing finite and non-negative; an
/// out-of-range value is ignored with a warning.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let positive = |name: &str, value: Option<f64>, fallback: f64| {
        value.map_or(fallback, |v| positive_or(name, v, fallback))
    };

    ResolvedConfig {
        viewport_width: positive("viewport_width", config.viewport_width, defaults.viewport_width),
        viewport_height: positive(
            "viewport_height",
            config.viewport_height,
            defaults.viewport_height,
        ),
        default_row_height: positive(
            "default_row_height",
            config.default_row_height,
            defaults.default_row_height,
        ),
        title_spacing: config.title_spacing.map_or(defaults.title_spacing, |spacing| {
            if spacing.is_finite() && spacing >= 0.0 {
                spacing
            } else {
                tracing::warn!(value = spacing, "ignoring invalid title_spacing");
                defaults.title_spacing
            }
        }),
        glyph_width: positive("glyph_width", config.glyph_width, defaults.glyph_width),
        line_height: positive("line_height", config.line_height, defaults.line_height),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only flags the user actually passed are applied; a non-positive size is
/// ignored with a warning.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
) -> ResolvedConfig {
    if let Some(width) = viewport_width {
        config.viewport_width = positive_or("--viewport-width", width, config.viewport_width);
    }

    if let Some(height) = viewport_height {
        config.viewport_height = positive_or("--viewport-height", height, config.viewport_height);
    }

    config
}

/// `value` if it is a positive finite number, else `fallback`.
fn positive_or(name: &str, value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(setting = name, value, "ignoring non-positive size");
        fallback
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
