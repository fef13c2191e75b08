//! Configuration loaded from an optional TOML file.
//!
//! Every key is optional; the defaults reproduce the fixed catalog request
//! (`limit=101&skip=0` with the six-field projection) and the five minute
//! freshness window.
//!
//! ```toml
//! endpoint = "https://dummyjson.com/products"
//! stale_after_secs = 600
//! thumbnails = false
//! log_file = "/tmp/storefront.log"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://dummyjson.com/products";
pub const DEFAULT_PLACEHOLDER_URL: &str =
    "https://placehold.co/400x300/e2e8f0/4a5568/png?text=No+Image";
pub const DEFAULT_FIELDS: &[&str] = &[
    "title",
    "description",
    "price",
    "brand",
    "category",
    "thumbnail",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorefrontConfig {
    /// Product listing endpoint. The listing parameters are appended to
    /// any query string it already has.
    pub endpoint: String,
    /// Page size requested from the API.
    pub limit: u32,
    /// Offset requested from the API.
    pub skip: u32,
    /// Field projection sent as `select=`.
    pub fields: Vec<String>,
    /// Freshness window in seconds.
    pub stale_after_secs: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Download and draw card thumbnails.
    pub thumbnails: bool,
    /// Image used once when a card's own thumbnail fails.
    pub placeholder_url: String,
    /// Upper bound on concurrent thumbnail downloads.
    pub max_image_downloads: usize,
    /// Redraw rate cap.
    pub fps: u32,
    /// `tracing` filter directive, e.g. `"debug"` or `"storefront=trace"`.
    pub log_level: Option<String>,
    /// Log destination. Logging is off when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            limit: 101,
            skip: 0,
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            stale_after_secs: 300,
            request_timeout_secs: 15,
            thumbnails: true,
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            max_image_downloads: 6,
            fps: 30,
            log_level: None,
            log_file: None,
        }
    }
}

impl StorefrontConfig {
    /// Load from `explicit` if given, otherwise from the default location
    /// if that file exists, otherwise return the defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/storefront/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("storefront").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        if self.limit == 0 {
            return Err(ConfigError::Invalid("limit must be greater than 0".into()));
        }
        if self.max_image_downloads == 0 {
            return Err(ConfigError::Invalid(
                "max_image_downloads must be greater than 0".into(),
            ));
        }
        if !(1..=120).contains(&self.fps) {
            return Err(ConfigError::Invalid(format!(
                "fps must be between 1 and 120, got {}",
                self.fps
            )));
        }
        Ok(())
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Query parameters for the listing request, in wire order.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("skip", self.skip.to_string()),
            ("select", self.fields.join(",")),
        ]
    }
}
