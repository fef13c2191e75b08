//! Error types for the catalog crate.
//!
//! Each failure domain gets its own enum so the app can route them
//! differently: [`FetchError`] becomes the page-level error banner,
//! [`ImageLoadError`] stays inside a single card, [`ConfigError`] aborts
//! startup.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of the product listing request.
///
/// The `Display` output is shown to the user verbatim in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success HTTP status.
    #[error("Network response was not ok (HTTP {status})")]
    Network {
        /// The HTTP status code received.
        status: u16,
    },

    /// The request never produced a response (connection refused, DNS,
    /// timeout).
    #[error("Network request failed: {0}")]
    Transport(String),

    /// The body was not well-formed JSON of the expected shape.
    #[error("Could not parse product data: {0}")]
    Parse(String),
}

/// Failure to load a single card thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageLoadError {
    /// The image server answered with a non-success HTTP status.
    #[error("image request returned HTTP {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("image request failed: {0}")]
    Transport(String),

    /// The body could not be decoded as an image.
    #[error("image could not be decoded: {0}")]
    Decode(String),
}

/// Failure to load or validate the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("could not read config file {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`StorefrontConfig`](crate::StorefrontConfig).
    #[error("could not parse config file {path}: {source}")]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
