//! Error types for the Harvest fetch pipeline.
//!
//! Per-URL errors are organized by stage (download, quality, storage) and
//! always carry the source URL so a skipped candidate can be traced in logs.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Harvest operations.
///
/// Per-URL and discovery failures never surface here; they are logged and
/// counted in the outcome instead.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while producing candidate URLs.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The URL source could not be read
    #[error("Failed to read URL source {source_name}: {message}")]
    Source {
        source_name: String,
        message: String,
    },

    /// The backing search service failed
    #[error("Search for '{keyword}' failed: {message}")]
    Search { keyword: String, message: String },
}

/// Coarse classification of a per-URL failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error, timeout, bad status, oversized body
    Download,
    /// Payload did not decode or is below the minimum resolution
    Quality,
    /// Writing the accepted payload failed
    Storage,
}

/// Per-URL pipeline errors, organized by stage.
///
/// None of these abort a batch; the orchestrator logs and skips the URL.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Request failed or returned a non-success status
    #[error("Download failed for {url}: {message}")]
    Download {
        url: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Request did not complete within the configured timeout
    #[error("Download of {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// Response body exceeded the size limit
    #[error("Payload too large from {url} (> {max_mb}MB)")]
    TooLarge { url: String, max_mb: u64 },

    /// Payload is not a decodable image
    #[error("Decode error for {url}: {message}")]
    Decode { url: String, message: String },

    /// Image decoded but its resolution is under the minimum
    #[error("Image from {url} is {width}x{height}, below minimum {min_width}x{min_height}")]
    BelowMinimum {
        url: String,
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    /// Writing the image to disk failed
    #[error("Failed to store image from {url} at {path}: {message}")]
    Storage {
        url: String,
        path: PathBuf,
        message: String,
    },
}

impl PipelineError {
    /// Stage classification used for logging severity and stats.
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Download { .. }
            | PipelineError::Timeout { .. }
            | PipelineError::TooLarge { .. } => FailureKind::Download,
            PipelineError::Decode { .. } | PipelineError::BelowMinimum { .. } => {
                FailureKind::Quality
            }
            PipelineError::Storage { .. } => FailureKind::Storage,
        }
    }

    /// The candidate URL this error belongs to.
    pub fn url(&self) -> &str {
        match self {
            PipelineError::Download { url, .. }
            | PipelineError::Timeout { url, .. }
            | PipelineError::TooLarge { url, .. }
            | PipelineError::Decode { url, .. }
            | PipelineError::BelowMinimum { url, .. }
            | PipelineError::Storage { url, .. } => url,
        }
    }
}

/// Convenience type alias for Harvest results.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
