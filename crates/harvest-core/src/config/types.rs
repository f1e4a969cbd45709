//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default browser-like identity sent with every image request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Upper bound on concurrent downloads.
pub const MAX_PARALLEL_WORKERS: usize = 1024;

/// Levels accepted in `[logging] level`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where accepted images are written
    pub download_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("downloaded_images"),
        }
    }
}

/// Download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum concurrent in-flight downloads (1 to `MAX_PARALLEL_WORKERS`)
    pub parallel_workers: usize,

    /// Per-download timeout in milliseconds
    pub timeout_ms: u64,

    /// User-Agent header sent with each request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 5,
            timeout_ms: 10_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Minimum-resolution acceptance gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QualityConfig {
    /// Minimum accepted width in pixels (inclusive)
    pub min_width: u32,

    /// Minimum accepted height in pixels (inclusive)
    pub min_height: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_width: 800,
            min_height: 600,
        }
    }
}

/// Candidate discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Candidates requested per wanted image, to absorb failures
    pub oversample: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { oversample: 2 }
    }
}

/// Resource limits to protect against problematic responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum response body size in megabytes
    pub max_download_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_download_mb: 50,
        }
    }
}

impl LimitsConfig {
    /// Body size limit in bytes.
    pub fn max_download_bytes(&self) -> u64 {
        self.max_download_mb.saturating_mul(1024 * 1024)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
