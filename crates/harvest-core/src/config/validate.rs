//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, LOG_LEVELS, MAX_PARALLEL_WORKERS};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.parallel_workers must be > 0".into(),
            ));
        }
        if self.fetch.parallel_workers > MAX_PARALLEL_WORKERS {
            return Err(ConfigError::ValidationError(format!(
                "fetch.parallel_workers must be <= {MAX_PARALLEL_WORKERS}, got {}",
                self.fetch.parallel_workers
            )));
        }
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "fetch.timeout_ms must be > 0".into(),
            ));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "fetch.user_agent must not be empty".into(),
            ));
        }
        if self.discovery.oversample == 0 {
            return Err(ConfigError::ValidationError(
                "discovery.oversample must be > 0".into(),
            ));
        }
        if self.limits.max_download_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_download_mb must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        Ok(())
    }
}
