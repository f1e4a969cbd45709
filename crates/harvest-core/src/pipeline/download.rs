//! Single-attempt HTTP downloads of candidate images.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::config::{FetchConfig, LimitsConfig};
use crate::error::{HarvestError, PipelineError};
use crate::types::FetchedImage;

/// Retrieves the payload behind a candidate URL.
///
/// Uses `async_trait` because the pipeline holds downloaders as
/// `Arc<dyn Downloader>` and shares them across spawned tasks.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Attempt exactly one retrieval of `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, PipelineError>;
}

/// `reqwest`-backed downloader with a fixed timeout and browser-like identity.
pub struct HttpDownloader {
    client: reqwest::Client,
    timeout_ms: u64,
    max_bytes: u64,
    max_mb: u64,
}

impl HttpDownloader {
    /// Build the HTTP client from configuration.
    ///
    /// Failing to build the client is the one systemic failure of the
    /// download stage, so it surfaces as a hard error.
    pub fn new(fetch: &FetchConfig, limits: &LimitsConfig) -> Result<Self, HarvestError> {
        let client = reqwest::Client::builder()
            .user_agent(fetch.user_agent.clone())
            .timeout(Duration::from_millis(fetch.timeout_ms))
            .build()
            .map_err(|e| HarvestError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout_ms: fetch.timeout_ms,
            max_bytes: limits.max_download_bytes(),
            max_mb: limits.max_download_mb,
        })
    }

    fn request_error(&self, url: &str, e: reqwest::Error) -> PipelineError {
        if e.is_timeout() {
            PipelineError::Timeout {
                url: url.to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            PipelineError::Download {
                url: url.to_string(),
                message: e.to_string(),
                status_code: e.status().map(|s| s.as_u16()),
            }
        }
    }

    fn too_large(&self, url: &str) -> PipelineError {
        PipelineError::TooLarge {
            url: url.to_string(),
            max_mb: self.max_mb,
        }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, PipelineError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Download {
                url: url.to_string(),
                message: format!("HTTP {status}"),
                status_code: Some(status.as_u16()),
            });
        }

        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(self.too_large(url));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.request_error(url, e))?;
            if bytes.len() as u64 + chunk.len() as u64 > self.max_bytes {
                return Err(self.too_large(url));
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::trace!("  Downloaded {} bytes from {}", bytes.len(), url);

        Ok(FetchedImage {
            bytes,
            content_type,
            source_url: url.to_string(),
        })
    }
}
