//! Per-candidate processing: download, quality gate, then storage.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{PipelineResult, Result};
use crate::types::AcceptedImage;

use super::download::{Downloader, HttpDownloader};
use super::quality::QualityFilter;
use super::storage::ImageStore;

/// Runs one candidate URL through every stage of the pipeline.
pub struct ImageProcessor {
    downloader: Arc<dyn Downloader>,
    filter: QualityFilter,
    store: ImageStore,
}

impl ImageProcessor {
    /// Create a processor backed by the HTTP downloader.
    pub fn new(config: &Config) -> Result<Self> {
        let downloader = HttpDownloader::new(&config.fetch, &config.limits)?;
        Ok(Self::with_downloader(config, Arc::new(downloader)))
    }

    /// Create a processor with a custom downloader.
    pub fn with_downloader(config: &Config, downloader: Arc<dyn Downloader>) -> Self {
        Self {
            downloader,
            filter: QualityFilter::new(config.quality),
            store: ImageStore::new(config.download_dir()),
        }
    }

    /// Download, check and persist a single candidate.
    ///
    /// Nothing touches the filesystem unless the payload passes the gate.
    pub async fn process(&self, url: &str) -> PipelineResult<AcceptedImage> {
        let start = std::time::Instant::now();
        tracing::debug!("Fetching: {}", url);

        let fetched = self.downloader.fetch(url).await?;
        let download_time = start.elapsed();
        tracing::trace!("  Download: {:?}", download_time);

        let dims = self.filter.check(&fetched.bytes, url)?;
        tracing::trace!("  Quality: {}x{} ({:?})", dims.width, dims.height, dims.format);

        let image = self.store.persist(fetched, dims).await?;

        tracing::debug!(
            "Accepted {} in {:?} ({}x{}, {} bytes)",
            image.filename,
            start.elapsed(),
            image.width,
            image.height,
            image.size_bytes
        );
        Ok(image)
    }
}
