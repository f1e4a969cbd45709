//! Harvest Core - concurrent image fetching with quality and dedupe gates.
//!
//! Harvest turns a keyword into a small set of good, unique images on disk:
//!
//! ```text
//! keyword → Discoverer → candidate URLs → Download → Quality gate → Hash → Disk
//! ```
//!
//! Downloads run concurrently with a fixed ceiling, failures are skipped
//! rather than fatal, and the run stops as soon as enough images are in.
//!
//! # Usage
//!
//! ```rust,ignore
//! use harvest_core::{Config, Harvester, StaticDiscoverer};
//!
//! #[tokio::main]
//! async fn main() -> harvest_core::Result<()> {
//!     let harvester = Harvester::new(Config::load()?)?;
//!     let discoverer = StaticDiscoverer::new(vec!["https://example.com/a.jpg".into()]);
//!
//!     let outcome = harvester.fetch_images(&discoverer, "steampunk", 10).await?;
//!     for image in &outcome.images {
//!         println!("Downloaded: {} ({} bytes)", image.filename, image.size_bytes);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use discovery::{Discoverer, StaticDiscoverer, UrlListDiscoverer};
pub use error::{
    ConfigError, DiscoveryError, FailureKind, HarvestError, PipelineError, PipelineResult, Result,
};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{FetchEvent, FetchPipeline, ImageProcessor};
pub use types::{AcceptedImage, FetchStats, FetchedImage, PipelineOutcome};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Harvester - the main entry point: discovery followed by the fetch pipeline.
pub struct Harvester {
    config: Config,
    pipeline: FetchPipeline,
}

impl Harvester {
    /// Create a harvester that downloads over HTTP.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let pipeline = FetchPipeline::new(&config)?;
        tracing::debug!("Initializing Harvest v{}", VERSION);
        Ok(Self { config, pipeline })
    }

    /// Create a harvester around a pre-built pipeline.
    pub fn with_pipeline(config: Config, pipeline: FetchPipeline) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, pipeline })
    }

    /// Discover candidates for `keyword` and fetch up to `count` images.
    pub async fn fetch_images(
        &self,
        discoverer: &dyn Discoverer,
        keyword: &str,
        count: usize,
    ) -> Result<PipelineOutcome> {
        self.fetch_images_with_progress(discoverer, keyword, count, |_| {})
            .await
    }

    /// Like [`fetch_images`](Self::fetch_images), reporting pipeline events.
    ///
    /// A failing discoverer yields an empty outcome, not an error. Only an
    /// unusable download directory is fatal.
    pub async fn fetch_images_with_progress<F>(
        &self,
        discoverer: &dyn Discoverer,
        keyword: &str,
        count: usize,
        on_event: F,
    ) -> Result<PipelineOutcome>
    where
        F: FnMut(&FetchEvent<'_>),
    {
        tracing::info!("Starting image fetch for '{}'", keyword);

        let download_dir = self.config.download_dir();
        tokio::fs::create_dir_all(&download_dir).await?;

        // Extra candidates absorb the ones that fail
        let limit = count.saturating_mul(self.config.discovery.oversample);
        let urls = match discoverer.discover(keyword, limit).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!("Discovery via {} failed: {}", discoverer.name(), e);
                Vec::new()
            }
        };
        if urls.is_empty() {
            tracing::warn!("No candidate URLs found for '{}'", keyword);
        } else {
            tracing::info!(
                "Found {} candidate URLs for '{}' via {}",
                urls.len(),
                keyword,
                discoverer.name()
            );
        }

        let outcome = self.pipeline.run_with_progress(&urls, count, on_event).await;

        tracing::info!(
            "Successfully downloaded {} images for '{}'",
            outcome.len(),
            keyword
        );
        Ok(outcome)
    }
}
