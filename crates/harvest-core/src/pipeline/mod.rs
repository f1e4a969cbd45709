//! Fetch pipeline components.
//!
//! Each candidate URL flows through these stages:
//! - **download**: single-attempt HTTP retrieval
//! - **quality**: minimum-resolution gate
//! - **hash**: content identity
//! - **storage**: content-addressed write to disk
//! - **processor**: runs one URL through all of the above
//! - **fetch**: bounded-concurrency orchestration with early termination

pub mod download;
pub mod fetch;
pub mod hash;
pub mod processor;
pub mod quality;
pub mod storage;

// Re-exports for convenient access
pub use download::{Downloader, HttpDownloader};
pub use fetch::{FetchEvent, FetchPipeline};
pub use hash::Hasher;
pub use processor::ImageProcessor;
pub use quality::{ImageDimensions, QualityFilter};
pub use storage::{extension_for_content_type, ImageStore};
