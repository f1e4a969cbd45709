//! Core data types for the Harvest fetch pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A successfully downloaded payload, before any quality check.
///
/// Lives only for the duration of a single download attempt.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Raw response body
    pub bytes: Vec<u8>,
    /// Declared `Content-Type` header, if any
    pub content_type: Option<String>,
    /// The candidate URL that produced this payload
    pub source_url: String,
}

/// An image that passed the quality gate and was written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedImage {
    /// `<content_hash><extension>`
    pub filename: String,

    /// Where the bytes were written
    pub file_path: PathBuf,

    /// URL the bytes were downloaded from
    pub source_url: String,

    /// Payload size in bytes
    pub size_bytes: u64,

    /// BLAKE3 hash of the payload (lowercase hex)
    pub content_hash: String,

    /// Extension derived from the declared content type (with leading dot)
    pub extension: String,

    /// Decoded width in pixels
    pub width: u32,

    /// Decoded height in pixels
    pub height: u32,
}

/// Counters describing what happened to the observed candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStats {
    /// Unique candidate URLs submitted to the worker pool
    pub submitted: usize,
    /// Images accepted into the outcome
    pub accepted: usize,
    /// Network errors, timeouts, bad status codes
    pub download_failures: usize,
    /// Undecodable or under-resolution payloads
    pub quality_rejections: usize,
    /// Disk write failures
    pub storage_failures: usize,
    /// Completions whose content hash was already accepted
    pub duplicates: usize,
    /// Tasks that panicked or were cancelled by the runtime
    pub task_failures: usize,
    /// Tasks never observed because the target was reached first
    pub abandoned: usize,
}

/// The result of a pipeline run: accepted images in completion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// Accepted images, capped at the requested count
    pub images: Vec<AcceptedImage>,
    /// Per-run counters
    pub stats: FetchStats,
}

impl PipelineOutcome {
    /// Number of accepted images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Total bytes written across accepted images.
    pub fn total_bytes(&self) -> u64 {
        self.images.iter().map(|i| i.size_bytes).sum()
    }
}
