//! Candidate URL discovery.
//!
//! Finding image URLs for a keyword is left to implementations of
//! [`Discoverer`]: a headless browser, a search API, or a fixed list all fit.
//! The pipeline only ever sees the resulting `Vec<String>`.

mod url_list;

pub use url_list::{UrlListDiscoverer, UrlSource};

use async_trait::async_trait;
use std::collections::HashSet;

use crate::error::DiscoveryError;

/// Produces candidate image URLs for a keyword.
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Return up to `limit` candidate URLs for `keyword`, best first.
    async fn discover(&self, keyword: &str, limit: usize) -> Result<Vec<String>, DiscoveryError>;
}

/// Discoverer backed by a fixed list, ignoring the keyword.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscoverer {
    urls: Vec<String>,
}

impl StaticDiscoverer {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl Discoverer for StaticDiscoverer {
    fn name(&self) -> &str {
        "static"
    }

    async fn discover(&self, _keyword: &str, limit: usize) -> Result<Vec<String>, DiscoveryError> {
        Ok(collect_candidates(self.urls.iter().map(String::as_str), limit))
    }
}

/// Normalize raw candidates: keep `http(s)` entries, drop repeats, cap at `limit`.
///
/// Order of first occurrence is preserved.
pub fn collect_candidates<'a, I>(raw: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for candidate in raw {
        if urls.len() >= limit {
            break;
        }
        let candidate = candidate.trim();
        if !candidate.starts_with("http") {
            continue;
        }
        if seen.insert(candidate) {
            urls.push(candidate.to_string());
        }
    }

    urls
}
