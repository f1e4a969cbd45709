//! Discoverer that reads candidate URLs from a text file or stdin.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use super::{collect_candidates, Discoverer};
use crate::error::DiscoveryError;

/// Where a URL list is read from.
#[derive(Debug, Clone)]
pub enum UrlSource {
    /// A newline-separated file
    File(PathBuf),
    /// Standard input
    Stdin,
}

/// Reads one URL per line; blank lines and `#` comments are ignored.
#[derive(Debug, Clone)]
pub struct UrlListDiscoverer {
    source: UrlSource,
}

impl UrlListDiscoverer {
    pub fn new(source: UrlSource) -> Self {
        Self { source }
    }

    /// `-` means stdin, anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::new(UrlSource::Stdin)
        } else {
            Self::new(UrlSource::File(PathBuf::from(arg)))
        }
    }

    async fn read_source(&self) -> Result<String, DiscoveryError> {
        match &self.source {
            UrlSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| DiscoveryError::Source {
                        source_name: path.display().to_string(),
                        message: e.to_string(),
                    })
            }
            UrlSource::Stdin => {
                let mut content = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut content)
                    .await
                    .map_err(|e| DiscoveryError::Source {
                        source_name: "stdin".to_string(),
                        message: e.to_string(),
                    })?;
                Ok(content)
            }
        }
    }
}

/// Extract candidate lines from URL-list text.
fn parse_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

#[async_trait]
impl Discoverer for UrlListDiscoverer {
    fn name(&self) -> &str {
        "url-list"
    }

    async fn discover(&self, keyword: &str, limit: usize) -> Result<Vec<String>, DiscoveryError> {
        let content = self.read_source().await?;
        let urls = collect_candidates(parse_lines(&content), limit);
        tracing::debug!(
            "Read {} candidate URLs for '{}' from {:?}",
            urls.len(),
            keyword,
            self.source
        );
        Ok(urls)
    }
}
