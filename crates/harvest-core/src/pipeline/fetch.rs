//! Bounded-concurrency orchestration with early termination.
//!
//! Every candidate is spawned up front into a `JoinSet`; a semaphore caps how
//! many are in flight. Completions are consumed in the order they finish and
//! the remaining tasks are aborted as soon as the target is met.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{Config, MAX_PARALLEL_WORKERS};
use crate::error::{FailureKind, PipelineError, PipelineResult, Result};
use crate::types::{AcceptedImage, PipelineOutcome};

use super::processor::ImageProcessor;

/// A completion observed by the orchestrator.
#[derive(Debug)]
pub enum FetchEvent<'a> {
    /// An image was accepted into the outcome
    Accepted(&'a AcceptedImage),
    /// The candidate failed at some stage and was dropped
    Skipped { url: &'a str, kind: FailureKind },
    /// The candidate's content was already accepted from another URL
    Duplicate { url: &'a str },
}

/// Turns candidate URLs into a capped set of accepted, unique images.
pub struct FetchPipeline {
    processor: Arc<ImageProcessor>,
    parallel_workers: usize,
}

impl FetchPipeline {
    /// Create a pipeline with the HTTP downloader.
    pub fn new(config: &Config) -> Result<Self> {
        let processor = ImageProcessor::new(config)?;
        Ok(Self::with_processor(processor, config.fetch.parallel_workers))
    }

    /// Create a pipeline around an existing processor.
    ///
    /// `parallel_workers` is clamped to `1..=MAX_PARALLEL_WORKERS`.
    pub fn with_processor(processor: ImageProcessor, parallel_workers: usize) -> Self {
        Self {
            processor: Arc::new(processor),
            parallel_workers: parallel_workers.clamp(1, MAX_PARALLEL_WORKERS),
        }
    }

    /// Fetch until `target` images are accepted or candidates run out.
    ///
    /// Never fails: per-URL errors are logged and counted. Under-delivery is
    /// reported through the outcome length.
    pub async fn run(&self, urls: &[String], target: usize) -> PipelineOutcome {
        self.run_with_progress(urls, target, |_| {}).await
    }

    /// Like [`run`](Self::run), reporting each observed completion to `on_event`.
    pub async fn run_with_progress<F>(
        &self,
        urls: &[String],
        target: usize,
        mut on_event: F,
    ) -> PipelineOutcome
    where
        F: FnMut(&FetchEvent<'_>),
    {
        let mut outcome = PipelineOutcome::default();
        if target == 0 || urls.is_empty() {
            tracing::debug!("Nothing to fetch (target {}, {} candidates)", target, urls.len());
            return outcome;
        }

        let semaphore = Arc::new(Semaphore::new(self.parallel_workers));
        let mut tasks = JoinSet::new();
        let mut submitted = HashSet::new();

        for url in urls {
            if !submitted.insert(url.as_str()) {
                continue;
            }
            let url = url.clone();
            let processor = Arc::clone(&self.processor);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };
                Some(processor.process(&url).await)
            });
        }
        outcome.stats.submitted = submitted.len();
        tracing::debug!(
            "Submitted {} candidates ({} workers, target {})",
            outcome.stats.submitted,
            self.parallel_workers,
            target
        );

        let mut seen_hashes = HashSet::new();

        while let Some(joined) = tasks.join_next().await {
            let result: PipelineResult<AcceptedImage> = match joined {
                Ok(Some(result)) => result,
                Ok(None) => {
                    tracing::warn!("Fetch semaphore closed unexpectedly");
                    outcome.stats.task_failures += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!("Fetch task failed: {e}");
                    outcome.stats.task_failures += 1;
                    continue;
                }
            };

            match result {
                Ok(image) => {
                    if !seen_hashes.insert(image.content_hash.clone()) {
                        tracing::debug!(
                            "Duplicate content from {} ({})",
                            image.source_url,
                            image.filename
                        );
                        outcome.stats.duplicates += 1;
                        on_event(&FetchEvent::Duplicate {
                            url: &image.source_url,
                        });
                        continue;
                    }

                    outcome.stats.accepted += 1;
                    on_event(&FetchEvent::Accepted(&image));
                    outcome.images.push(image);

                    if outcome.images.len() >= target {
                        break;
                    }
                }
                Err(e) => {
                    record_failure(&mut outcome, &e);
                    on_event(&FetchEvent::Skipped {
                        url: e.url(),
                        kind: e.kind(),
                    });
                }
            }
        }

        outcome.stats.abandoned = tasks.len();
        if !tasks.is_empty() {
            tracing::debug!(
                "Target reached, abandoning {} outstanding downloads",
                tasks.len()
            );
            tasks.abort_all();
        }

        outcome
    }
}

fn record_failure(outcome: &mut PipelineOutcome, error: &PipelineError) {
    match error.kind() {
        FailureKind::Download => {
            tracing::warn!("{}", error);
            outcome.stats.download_failures += 1;
        }
        FailureKind::Quality => {
            tracing::debug!("Rejected: {}", error);
            outcome.stats.quality_rejections += 1;
        }
        FailureKind::Storage => {
            tracing::warn!("{}", error);
            outcome.stats.storage_failures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::download::Downloader;
    use crate::types::FetchedImage;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Luma};
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn png_bytes(width: u32, height: u32, shade: u8) -> Vec<u8> {
        let buffer = ImageBuffer::from_pixel(width, height, Luma([shade]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Scripted downloader: each URL maps to a delay and a payload (or failure).
    #[derive(Default)]
    struct MockDownloader {
        responses: HashMap<String, (Duration, Option<Vec<u8>>)>,
        calls: AtomicUsize,
    }

    impl MockDownloader {
        fn serve(mut self, url: &str, delay_ms: u64, payload: Option<Vec<u8>>) -> Self {
            self.responses
                .insert(url.to_string(), (Duration::from_millis(delay_ms), payload));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Downloader for MockDownloader {
        async fn fetch(&self, url: &str) -> PipelineResult<FetchedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Some((delay, payload)) = self.responses.get(url) else {
                return Err(PipelineError::Download {
                    url: url.to_string(),
                    message: "HTTP 404 Not Found".to_string(),
                    status_code: Some(404),
                });
            };
            tokio::time::sleep(*delay).await;
            match payload {
                Some(bytes) => Ok(FetchedImage {
                    bytes: bytes.clone(),
                    content_type: Some("image/png".to_string()),
                    source_url: url.to_string(),
                }),
                None => Err(PipelineError::Timeout {
                    url: url.to_string(),
                    timeout_ms: 10_000,
                }),
            }
        }
    }

    fn pipeline(dir: &Path, downloader: Arc<MockDownloader>, workers: usize) -> FetchPipeline {
        let mut config = Config::default();
        config.general.download_dir = dir.to_path_buf();
        let processor = ImageProcessor::with_downloader(&config, downloader);
        FetchPipeline::with_processor(processor, workers)
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://img.test/{i}.png")).collect()
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Arc::new(MockDownloader::default());
        let outcome = pipeline(dir.path(), downloader.clone(), 5)
            .run(&[], 10)
            .await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.stats.submitted, 0);
        assert_eq!(downloader.calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_target_does_not_download() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = Arc::new(MockDownloader::default());
        let outcome = pipeline(dir.path(), downloader.clone(), 5)
            .run(&urls(3), 0)
            .await;

        assert!(outcome.is_empty());
        assert_eq!(downloader.calls(), 0);
    }

    #[tokio::test]
    async fn test_early_stop_at_target() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = urls(20);
        let mut mock = MockDownloader::default();
        for (i, url) in candidates.iter().enumerate() {
            mock = mock.serve(url, 50, Some(png_bytes(800, 600, i as u8)));
        }
        let downloader = Arc::new(mock);

        let outcome = pipeline(dir.path(), downloader.clone(), 5)
            .run(&candidates, 5)
            .await;

        assert_eq!(outcome.len(), 5);
        assert_eq!(outcome.stats.accepted, 5);
        assert_eq!(outcome.stats.submitted, 20);
        assert!(outcome.stats.abandoned > 0);
        assert!(downloader.calls() < 20);
    }

    #[tokio::test]
    async fn test_cap_holds_for_any_target() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = urls(12);
        let mut mock = MockDownloader::default();
        for (i, url) in candidates.iter().enumerate() {
            mock = mock.serve(url, 0, Some(png_bytes(800, 600, i as u8)));
        }
        let p = pipeline(dir.path(), Arc::new(mock), 3);

        for target in [1, 4, 12, 30] {
            let outcome = p.run(&candidates, target).await;
            assert!(outcome.len() <= target);
            assert_eq!(outcome.len(), target.min(12));
        }
    }

    #[tokio::test]
    async fn test_partial_failures_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = urls(10);
        let mut mock = MockDownloader::default();
        for (i, url) in candidates.iter().enumerate() {
            mock = match i {
                // 30% fail to download (two unknown URLs -> 404, one timeout)
                0 | 1 => mock,
                2 => mock.serve(url, 0, None),
                // 20% fail quality
                3 => mock.serve(url, 0, Some(png_bytes(640, 480, 3))),
                4 => mock.serve(url, 0, Some(b"<html>nope</html>".to_vec())),
                _ => mock.serve(url, 0, Some(png_bytes(1024, 768, i as u8))),
            };
        }
        let p = pipeline(dir.path(), Arc::new(mock), 5);

        let outcome = p.run(&candidates, 10).await;
        assert_eq!(outcome.len(), 5);
        assert_eq!(outcome.stats.download_failures, 3);
        assert_eq!(outcome.stats.quality_rejections, 2);
        assert_eq!(outcome.stats.storage_failures, 0);

        let outcome = p.run(&candidates, 3).await;
        assert_eq!(outcome.len(), 3);
    }

    #[tokio::test]
    async fn test_identical_content_is_accepted_once() {
        let dir = tempfile::tempdir().unwrap();
        let shared = png_bytes(800, 600, 7);
        let candidates = urls(6);
        let mut mock = MockDownloader::default();
        for (i, url) in candidates.iter().enumerate() {
            let payload = if i < 4 {
                shared.clone()
            } else {
                png_bytes(800, 600, 100 + i as u8)
            };
            mock = mock.serve(url, 0, Some(payload));
        }

        let outcome = pipeline(dir.path(), Arc::new(mock), 2)
            .run(&candidates, 10)
            .await;

        assert_eq!(outcome.len(), 3);
        assert_eq!(outcome.stats.duplicates, 3);
        let hashes: HashSet<_> = outcome.images.iter().map(|i| &i.content_hash).collect();
        assert_eq!(hashes.len(), outcome.len());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[tokio::test]
    async fn test_repeated_urls_are_fetched_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://img.test/only.png".to_string();
        let downloader =
            Arc::new(MockDownloader::default().serve(&url, 0, Some(png_bytes(800, 600, 1))));

        let candidates = vec![url.clone(), url.clone(), url];
        let outcome = pipeline(dir.path(), downloader.clone(), 5)
            .run(&candidates, 5)
            .await;

        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.stats.submitted, 1);
        assert_eq!(downloader.calls(), 1);
    }

    #[tokio::test]
    async fn test_outcome_follows_completion_order() {
        let dir = tempfile::tempdir().unwrap();
        let slow = "https://img.test/slow.png".to_string();
        let fast = "https://img.test/fast.png".to_string();
        let mock = MockDownloader::default()
            .serve(&slow, 300, Some(png_bytes(800, 600, 1)))
            .serve(&fast, 10, Some(png_bytes(800, 600, 2)));

        let outcome = pipeline(dir.path(), Arc::new(mock), 5)
            .run(&[slow.clone(), fast.clone()], 2)
            .await;

        let order: Vec<_> = outcome.images.iter().map(|i| i.source_url.as_str()).collect();
        assert_eq!(order, vec![fast.as_str(), slow.as_str()]);
    }

    #[tokio::test]
    async fn test_storage_failures_do_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = urls(3);
        let mut mock = MockDownloader::default();
        for (i, url) in candidates.iter().enumerate() {
            mock = mock.serve(url, 0, Some(png_bytes(800, 600, i as u8)));
        }

        let outcome = pipeline(&dir.path().join("missing"), Arc::new(mock), 2)
            .run(&candidates, 3)
            .await;

        assert!(outcome.is_empty());
        assert_eq!(outcome.stats.storage_failures, 3);
    }

    #[tokio::test]
    async fn test_worker_count_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://img.test/one.png".to_string();
        let mock = MockDownloader::default().serve(&url, 0, Some(png_bytes(800, 600, 1)));

        let p = pipeline(dir.path(), Arc::new(mock), usize::MAX);
        assert_eq!(p.parallel_workers, MAX_PARALLEL_WORKERS);
        assert_eq!(p.run(&[url], 1).await.len(), 1);

        let p = pipeline(dir.path(), Arc::new(MockDownloader::default()), 0);
        assert_eq!(p.parallel_workers, 1);
    }

    #[tokio::test]
    async fn test_duplicate_events_reach_callback() {
        let dir = tempfile::tempdir().unwrap();
        let shared = png_bytes(800, 600, 9);
        let candidates = urls(3);
        let mut mock = MockDownloader::default();
        for url in &candidates {
            mock = mock.serve(url, 0, Some(shared.clone()));
        }

        let mut accepted = Vec::new();
        let mut duplicates = Vec::new();
        let outcome = pipeline(dir.path(), Arc::new(mock), 1)
            .run_with_progress(&candidates, 3, |event| match event {
                FetchEvent::Accepted(image) => accepted.push(image.source_url.clone()),
                FetchEvent::Duplicate { url } => duplicates.push(url.to_string()),
                FetchEvent::Skipped { .. } => {}
            })
            .await;

        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.stats.duplicates, 2);
        assert_eq!(accepted.len(), 1);
        assert_eq!(duplicates.len(), 2);
        assert!(!duplicates.contains(&accepted[0]));
        let mut observed: Vec<_> = accepted.iter().chain(&duplicates).cloned().collect();
        observed.sort();
        assert_eq!(observed, candidates);
    }

    #[tokio::test]
    async fn test_progress_events_cover_every_observed_completion() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = urls(4);
        let mock = MockDownloader::default()
            .serve(&candidates[0], 0, Some(png_bytes(800, 600, 1)))
            .serve(&candidates[1], 0, Some(png_bytes(10, 10, 2)));

        let mut accepted = 0;
        let mut skipped = Vec::new();
        let outcome = pipeline(dir.path(), Arc::new(mock), 2)
            .run_with_progress(&candidates, 4, |event| match event {
                FetchEvent::Accepted(_) => accepted += 1,
                FetchEvent::Skipped { kind, .. } => skipped.push(*kind),
                FetchEvent::Duplicate { .. } => {}
            })
            .await;

        assert_eq!(outcome.len(), 1);
        assert_eq!(accepted, 1);
        assert_eq!(skipped.len(), 3);
        assert_eq!(
            skipped.iter().filter(|k| **k == FailureKind::Quality).count(),
            1
        );
    }
}
