//! The source-adapter contract and shared request pacing.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use minerva_core::{Paper, PaperSource};

/// A client for one external paper-search API.
///
/// `fetch` never fails: on any network or parse error the adapter logs and
/// returns an empty list, so one failing source never aborts aggregation.
/// Missing optional fields map to documented defaults (empty abstract, year
/// 0, citations 0, empty venue); records without a title are dropped.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The source tag this adapter emits on every record.
    fn source(&self) -> PaperSource;

    /// Search the source, returning at most `limit` normalized papers.
    async fn fetch(&self, query: &str, limit: usize) -> Vec<Paper>;
}

/// Enforces a fixed minimum delay between requests to one API.
///
/// The guard over `last_request` is dropped before any await so the pacer
/// can live inside adapters shared across tasks.
pub(crate) struct RequestPacer {
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub(crate) fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: Mutex::new(None),
        }
    }

    pub(crate) async fn wait(&self) {
        let wait_duration = {
            let last = self.last_request.lock().unwrap();
            if let Some(instant) = *last {
                let elapsed = instant.elapsed();
                if elapsed < self.min_delay {
                    Some(self.min_delay - elapsed)
                } else {
                    None
                }
            } else {
                None
            }
        };

        if let Some(wait) = wait_duration {
            tokio::time::sleep(wait).await;
        }

        let mut last = self.last_request.lock().unwrap();
        *last = Some(Instant::now());
    }
}

/// Adapter that serves a fixed result list, for tests and offline runs.
pub struct StaticAdapter {
    source: PaperSource,
    papers: Vec<Paper>,
}

impl StaticAdapter {
    pub fn new(source: PaperSource, papers: Vec<Paper>) -> Self {
        Self { source, papers }
    }

    /// An adapter that simulates a failing source.
    pub fn empty(source: PaperSource) -> Self {
        Self {
            source,
            papers: Vec::new(),
        }
    }
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    fn source(&self) -> PaperSource {
        self.source
    }

    async fn fetch(&self, _query: &str, limit: usize) -> Vec<Paper> {
        self.papers.iter().take(limit).cloned().collect()
    }
}
