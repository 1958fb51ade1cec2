//! Multi-source paper search: fetch, merge, dedupe, rank.

use minerva_core::{Paper, PaperSource, SourceError, SourcesConfig};

use crate::adapter::SourceAdapter;
use crate::arxiv::ArxivAdapter;
use crate::dedupe::dedupe;
use crate::enrich::{CitationLookup, enrich_citations};
use crate::pubmed::PubmedAdapter;
use crate::semantic_scholar::SemanticScholarAdapter;

/// Floor on how many papers each source is asked for, so that a small
/// overall limit still gives deduplication something to work with.
const MIN_PER_SOURCE: usize = 5;

/// Merge per-source result lists into one ranked list.
///
/// Lists are concatenated in the given priority order, deduplicated by
/// fuzzy title match (first occurrence wins, so earlier sources take
/// precedence), sorted by citation count with publication year as
/// tiebreaker, then truncated to `limit`. Returns an empty vector when
/// every source came back empty.
pub fn aggregate(per_source: Vec<Vec<Paper>>, limit: usize, dedup_threshold: f64) -> Vec<Paper> {
    let merged: Vec<Paper> = per_source.into_iter().flatten().collect();
    let mut papers = dedupe(merged, dedup_threshold);
    // Stable sort keeps source priority order among fully tied papers.
    papers.sort_by(|a, b| (b.citations, b.year).cmp(&(a.citations, a.year)));
    papers.truncate(limit);
    papers
}

/// How many papers to request from each of `n` sources for an overall
/// `limit`, leaving headroom for cross-source duplicates.
pub fn per_source_budget(limit: usize, n_sources: usize) -> usize {
    if n_sources == 0 {
        return 0;
    }
    (limit / n_sources).max(MIN_PER_SOURCE)
}

/// Searches all configured sources and aggregates the results.
pub struct PaperFetcher {
    adapters: Vec<Box<dyn SourceAdapter>>,
    enricher: Option<Box<dyn CitationLookup>>,
    dedup_threshold: f64,
}

impl PaperFetcher {
    /// Build a fetcher from configuration.
    ///
    /// Unknown source names are skipped with a warning. Citation
    /// enrichment stays off unless `use_citations` is set, in which case
    /// a Semantic Scholar client is constructed for it whether or not
    /// that source is enabled for search.
    pub fn from_config(config: &SourcesConfig) -> Result<Self, SourceError> {
        let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();
        for name in &config.enabled {
            match PaperSource::from_str_loose(name) {
                Some(PaperSource::Arxiv) => {
                    adapters.push(Box::new(
                        ArxivAdapter::new()?.with_from_year(config.from_year),
                    ));
                }
                Some(PaperSource::SemanticScholar) => {
                    adapters.push(Box::new(SemanticScholarAdapter::new(
                        config.semantic_scholar_api_key.clone(),
                    )?));
                }
                Some(PaperSource::Pubmed) => {
                    adapters.push(Box::new(
                        PubmedAdapter::new(config.pubmed_email.clone())?
                            .with_from_year(config.from_year),
                    ));
                }
                None => {
                    tracing::warn!("Unknown paper source '{}', skipping", name);
                }
            }
        }
        let enricher: Option<Box<dyn CitationLookup>> = if config.use_citations {
            Some(Box::new(SemanticScholarAdapter::new(
                config.semantic_scholar_api_key.clone(),
            )?))
        } else {
            None
        };
        Ok(Self {
            adapters,
            enricher,
            dedup_threshold: config.dedup_threshold,
        })
    }

    /// Build a fetcher over explicit adapters, without citation enrichment.
    pub fn with_adapters(adapters: Vec<Box<dyn SourceAdapter>>, dedup_threshold: f64) -> Self {
        Self {
            adapters,
            enricher: None,
            dedup_threshold,
        }
    }

    /// Enable citation enrichment with the given lookup.
    pub fn with_citation_enrichment(mut self, lookup: Box<dyn CitationLookup>) -> Self {
        self.enricher = Some(lookup);
        self
    }

    /// Search every source and return one ranked, deduplicated list.
    ///
    /// Sources are queried sequentially to respect their rate limits; a
    /// source that fails contributes nothing rather than aborting the
    /// search. An empty return means no source produced results.
    pub async fn search_papers(&self, query: &str, limit: usize) -> Vec<Paper> {
        let budget = per_source_budget(limit, self.adapters.len());
        let mut per_source = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let papers = adapter.fetch(query, budget).await;
            tracing::debug!("{} returned {} papers", adapter.source(), papers.len());
            per_source.push(papers);
        }

        let mut papers = aggregate(per_source, limit, self.dedup_threshold);
        if let Some(ref enricher) = self.enricher {
            papers = enrich_citations(papers, enricher.as_ref()).await;
            // Enrichment can change counts, so re-rank.
            papers.sort_by(|a, b| (b.citations, b.year).cmp(&(a.citations, a.year)));
        }
        papers
    }
}
