//! Citation-count enrichment via title lookup.

use async_trait::async_trait;

use minerva_core::{Paper, SourceError};

use crate::semantic_scholar::SemanticScholarAdapter;

/// Resolves a paper title to a citation count.
#[async_trait]
pub trait CitationLookup: Send + Sync {
    async fn citation_count(&self, title: &str) -> Result<u64, SourceError>;
}

#[async_trait]
impl CitationLookup for SemanticScholarAdapter {
    async fn citation_count(&self, title: &str) -> Result<u64, SourceError> {
        self.citation_count_by_title(title).await
    }
}

/// Fill in citation counts for papers whose source carries none.
///
/// Each paper with `citations == 0` is looked up by title; on a hit the
/// count is copied in, on any failure the paper passes through unchanged.
/// Input order is preserved.
pub async fn enrich_citations(papers: Vec<Paper>, lookup: &dyn CitationLookup) -> Vec<Paper> {
    let mut enriched = Vec::with_capacity(papers.len());
    for paper in papers {
        if paper.citations > 0 {
            enriched.push(paper);
            continue;
        }
        match lookup.citation_count(&paper.title).await {
            Ok(count) => {
                tracing::debug!("Citation count for '{}': {}", paper.title, count);
                enriched.push(paper.with_citations(count));
            }
            Err(e) => {
                tracing::warn!("Citation lookup failed for '{}': {}", paper.title, e);
                enriched.push(paper);
            }
        }
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use minerva_core::PaperSource;
    use std::collections::HashMap;

    struct MapLookup(HashMap<String, u64>);

    #[async_trait]
    impl CitationLookup for MapLookup {
        async fn citation_count(&self, title: &str) -> Result<u64, SourceError> {
            self.0.get(title).copied().ok_or(SourceError::Status { status: 404 })
        }
    }

    fn paper(title: &str, citations: u64) -> Paper {
        Paper {
            title: title.to_string(),
            authors: Vec::new(),
            abstract_text: String::new(),
            year: 2019,
            url: String::new(),
            pdf_url: None,
            source: PaperSource::Arxiv,
            citations,
            venue: String::new(),
        }
    }

    #[tokio::test]
    async fn test_enrich_fills_zero_counts() {
        let lookup = MapLookup(HashMap::from([("Known Paper".to_string(), 42)]));
        let out = enrich_citations(vec![paper("Known Paper", 0)], &lookup).await;
        assert_eq!(out[0].citations, 42);
    }

    #[tokio::test]
    async fn test_enrich_skips_existing_counts() {
        let lookup = MapLookup(HashMap::from([("Known Paper".to_string(), 42)]));
        let out = enrich_citations(vec![paper("Known Paper", 7)], &lookup).await;
        assert_eq!(out[0].citations, 7);
    }

    #[tokio::test]
    async fn test_enrich_failure_leaves_paper_unchanged() {
        let lookup = MapLookup(HashMap::new());
        let input = paper("Unknown Paper", 0);
        let out = enrich_citations(vec![input.clone()], &lookup).await;
        assert_eq!(out[0], input);
    }

    #[tokio::test]
    async fn test_enrich_preserves_order() {
        let lookup = MapLookup(HashMap::from([("B".to_string(), 5)]));
        let out = enrich_citations(vec![paper("A", 1), paper("B", 0), paper("C", 0)], &lookup).await;
        let titles: Vec<&str> = out.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(out[1].citations, 5);
        assert_eq!(out[2].citations, 0);
    }
}
