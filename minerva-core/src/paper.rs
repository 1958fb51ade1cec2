//! The canonical research-paper entity shared by all source adapters.

use serde::{Deserialize, Serialize};

/// The external source a paper record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSource {
    Arxiv,
    SemanticScholar,
    Pubmed,
}

impl PaperSource {
    /// Human-readable label used in context blocks and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            PaperSource::Arxiv => "arXiv",
            PaperSource::SemanticScholar => "Semantic Scholar",
            PaperSource::Pubmed => "PubMed",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arxiv" => Some(PaperSource::Arxiv),
            "semantic_scholar" | "semanticscholar" | "s2" => Some(PaperSource::SemanticScholar),
            "pubmed" => Some(PaperSource::Pubmed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaperSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized research paper.
///
/// Records are immutable after construction: enrichment steps produce a new
/// record (see [`Paper::with_citations`]) rather than mutating in place.
/// Adapters must never emit a record with an empty title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    /// Abstract text; empty when the source provides none, never absent.
    pub abstract_text: String,
    /// Publication year; 0 when the source omits a date.
    pub year: i32,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    pub source: PaperSource,
    /// Citation count; 0 when the source provides no citation data.
    pub citations: u64,
    /// Publication venue; empty allowed.
    pub venue: String,
}

impl Paper {
    /// Return a copy of this paper with an updated citation count.
    ///
    /// Enrichment uses this instead of mutation so that the original record
    /// stays untouched on partial failure.
    pub fn with_citations(&self, citations: u64) -> Paper {
        Paper {
            citations,
            ..self.clone()
        }
    }

    /// Author list truncated to the first three names, with "et al." beyond.
    pub fn short_authors(&self) -> String {
        let mut s = self
            .authors
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if self.authors.len() > 3 {
            s.push_str(" et al.");
        }
        s
    }
}

impl std::fmt::Display for Paper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview: String = self.abstract_text.chars().take(200).collect();
        write!(
            f,
            "{}\n{} ({})\n{}...",
            self.title,
            self.short_authors(),
            self.year,
            preview
        )
    }
}

/// Collapse runs of whitespace into single spaces.
///
/// Titles and abstracts from Atom/XML feeds carry embedded newlines and
/// indentation; all adapters normalize through this before emitting a record.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
