//! # Minerva Sources
//!
//! Multi-source paper aggregation for the Minerva research assistant.
//! One adapter per external API (arXiv, Semantic Scholar, PubMed), a fuzzy
//! title deduplicator, a composite-key ranker, opt-in citation enrichment,
//! and the deterministic context builder that bridges ranked papers into a
//! completion-service prompt.

pub mod adapter;
pub mod aggregate;
pub mod arxiv;
pub mod context;
pub mod dedupe;
pub mod enrich;
pub mod pubmed;
pub mod semantic_scholar;
mod xml;

pub use adapter::{SourceAdapter, StaticAdapter};
pub use aggregate::{PaperFetcher, aggregate};
pub use arxiv::ArxivAdapter;
pub use context::{build_context, format_papers_summary};
pub use dedupe::{dedupe, title_similarity};
pub use enrich::{CitationLookup, enrich_citations};
pub use pubmed::PubmedAdapter;
pub use semantic_scholar::SemanticScholarAdapter;
