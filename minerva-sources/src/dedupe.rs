//! Fuzzy title deduplication across sources.

use similar::TextDiff;

use minerva_core::Paper;

/// Similarity ratio between two titles, in `[0, 1]`.
///
/// Case-insensitive character-level diff ratio; 1.0 means identical
/// after lowercasing.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio() as f64
}

/// Drop papers whose title is a near-duplicate of an earlier one.
///
/// Papers are compared pairwise against every already-kept paper; a paper
/// is dropped when any kept title reaches `threshold`. First occurrence
/// wins, so input order decides which copy survives.
pub fn dedupe(papers: Vec<Paper>, threshold: f64) -> Vec<Paper> {
    let mut kept: Vec<Paper> = Vec::with_capacity(papers.len());
    for paper in papers {
        let duplicate = kept
            .iter()
            .any(|k| title_similarity(&k.title, &paper.title) >= threshold);
        if duplicate {
            tracing::debug!("Dropping duplicate: {}", paper.title);
        } else {
            kept.push(paper);
        }
    }
    kept
}
