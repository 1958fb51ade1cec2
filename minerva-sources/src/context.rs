//! Deterministic context assembly from ranked papers.

use minerva_core::Paper;

/// Separator between paper blocks in the assembled context.
const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

/// Render ranked papers into a numbered context for a completion prompt.
///
/// Each paper becomes one labeled block; blocks appear in input order and
/// numbering starts at 1 so the model can cite papers as `[Paper N]`.
/// The citations line is omitted for papers with no known count. Returns
/// an empty string for an empty list.
pub fn build_context(papers: &[Paper]) -> String {
    papers
        .iter()
        .enumerate()
        .map(|(i, paper)| {
            let mut block = format!("[Paper {}] {}\n", i + 1, paper.title);
            block.push_str(&format!("Authors: {}\n", paper.short_authors()));
            block.push_str(&format!("Year: {}\n", paper.year));
            block.push_str(&format!("Source: {}\n", paper.source));
            if paper.citations > 0 {
                block.push_str(&format!("Citations: {}\n", paper.citations));
            }
            block.push_str(&format!("Abstract: {}", paper.abstract_text));
            block
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Render papers as a Markdown reading list.
///
/// Used as the degraded answer when no completion service is reachable:
/// the papers themselves are still useful without a synthesized summary.
pub fn format_papers_summary(query: &str, papers: &[Paper]) -> String {
    let mut out = format!("## Papers found for \"{}\"\n", query);
    for (i, paper) in papers.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. **{}** ({}, {})",
            i + 1,
            paper.title,
            paper.source,
            paper.year
        ));
        if paper.citations > 0 {
            out.push_str(&format!(", {} citations", paper.citations));
        }
        if !paper.url.is_empty() {
            out.push_str(&format!("\n   {}", paper.url));
        }
    }
    out
}
