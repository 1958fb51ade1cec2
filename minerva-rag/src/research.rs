//! Topic research: paper aggregation feeding a synthesis prompt.

use minerva_core::{CompletionOptions, CompletionService, Paper, SourcesConfig};
use minerva_sources::{PaperFetcher, build_context, format_papers_summary};

/// Researches a topic by searching the literature and synthesizing a
/// summary grounded in the papers found.
pub struct ResearchEngine {
    fetcher: PaperFetcher,
    completion: Box<dyn CompletionService>,
    options: CompletionOptions,
    max_results: usize,
}

impl ResearchEngine {
    pub fn new(
        fetcher: PaperFetcher,
        completion: Box<dyn CompletionService>,
        options: CompletionOptions,
        sources: &SourcesConfig,
    ) -> Self {
        Self {
            fetcher,
            completion,
            options,
            max_results: sources.max_results,
        }
    }

    /// Research `topic` and return a readable summary.
    ///
    /// Primary path: search all sources, build a numbered paper context,
    /// and ask the completion service for a grounded synthesis. Two named
    /// fallbacks keep this total:
    /// - no papers found: [`ResearchEngine::knowledge_only_summary`],
    /// - papers found but completion failed:
    ///   [`ResearchEngine::fallback_summary`].
    pub async fn research_topic(&self, topic: &str) -> String {
        let papers = self.fetcher.search_papers(topic, self.max_results).await;
        if papers.is_empty() {
            tracing::warn!("No papers found for '{}', answering from model knowledge", topic);
            return self.knowledge_only_summary(topic).await;
        }
        tracing::debug!("Synthesizing over {} papers for '{}'", papers.len(), topic);

        let context = build_context(&papers);
        let prompt = format!(
            "You are a research assistant. Using the papers below, write a \
             structured summary of the current state of research on \
             \"{}\". Cite papers as [Paper N]. Cover the main approaches, \
             key findings, and open problems.\n\n{}\n\nSummary:",
            topic, context
        );

        match self.completion.complete(&prompt, &self.options).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!("Synthesis failed, falling back to paper listing: {}", e);
                self.fallback_summary(topic, &papers)
            }
        }
    }

    /// Summary from model knowledge alone, used when every source came back
    /// empty. Labeled so the reader knows no papers back it.
    async fn knowledge_only_summary(&self, topic: &str) -> String {
        let prompt = format!(
            "No papers could be retrieved for the topic \"{}\". From your \
             own knowledge, give a brief overview of the topic and note \
             that it is not grounded in retrieved literature.\n\nOverview:",
            topic
        );
        match self.completion.complete(&prompt, &self.options).await {
            Ok(summary) => format!("(No papers found; answering from model knowledge.)\n\n{}", summary),
            Err(e) => {
                tracing::warn!("Knowledge-only summary failed: {}", e);
                format!("No papers were found for \"{}\" and no summary could be generated.", topic)
            }
        }
    }

    /// Plain paper listing, used when papers exist but synthesis failed.
    fn fallback_summary(&self, topic: &str, papers: &[Paper]) -> String {
        format!(
            "(Summary generation unavailable; listing papers instead.)\n\n{}",
            format_papers_summary(topic, papers)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minerva_core::{MockCompletionService, PaperSource};
    use minerva_sources::StaticAdapter;

    fn paper(title: &str, citations: u64) -> Paper {
        Paper {
            title: title.to_string(),
            authors: vec!["A. Researcher".into()],
            abstract_text: "An abstract.".into(),
            year: 2022,
            url: "https://example.org/p".into(),
            pdf_url: None,
            source: PaperSource::Arxiv,
            citations,
            venue: "arXiv".into(),
        }
    }

    fn fetcher_with(papers: Vec<Paper>) -> PaperFetcher {
        PaperFetcher::with_adapters(
            vec![Box::new(StaticAdapter::new(PaperSource::Arxiv, papers))],
            0.85,
        )
    }

    fn engine(fetcher: PaperFetcher, completion: Box<dyn CompletionService>) -> ResearchEngine {
        ResearchEngine::new(
            fetcher,
            completion,
            CompletionOptions::default(),
            &SourcesConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_primary_path_returns_synthesis() {
        let engine = engine(
            fetcher_with(vec![paper("Transformers Survey", 100)]),
            Box::new(MockCompletionService::with_response("A synthesized summary.")),
        );
        let out = engine.research_topic("transformers").await;
        assert_eq!(out, "A synthesized summary.");
    }

    #[tokio::test]
    async fn test_no_papers_uses_knowledge_only_fallback() {
        let engine = engine(
            fetcher_with(Vec::new()),
            Box::new(MockCompletionService::with_response("What I know about it.")),
        );
        let out = engine.research_topic("an obscure topic").await;
        assert!(out.starts_with("(No papers found; answering from model knowledge.)"));
        assert!(out.contains("What I know about it."));
    }

    #[tokio::test]
    async fn test_completion_failure_with_papers_lists_them() {
        let engine = engine(
            fetcher_with(vec![paper("Transformers Survey", 100)]),
            Box::new(MockCompletionService::failing()),
        );
        let out = engine.research_topic("transformers").await;
        assert!(out.starts_with("(Summary generation unavailable; listing papers instead.)"));
        assert!(out.contains("Transformers Survey"));
    }

    #[tokio::test]
    async fn test_everything_failing_still_returns_a_string() {
        let engine = engine(fetcher_with(Vec::new()), Box::new(MockCompletionService::failing()));
        let out = engine.research_topic("nothing works").await;
        assert!(out.contains("no summary could be generated"));
    }
}
