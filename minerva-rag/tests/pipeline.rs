//! End-to-end pipeline tests: aggregation through synthesis, and document
//! indexing through question answering, with no network access.

use minerva_core::{
    CompletionOptions, LocalEmbedder, MockCompletionService, Paper, PaperSource, RagConfig,
    SourcesConfig,
};
use minerva_rag::{QaEngine, ResearchEngine, VectorIndex};
use minerva_sources::{PaperFetcher, StaticAdapter};

fn paper(title: &str, source: PaperSource, citations: u64, year: i32) -> Paper {
    Paper {
        title: title.to_string(),
        authors: vec!["First Author".into(), "Second Author".into()],
        abstract_text: format!("Abstract of {}.", title),
        year,
        url: format!("https://example.org/{}", title.replace(' ', "-").to_lowercase()),
        pdf_url: None,
        source,
        citations,
        venue: source.label().to_string(),
    }
}

#[tokio::test]
async fn research_pipeline_dedupes_ranks_and_synthesizes() {
    // Two sources sharing one paper under slightly different titles.
    let arxiv = StaticAdapter::new(
        PaperSource::Arxiv,
        vec![
            paper("Attention Is All You Need", PaperSource::Arxiv, 0, 2017),
            paper("A Minor Workshop Paper", PaperSource::Arxiv, 2, 2023),
        ],
    );
    let s2 = StaticAdapter::new(
        PaperSource::SemanticScholar,
        vec![
            paper("Attention is all you need", PaperSource::SemanticScholar, 90000, 2017),
            paper("Deep Residual Learning", PaperSource::SemanticScholar, 150000, 2016),
        ],
    );
    let fetcher = PaperFetcher::with_adapters(vec![Box::new(arxiv), Box::new(s2)], 0.85);

    let papers = fetcher.search_papers("attention transformers", 10).await;
    // Duplicate collapsed to the first-seen (arXiv) record.
    assert_eq!(papers.len(), 3);
    let attention: Vec<_> = papers.iter().filter(|p| p.title.to_lowercase().contains("attention")).collect();
    assert_eq!(attention.len(), 1);
    assert_eq!(attention[0].source, PaperSource::Arxiv);
    // Ranked by citations descending.
    assert_eq!(papers[0].title, "Deep Residual Learning");

    let engine = ResearchEngine::new(
        fetcher,
        Box::new(MockCompletionService::with_response(
            "Summary citing [Paper 1] and [Paper 2].",
        )),
        CompletionOptions::default(),
        &SourcesConfig::default(),
    );
    let summary = engine.research_topic("attention transformers").await;
    assert_eq!(summary, "Summary citing [Paper 1] and [Paper 2].");
}

#[tokio::test]
async fn research_pipeline_degrades_without_completion() {
    let fetcher = PaperFetcher::with_adapters(
        vec![Box::new(StaticAdapter::new(
            PaperSource::Pubmed,
            vec![paper("A Clinical Trial", PaperSource::Pubmed, 40, 2021)],
        ))],
        0.85,
    );
    let engine = ResearchEngine::new(
        fetcher,
        Box::new(MockCompletionService::failing()),
        CompletionOptions::default(),
        &SourcesConfig::default(),
    );
    let out = engine.research_topic("clinical trials").await;
    assert!(out.contains("A Clinical Trial"));
    assert!(out.contains("1. **A Clinical Trial**"));
}

#[tokio::test]
async fn qa_pipeline_indexes_and_answers() {
    let document = "Photosynthesis converts light energy into chemical energy. \
        It takes place in the chloroplasts of plant cells.\n\n\
        Cellular respiration releases energy from glucose in the mitochondria.";
    let qa = QaEngine::new(
        document,
        &RagConfig::default(),
        Box::new(LocalEmbedder::default()),
        Box::new(MockCompletionService::with_response(
            "Photosynthesis happens in the chloroplasts.",
        )),
        CompletionOptions::default(),
    )
    .unwrap();
    assert!(qa.chunk_count() >= 1);

    let answer = qa.answer("Where does photosynthesis happen?").await;
    assert_eq!(answer, "Photosynthesis happens in the chloroplasts.");
}

#[test]
fn index_ranks_on_shared_vocabulary() {
    let index = VectorIndex::from_texts(
        vec![
            "the cat sat on the mat".to_string(),
            "quantum chromodynamics lattice gauge theory".to_string(),
        ],
        Box::new(LocalEmbedder::default()),
    )
    .unwrap();

    let results = index.search("where did the cat sit", 2);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "the cat sat on the mat");
    assert!(results[0].score > results[1].score);
    assert!(results.iter().all(|r| r.score > 0.0 && r.score <= 1.0));
}
