//! Question answering over a single indexed document.

use minerva_core::{
    CompletionOptions, CompletionService, Embedder, IndexError, RagConfig,
};

use crate::index::VectorIndex;

/// Reply used when retrieval finds nothing above the relevance floor.
pub const NO_CONTEXT_REPLY: &str =
    "The document does not appear to contain information relevant to this question.";

/// Answers questions about one document through retrieval plus completion.
pub struct QaEngine {
    index: VectorIndex,
    completion: Box<dyn CompletionService>,
    options: CompletionOptions,
    top_k: usize,
    min_score: f32,
}

impl QaEngine {
    /// Index `text` for question answering.
    ///
    /// Fails with `IndexError::EmptyDocument` when `text` is blank.
    pub fn new(
        text: &str,
        config: &RagConfig,
        embedder: Box<dyn Embedder>,
        completion: Box<dyn CompletionService>,
        options: CompletionOptions,
    ) -> Result<Self, IndexError> {
        let index = VectorIndex::build(text, config.chunk_size, config.chunk_overlap, embedder)?;
        tracing::debug!("Indexed document into {} chunks", index.len());
        Ok(Self {
            index,
            completion,
            options,
            top_k: config.top_k,
            min_score: config.min_score,
        })
    }

    /// Answer a question from the indexed document.
    ///
    /// Retrieves the top chunks, drops those below the relevance floor, and
    /// asks the completion service to answer from the surviving excerpts.
    /// Always resolves to a string: no relevant chunks gives the canned
    /// no-context reply, and a completion failure degrades to returning the
    /// excerpts themselves.
    pub async fn answer(&self, question: &str) -> String {
        let results = self.index.search(question, self.top_k);
        let relevant: Vec<_> = results
            .into_iter()
            .filter(|r| r.score >= self.min_score)
            .collect();
        if relevant.is_empty() {
            return NO_CONTEXT_REPLY.to_string();
        }

        let excerpts = relevant
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[Excerpt {}]\n{}", i + 1, r.text))
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = format!(
            "Answer the question using only the document excerpts below. \
             If the excerpts do not contain the answer, say so.\n\n\
             {}\n\nQuestion: {}\n\nAnswer:",
            excerpts, question
        );

        match self.completion.complete(&prompt, &self.options).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Completion failed, returning raw excerpts: {}", e);
                format!(
                    "Could not generate an answer (completion service unavailable). \
                     Most relevant excerpts:\n\n{}",
                    excerpts
                )
            }
        }
    }

    /// Number of chunks in the underlying index.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }
}
