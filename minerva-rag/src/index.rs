//! In-memory vector index over document chunks.

use minerva_core::{Embedder, IndexError};

use crate::chunk::{Chunk, chunk_text};

/// One retrieval hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub text: String,
    /// Similarity in `(0, 1]`; see [`VectorIndex::search`].
    pub score: f32,
}

/// Exact nearest-neighbor index over embedded chunks.
///
/// Entries keep chunk order, and the index owns the embedder that produced
/// them so queries go through the same vector space. The index is rebuilt
/// wholesale when the document changes; there are no incremental updates.
pub struct VectorIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    embedder: Box<dyn Embedder>,
}

impl VectorIndex {
    /// Chunk `text` and embed every chunk.
    pub fn build(
        text: &str,
        chunk_size: usize,
        overlap: usize,
        embedder: Box<dyn Embedder>,
    ) -> Result<Self, IndexError> {
        let chunks = chunk_text(text, chunk_size, overlap)?;
        Ok(Self::from_chunks(chunks, embedder))
    }

    /// Build an index over pre-split texts.
    ///
    /// Each text becomes one chunk as-is. An empty input, or one with only
    /// blank texts, is an `IndexError::EmptyDocument`.
    pub fn from_texts(
        texts: Vec<String>,
        embedder: Box<dyn Embedder>,
    ) -> Result<Self, IndexError> {
        let mut chunks = Vec::with_capacity(texts.len());
        let mut offset = 0usize;
        for text in texts {
            let len = text.chars().count();
            if !text.trim().is_empty() {
                chunks.push(Chunk {
                    text,
                    chunk_index: chunks.len(),
                    start_offset: offset,
                    end_offset: offset + len,
                });
            }
            offset += len;
        }
        if chunks.is_empty() {
            return Err(IndexError::EmptyDocument);
        }
        Ok(Self::from_chunks(chunks, embedder))
    }

    fn from_chunks(chunks: Vec<Chunk>, embedder: Box<dyn Embedder>) -> Self {
        let entries = chunks
            .into_iter()
            .map(|chunk| {
                let vector = embedder.embed(&chunk.text);
                (chunk, vector)
            })
            .collect();
        Self { entries, embedder }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the `k` chunks nearest to `query`, best first.
    ///
    /// Nearness is L2 distance in embedding space, reported as the
    /// similarity `1 / (1 + distance)`: strictly decreasing in distance,
    /// always in `(0, 1]`, and 1.0 exactly at distance zero. Ties keep
    /// chunk order. `k` larger than the index is clamped; an empty query
    /// against a non-empty index still scores every chunk.
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        if self.entries.is_empty() || k == 0 {
            return Vec::new();
        }
        let query_vector = self.embedder.embed(query);

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|(chunk, vector)| SearchResult {
                text: chunk.text.clone(),
                score: 1.0 / (1.0 + l2_distance(&query_vector, vector)),
            })
            .collect();
        // Stable sort: equal scores keep ascending chunk order.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k.min(self.entries.len()));
        results
    }
}

/// Euclidean distance between two vectors of the same dimensionality.
fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
