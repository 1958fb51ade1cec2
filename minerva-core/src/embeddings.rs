//! Pluggable embedding providers for semantic indexing.
//!
//! Provides a trait-based abstraction over embedding models, with a local
//! hash-based TF embedder (always available, fully deterministic) and an
//! Ollama API embedder for higher-quality vectors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use crate::config::EmbeddingConfig;

/// Trait for embedding providers.
///
/// An embedder must be deterministic for a fixed model identifier: the same
/// text always yields the same vector within a session, so index vectors and
/// query vectors stay comparable.
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Generate embeddings for a batch of texts.
    fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Return the dimensionality of embeddings.
    fn dimensions(&self) -> usize;

    /// Return the provider name.
    fn provider_name(&self) -> &str;
}

/// Local bag-of-words embedder using hashed term frequency.
///
/// Each word is hashed to a dimension index and its term frequency is
/// accumulated; the result is L2-normalized. No model download, no network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEmbedder {
    dimensions: usize,
}

pub const DEFAULT_LOCAL_DIMENSIONS: usize = 128;

impl LocalEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for LocalEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_DIMENSIONS)
    }
}

fn simple_hash(s: &str) -> usize {
    let mut hash: usize = 5381;
    for b in s.bytes() {
        hash = hash.wrapping_mul(33).wrapping_add(b as usize);
    }
    hash
}

impl Embedder for LocalEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return vector;
        }

        // Count term frequency
        let mut tf: HashMap<&str, usize> = HashMap::new();
        for word in &words {
            *tf.entry(word).or_insert(0) += 1;
        }

        // Hash each unique term into a dimension
        for (term, count) in &tf {
            let idx = simple_hash(term) % self.dimensions;
            vector[idx] += *count as f32;
        }

        // L2 normalize
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &str {
        "local"
    }
}

/// Ollama embedder (uses the local Ollama API).
pub struct OllamaEmbedder {
    client: reqwest::Client,
    model: String,
    dims: usize,
    base_url: String,
}

impl OllamaEmbedder {
    pub fn new(model: Option<String>, base_url: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| "nomic-embed-text".into());
        let dims = match model.as_str() {
            "nomic-embed-text" => 768,
            "mxbai-embed-large" => 1024,
            "all-minilm" => 384,
            _ => 768,
        };
        Self {
            client: reqwest::Client::new(),
            model,
            dims,
            base_url: base_url.unwrap_or_else(|| "http://localhost:11434".into()),
        }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let rt = tokio::runtime::Handle::try_current();
        match rt {
            Ok(handle) => {
                let client = self.client.clone();
                let model = self.model.clone();
                let base_url = self.base_url.clone();
                let text = text.to_string();
                let dims = self.dims;

                std::thread::scope(|s| {
                    s.spawn(|| {
                        handle.block_on(async {
                            Self::embed_api_call(&client, &model, &base_url, &text, dims).await
                        })
                    })
                    .join()
                    .unwrap_or_else(|_| vec![0.0; dims])
                })
            }
            Err(_) => {
                tracing::warn!("No tokio runtime available for Ollama embedding");
                vec![0.0; self.dims]
            }
        }
    }

    async fn embed_api_call(
        client: &reqwest::Client,
        model: &str,
        base_url: &str,
        text: &str,
        dims: usize,
    ) -> Vec<f32> {
        let url = format!("{}/api/embed", base_url);
        let body = serde_json::json!({
            "model": model,
            "input": text,
        });

        match client.post(&url).json(&body).send().await {
            Ok(resp) => {
                if let Ok(json) = resp.json::<serde_json::Value>().await
                    && let Some(embedding) = json["embeddings"][0].as_array()
                {
                    return embedding
                        .iter()
                        .filter_map(|v| v.as_f64().map(|f| f as f32))
                        .collect();
                }
                vec![0.0; dims]
            }
            Err(e) => {
                tracing::warn!("Ollama embedding error: {}, returning zero vector", e);
                vec![0.0; dims]
            }
        }
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        self.embed_sync(text)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }
}

/// Factory function to create an embedder based on configuration.
pub fn create_embedder(config: &EmbeddingConfig) -> Box<dyn Embedder> {
    match config.provider.as_str() {
        "ollama" => Box::new(OllamaEmbedder::new(config.model.clone(), None)),
        _ => {
            // Default: local hashed TF
            let dims = if config.dimensions > 0 {
                config.dimensions
            } else {
                DEFAULT_LOCAL_DIMENSIONS
            };
            Box::new(LocalEmbedder::new(dims))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_embedder_dimensions() {
        let embedder = LocalEmbedder::new(128);
        assert_eq!(embedder.dimensions(), 128);
        let v = embedder.embed("hello world");
        assert_eq!(v.len(), 128);
    }

    #[test]
    fn test_local_embedder_normalized() {
        let embedder = LocalEmbedder::new(128);
        let v = embedder.embed("test input text for normalization");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!(
            (norm - 1.0).abs() < 0.01,
            "Expected normalized vector, got norm={}",
            norm
        );
    }

    #[test]
    fn test_local_embedder_empty_text() {
        let embedder = LocalEmbedder::new(128);
        let v = embedder.embed("");
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_local_embedder_deterministic() {
        let embedder = LocalEmbedder::new(128);
        let v1 = embedder.embed("same text");
        let v2 = embedder.embed("same text");
        assert_eq!(v1, v2);
    }

    #[test]
    fn test_local_embedder_case_insensitive() {
        let embedder = LocalEmbedder::new(128);
        assert_eq!(embedder.embed("Transformer Models"), embedder.embed("transformer models"));
    }

    #[test]
    fn test_local_embedder_different_texts_differ() {
        let embedder = LocalEmbedder::new(128);
        let v1 = embedder.embed("hello world");
        let v2 = embedder.embed("goodbye universe");
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_embed_batch_default() {
        let embedder = LocalEmbedder::new(64);
        let texts = &["hello", "world", "test"];
        let embeddings = embedder.embed_batch(texts);
        assert_eq!(embeddings.len(), 3);
        for emb in &embeddings {
            assert_eq!(emb.len(), 64);
        }
    }

    #[test]
    fn test_create_embedder_default() {
        let config = EmbeddingConfig::default();
        let embedder = create_embedder(&config);
        assert_eq!(embedder.provider_name(), "local");
        assert_eq!(embedder.dimensions(), DEFAULT_LOCAL_DIMENSIONS);
    }

    #[test]
    fn test_create_embedder_explicit_dimensions() {
        let config = EmbeddingConfig {
            provider: "local".into(),
            dimensions: 256,
            ..Default::default()
        };
        let embedder = create_embedder(&config);
        assert_eq!(embedder.dimensions(), 256);
    }

    #[test]
    fn test_ollama_embedder_dimensions() {
        let embedder = OllamaEmbedder::new(None, None);
        assert_eq!(embedder.dimensions(), 768); // nomic-embed-text default
    }

    #[test]
    fn test_embedder_trait_object() {
        let embedder: Box<dyn Embedder> = Box::new(LocalEmbedder::new(128));
        assert_eq!(embedder.provider_name(), "local");
        assert_eq!(embedder.embed("test").len(), 128);
    }
}
