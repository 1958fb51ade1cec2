//! # Minerva Core
//!
//! Core library for the Minerva research assistant.
//! Provides the canonical paper entity, the error taxonomy, configuration,
//! embedding providers, and the completion-service boundary.

pub mod completion;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod extract;
pub mod paper;

// Re-export commonly used types at the crate root.
pub use completion::{CompletionOptions, CompletionService, MockCompletionService, OllamaClient};
pub use config::{EmbeddingConfig, MinervaConfig, OllamaConfig, RagConfig, SourcesConfig};
pub use embeddings::{Embedder, LocalEmbedder, OllamaEmbedder, create_embedder};
pub use error::{
    CompletionError, ConfigError, IndexError, MinervaError, Result, SourceError,
};
pub use extract::{PlainTextExtractor, TextExtractor};
pub use paper::{Paper, PaperSource, normalize_whitespace};
