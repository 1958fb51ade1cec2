//! # Minerva RAG
//!
//! Retrieval layer for the Minerva research assistant: document chunking,
//! an in-memory embedding-similarity index, question answering over an
//! indexed document, and the topic-research pipeline that grounds a
//! completion service in aggregated papers.

pub mod chunk;
pub mod index;
pub mod qa;
pub mod research;

pub use chunk::{Chunk, chunk_text};
pub use index::{SearchResult, VectorIndex};
pub use qa::{NO_CONTEXT_REPLY, QaEngine};
pub use research::ResearchEngine;
