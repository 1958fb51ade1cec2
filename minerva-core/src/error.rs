//! Error types for the Minerva core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering paper sources, indexing, completion-service, and configuration
//! domains.

/// Top-level error type for the Minerva libraries.
#[derive(Debug, thiserror::Error)]
pub enum MinervaError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from external paper-source APIs.
///
/// These never escape the adapter boundary: a failing source degrades to an
/// empty result list so aggregation can continue with the remaining sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("API request failed: {message}")]
    Http { message: String },

    #[error("API returned status {status}")]
    Status { status: u16 },

    #[error("Response parse error: {message}")]
    Parse { message: String },
}

/// Errors from chunking and index construction.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Document is empty: no text to chunk")]
    EmptyDocument,
}

/// Errors from the completion service (local LLM).
///
/// Callers recover from all of these by resolving to a labeled fallback
/// string; they never crash the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Provider connection failed: {message}")]
    Connection { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Empty response from the model")]
    EmptyResponse,
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `MinervaError`.
pub type Result<T> = std::result::Result<T, MinervaError>;
