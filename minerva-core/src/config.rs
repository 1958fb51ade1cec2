//! Configuration system for Minerva.
//!
//! Uses `figment` for layered configuration: defaults -> workspace config
//! file -> environment. Configuration is loaded from
//! `.minerva/config.toml` in the workspace directory, with
//! `MINERVA_SOURCES__MAX_RESULTS`-style environment overrides.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for the Minerva research assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinervaConfig {
    pub sources: SourcesConfig,
    pub ollama: OllamaConfig,
    pub embedding: EmbeddingConfig,
    pub rag: RagConfig,
}

/// Configuration for the paper-source aggregation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Enabled sources in fixed priority order. Aggregation concatenates
    /// per-source results in this order before deduplication.
    #[serde(default = "default_enabled_sources")]
    pub enabled: Vec<String>,
    /// Maximum number of papers returned by a search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Fuzzy title-similarity threshold above which two records are treated
    /// as the same logical paper. Tunable; 0.85 matches difflib behavior.
    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f64,
    /// Only return papers published in or after this year; 0 disables.
    #[serde(default)]
    pub from_year: i32,
    /// Look up missing citation counts on Semantic Scholar after
    /// aggregation. Off unless requested: each uncounted paper costs one
    /// extra rate-limited request.
    #[serde(default)]
    pub use_citations: bool,
    /// Optional Semantic Scholar API key (raises rate limits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_scholar_api_key: Option<String>,
    /// Contact email sent to the PubMed E-utilities per their etiquette.
    #[serde(default = "default_pubmed_email")]
    pub pubmed_email: String,
}

fn default_enabled_sources() -> Vec<String> {
    vec!["arxiv".into(), "semantic_scholar".into()]
}

fn default_max_results() -> usize {
    10
}

fn default_dedup_threshold() -> f64 {
    0.85
}

fn default_pubmed_email() -> String {
    "research@example.com".into()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_sources(),
            max_results: default_max_results(),
            dedup_threshold: default_dedup_threshold(),
            from_year: 0,
            use_citations: false,
            semantic_scholar_api_key: None,
            pubmed_email: default_pubmed_email(),
        }
    }
}

/// Configuration for the local Ollama completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens to generate (Ollama `num_predict`).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Context window size (Ollama `num_ctx`).
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Request timeout; generation on small local models can be slow.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".into()
}

fn default_ollama_model() -> String {
    "llama3.2:1b".into()
}

fn default_temperature() -> f64 {
    0.4
}

fn default_max_tokens() -> usize {
    1500
}

fn default_context_window() -> usize {
    4096
}

fn default_timeout_secs() -> u64 {
    180
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_window: default_context_window(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Configuration for embedding providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name: "local" (default) or "ollama".
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    /// Provider-specific model name.
    #[serde(default)]
    pub model: Option<String>,
    /// Embedding dimensions (provider default if 0).
    #[serde(default)]
    pub dimensions: usize,
}

fn default_embedding_provider() -> String {
    "local".into()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: None,
            dimensions: 0,
        }
    }
}

/// Configuration for chunking and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Caller-side minimum-similarity filter; the index itself imposes none.
    /// Scores are `1 / (1 + L2 distance)`, so with the local embedder's
    /// unit-length vectors every score is at least 1/3 and the 0.1 default
    /// only filters unnormalized provider vectors. Raise it to make weak
    /// matches count as no context.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_chunk_size() -> usize {
    2000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    3
}

fn default_min_score() -> f32 {
    0.1
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

impl MinervaConfig {
    /// Load configuration: defaults, then `.minerva/config.toml` under the
    /// workspace directory (if present), then `MINERVA_*` environment
    /// variables with `__` section separators.
    pub fn load(workspace: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(MinervaConfig::default()));

        if let Some(ws) = workspace {
            let ws_config = ws.join(".minerva").join("config.toml");
            if ws_config.exists() {
                figment = figment.merge(Toml::file(&ws_config));
            }
        }

        figment = figment.merge(Env::prefixed("MINERVA_").split("__"));

        let config: MinervaConfig = figment.extract().map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.dedup_threshold <= 0.0 || self.sources.dedup_threshold > 1.0 {
            return Err(ConfigError::Invalid {
                message: format!(
                    "sources.dedup_threshold must be in (0, 1], got {}",
                    self.sources.dedup_threshold
                ),
            });
        }
        if self.rag.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                message: "rag.chunk_size must be greater than 0".into(),
            });
        }
        if self.rag.chunk_overlap >= self.rag.chunk_size {
            return Err(ConfigError::Invalid {
                message: format!(
                    "rag.chunk_overlap ({}) must be smaller than rag.chunk_size ({})",
                    self.rag.chunk_overlap, self.rag.chunk_size
                ),
            });
        }
        if self.rag.top_k == 0 {
            return Err(ConfigError::Invalid {
                message: "rag.top_k must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = MinervaConfig::default();
        assert_eq!(config.sources.enabled, vec!["arxiv", "semantic_scholar"]);
        assert_eq!(config.sources.max_results, 10);
        assert!(!config.sources.use_citations);
        assert!((config.sources.dedup_threshold - 0.85).abs() < f64::EPSILON);
        assert_eq!(config.ollama.model, "llama3.2:1b");
        assert_eq!(config.rag.chunk_size, 2000);
        assert_eq!(config.rag.chunk_overlap, 200);
        assert_eq!(config.rag.top_k, 3);
    }

    #[test]
    fn test_validate_default_is_ok() {
        assert!(MinervaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = MinervaConfig::default();
        config.sources.dedup_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlap_ge_chunk_size() {
        let mut config = MinervaConfig::default();
        config.rag.chunk_overlap = config.rag.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_without_workspace_uses_defaults() {
        let config = MinervaConfig::load(None).unwrap();
        assert_eq!(config.sources.max_results, 10);
    }

    #[test]
    fn test_load_workspace_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".minerva");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[sources]\nmax_results = 25\n\n[rag]\nchunk_size = 512\nchunk_overlap = 64\n",
        )
        .unwrap();

        let config = MinervaConfig::load(Some(dir.path())).unwrap();
        assert_eq!(config.sources.max_results, 25);
        assert_eq!(config.rag.chunk_size, 512);
        // Untouched sections keep their defaults.
        assert_eq!(config.ollama.model, "llama3.2:1b");
    }

    #[test]
    fn test_deserialize_empty_sections() {
        let config: SourcesConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_results, 10);
        assert!(!config.use_citations);
        let config: RagConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.top_k, 3);
    }
}
