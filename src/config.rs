//! Process configuration read from the environment.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::dedup::{DetectorConfig, DuplicateDetector, DEFAULT_BATCH_THRESHOLD, DEFAULT_HISTORY_THRESHOLD};
use crate::entity::{default_lexicon, Lexicon};
use crate::environment::{get_env_flag, get_env_var_opt, get_env_var_or};
use crate::history::{HistoryStore, JsonHistoryStore, SupabaseHistoryStore, TARGET_HISTORY};
use crate::vector::{CachedEmbedder, EmbeddingConfig, OpenAiEmbedder, TARGET_VECTOR};

/// Everything the binaries need, with defaults for anything unset
#[derive(Debug, Clone)]
pub struct Config {
    pub detector: DetectorConfig,
    pub batch_threshold: f64,
    pub history_threshold: f64,
    pub use_hybrid: bool,
    pub embedding: EmbeddingConfig,
    pub history_days: u64,
    pub lexicon_path: Option<PathBuf>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub history_archive: Option<PathBuf>,
    pub tool_cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            batch_threshold: DEFAULT_BATCH_THRESHOLD,
            history_threshold: DEFAULT_HISTORY_THRESHOLD,
            use_hybrid: true,
            embedding: EmbeddingConfig::default(),
            history_days: 7,
            lexicon_path: None,
            supabase_url: None,
            supabase_key: None,
            history_archive: None,
            tool_cache_ttl: Duration::from_secs(6 * 60 * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let detector_defaults = defaults.detector;

        Self {
            detector: DetectorConfig {
                word_threshold: get_env_var_or("DEDUP_WORD_THRESHOLD", detector_defaults.word_threshold),
                embedding_threshold: get_env_var_or(
                    "DEDUP_EMBEDDING_THRESHOLD",
                    detector_defaults.embedding_threshold,
                ),
                no_entity_threshold: get_env_var_or(
                    "DEDUP_NO_ENTITY_THRESHOLD",
                    detector_defaults.no_entity_threshold,
                ),
                use_embeddings: get_env_flag("DEDUP_USE_EMBEDDINGS", detector_defaults.use_embeddings),
            },
            batch_threshold: get_env_var_or("DEDUP_BATCH_THRESHOLD", defaults.batch_threshold),
            history_threshold: get_env_var_or("DEDUP_HISTORY_THRESHOLD", defaults.history_threshold),
            use_hybrid: get_env_flag("DEDUP_USE_HYBRID", defaults.use_hybrid),
            embedding: EmbeddingConfig::from_env(),
            history_days: get_env_var_or("HISTORY_DAYS", defaults.history_days),
            lexicon_path: get_env_var_opt("LEXICON_PATH").map(PathBuf::from),
            supabase_url: get_env_var_opt("NEXT_PUBLIC_SUPABASE_URL"),
            supabase_key: get_env_var_opt("SUPABASE_SERVICE_ROLE_KEY"),
            history_archive: get_env_var_opt("HISTORY_ARCHIVE").map(PathBuf::from),
            tool_cache_ttl: Duration::from_secs(
                get_env_var_or("TOOL_CACHE_TTL_HOURS", 6u64).saturating_mul(60 * 60),
            ),
        }
    }

    /// The configured lexicon file, or the built-in table
    pub fn lexicon(&self) -> Result<Arc<Lexicon>> {
        match &self.lexicon_path {
            Some(path) => Ok(Arc::new(Lexicon::from_file(path)?)),
            None => Ok(Arc::new(default_lexicon().clone())),
        }
    }

    /// Build the duplicate detector, with the OpenAI embedder when a key is set
    pub fn detector(&self) -> Result<DuplicateDetector> {
        let detector = DuplicateDetector::new(self.detector).with_lexicon(self.lexicon()?);

        if !self.detector.use_embeddings {
            return Ok(detector);
        }

        if !self.embedding.is_remote_enabled() {
            warn!(
                target: TARGET_VECTOR,
                "OPENAI_API_KEY not set, embedding fallback disabled"
            );
            return Ok(detector);
        }

        let provider = OpenAiEmbedder::new(&self.embedding)?;
        Ok(detector.with_embedder(CachedEmbedder::from_config(Arc::new(provider), &self.embedding)))
    }

    /// The history archive if set, otherwise Supabase when both URL and key are set
    pub fn history_store(&self) -> Result<Box<dyn HistoryStore>> {
        if let Some(path) = &self.history_archive {
            info!(target: TARGET_HISTORY, "Reading history from archive {}", path.display());
            return Ok(Box::new(JsonHistoryStore::new(path)));
        }

        let url = self
            .supabase_url
            .as_deref()
            .context("No history source: set HISTORY_ARCHIVE or NEXT_PUBLIC_SUPABASE_URL")?;
        let key = self
            .supabase_key
            .as_deref()
            .context("SUPABASE_SERVICE_ROLE_KEY is required with NEXT_PUBLIC_SUPABASE_URL")?;

        info!(target: TARGET_HISTORY, "Reading history from Supabase at {}", url);
        Ok(Box::new(SupabaseHistoryStore::new(url, key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.detector.word_threshold, 0.3);
        assert_eq!(config.detector.embedding_threshold, 0.8);
        assert_eq!(config.detector.no_entity_threshold, 0.6);
        assert_eq!(config.batch_threshold, 0.9);
        assert_eq!(config.history_threshold, 0.6);
        assert_eq!(config.history_days, 7);
        assert_eq!(config.tool_cache_ttl, Duration::from_secs(21_600));
        assert!(config.use_hybrid);
    }

    #[test]
    fn test_detector_without_key_has_no_embedder() {
        let config = Config::default();
        assert!(config.detector().is_ok());
    }

    #[test]
    fn test_history_store_requires_a_source() {
        let config = Config::default();
        assert!(config.history_store().is_err());

        let config = Config {
            supabase_url: Some("https://abc.supabase.co".to_string()),
            ..Config::default()
        };
        assert!(config.history_store().is_err());

        let config = Config {
            history_archive: Some(PathBuf::from("newsletters.json")),
            ..Config::default()
        };
        assert!(config.history_store().is_ok());
    }

    #[test]
    fn test_missing_lexicon_file() {
        let config = Config {
            lexicon_path: Some(PathBuf::from("/nonexistent/lexicon.json")),
            ..Config::default()
        };
        assert!(config.lexicon().is_err());
        assert!(config.detector().is_err());
    }
}
