use std::env;

/// Default OpenAI embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Configuration for the remote embedding provider and its cache
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: String,
    // Characters of story text sent to the endpoint
    pub max_input_chars: usize,
    // Characters of story text used as the cache key
    pub cache_key_chars: usize,
    // Zero means unbounded
    pub cache_capacity: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            max_input_chars: 8000,
            cache_key_chars: 500,
            cache_capacity: 0,
        }
    }
}

impl EmbeddingConfig {
    /// Read `OPENAI_API_KEY`, `OPENAI_API_BASE`, `EMBEDDING_MODEL` and
    /// `EMBEDDING_CACHE_CAPACITY`, keeping defaults for anything unset
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            api_base: env::var("OPENAI_API_BASE").ok().filter(|b| !b.trim().is_empty()),
            model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            cache_capacity: crate::environment::get_env_var_or(
                "EMBEDDING_CACHE_CAPACITY",
                defaults.cache_capacity,
            ),
            ..defaults
        }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}
