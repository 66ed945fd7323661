use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::{BoundedCache, Cache, MemoryCache};
use crate::vector::{char_prefix, EmbeddingConfig, EmbeddingProvider, TARGET_VECTOR};

/// Memoising wrapper around an [`EmbeddingProvider`]
///
/// Vectors are cached under the first `key_chars` characters of the text, so
/// two stories sharing that prefix share one remote call. Provider failures are
/// logged and turned into an empty vector, which downstream similarity treats
/// as zero: an outage under-filters rather than blocking publication.
#[derive(Clone)]
pub struct CachedEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    cache: Arc<dyn Cache<String, Vec<f32>>>,
    key_chars: usize,
}

impl CachedEmbedder {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        cache: Arc<dyn Cache<String, Vec<f32>>>,
    ) -> Self {
        Self {
            provider,
            cache,
            key_chars: EmbeddingConfig::default().cache_key_chars,
        }
    }

    /// Build with the cache flavour selected by `config.cache_capacity`
    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &EmbeddingConfig) -> Self {
        let cache: Arc<dyn Cache<String, Vec<f32>>> = if config.cache_capacity == 0 {
            Arc::new(MemoryCache::new())
        } else {
            Arc::new(BoundedCache::new(config.cache_capacity))
        };

        Self {
            provider,
            cache,
            key_chars: config.cache_key_chars,
        }
    }

    pub fn cache(&self) -> &Arc<dyn Cache<String, Vec<f32>>> {
        &self.cache
    }

    /// Embed `text`, returning an empty vector if the provider fails
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        let cache_key = char_prefix(text, self.key_chars).to_string();

        if let Some(embedding) = self.cache.get(&cache_key) {
            debug!(target: TARGET_VECTOR, "Embedding cache hit ({} cached)", self.cache.len());
            return embedding;
        }

        match self.provider.embed(text).await {
            Ok(embedding) if !embedding.is_empty() => {
                self.cache.set(cache_key, embedding.clone());
                embedding
            }
            Ok(_) => {
                warn!(target: TARGET_VECTOR, "Embedding provider returned an empty vector");
                Vec::new()
            }
            Err(e) => {
                warn!(target: TARGET_VECTOR, "Embedding API error: {:#}", e);
                Vec::new()
            }
        }
    }
}
