use anyhow::{Context, Result};
use async_openai::{config::OpenAIConfig, types::CreateEmbeddingRequestArgs, Client};
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::vector::{char_prefix, EmbeddingConfig, TARGET_VECTOR};

/// Anything that can turn text into an embedding vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedding provider backed by an OpenAI-compatible embeddings endpoint
#[derive(Clone, Debug)]
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    max_input_chars: usize,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .context("OPENAI_API_KEY is required for the OpenAI embedder")?;
        anyhow::ensure!(!config.model.trim().is_empty(), "missing embedding model name");

        let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = &config.api_base {
            openai_config = openai_config.with_api_base(base);
        }

        info!(target: TARGET_VECTOR, "Using embedding model {}", config.model);

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            max_input_chars: config.max_input_chars,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let start_time = Instant::now();
        let input = char_prefix(text, self.max_input_chars);

        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.as_str())
            .input(input)
            .build()
            .context("Failed to build embedding request")?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .context("Embedding request failed")?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .context("Embedding response contained no data")?;

        debug!(
            target: TARGET_VECTOR,
            "Embedded {} chars into {} dimensions in {:?}",
            input.chars().count(),
            embedding.len(),
            start_time.elapsed()
        );

        Ok(embedding)
    }
}
