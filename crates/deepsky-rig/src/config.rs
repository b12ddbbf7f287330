//! Embedding provider configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::error::{EmbedError, EmbedResult};
use crate::model::EmbeddingModel;
use crate::provider::EmbeddingProvider;

/// Configuration for the OpenAI embedding provider.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct EmbeddingConfig {
    /// OpenAI API key
    #[cfg_attr(
        feature = "config",
        arg(long = "openai-api-key", env = "OPENAI_API_KEY")
    )]
    pub openai_api_key: String,

    /// Embedding model used for descriptions and search queries
    #[cfg_attr(
        feature = "config",
        arg(
            long = "embedding-model",
            env = "EMBEDDING_MODEL",
            default_value = "text-embedding-3-large"
        )
    )]
    pub embedding_model: EmbeddingModel,

    /// Per-request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "embedding-timeout-secs",
            env = "EMBEDDING_TIMEOUT_SECS",
            default_value = "30"
        )
    )]
    pub embedding_timeout_secs: u64,
}

impl EmbeddingConfig {
    /// Creates a configuration with the default model and timeout.
    pub fn new(openai_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            embedding_model: EmbeddingModel::default(),
            embedding_timeout_secs: 30,
        }
    }

    /// Sets the embedding model.
    pub fn with_model(mut self, model: EmbeddingModel) -> Self {
        self.embedding_model = model;
        self
    }

    /// Returns the per-request timeout as a Duration.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.embedding_timeout_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> EmbedResult<()> {
        if self.openai_api_key.is_empty() {
            return Err(EmbedError::config("openai_api_key cannot be empty"));
        }
        if self.embedding_timeout_secs == 0 {
            return Err(EmbedError::config("embedding_timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Validates the configuration and connects the provider.
    pub fn connect(self) -> EmbedResult<EmbeddingProvider> {
        self.validate()?;
        EmbeddingProvider::connect(self)
    }
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("openai_api_key", &"***")
            .field("embedding_model", &self.embedding_model)
            .field("embedding_timeout_secs", &self.embedding_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EmbeddingConfig::new("sk-test");
        assert_eq!(config.embedding_model, EmbeddingModel::TextEmbedding3Large);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_api_key() {
        assert!(EmbeddingConfig::new("").validate().is_err());
    }

    #[test]
    fn debug_masks_the_api_key() {
        let rendered = format!("{:?}", EmbeddingConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
    }
}
