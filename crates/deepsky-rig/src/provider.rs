//! Embedding provider abstraction.

use std::sync::Arc;
use std::time::Duration;

use deepsky_core::EmbeddingVector;
use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
use rig::providers::openai;

use crate::TRACING_TARGET;
use crate::config::EmbeddingConfig;
use crate::error::{EmbedError, EmbedResult};
use crate::model::EmbeddingModel;

/// Attempts per embedding request, including the first.
const MAX_EMBED_ATTEMPTS: u32 = 2;

/// Embedding provider that wraps the rig OpenAI embedding model.
///
/// This is a cheaply cloneable wrapper around an `Arc` of the inner
/// service.
#[derive(Clone)]
pub struct EmbeddingProvider(Arc<EmbeddingService>);

struct EmbeddingService {
    model: openai::EmbeddingModel,
    model_ref: EmbeddingModel,
    timeout: Duration,
}

impl EmbeddingProvider {
    /// Connects the provider with the given configuration.
    pub fn connect(config: EmbeddingConfig) -> EmbedResult<Self> {
        let client = openai::Client::new(&config.openai_api_key)
            .map_err(|e| EmbedError::config(e.to_string()))?;

        let model_ref = config.embedding_model;
        let model =
            client.embedding_model_with_ndims(model_ref.as_str(), model_ref.dimensions());

        tracing::info!(
            target: TRACING_TARGET,
            model = model_ref.as_str(),
            ndims = model_ref.dimensions(),
            "embedding provider connected"
        );

        Ok(Self(Arc::new(EmbeddingService {
            model,
            model_ref,
            timeout: config.timeout(),
        })))
    }

    /// The model this provider embeds with.
    pub fn model(&self) -> EmbeddingModel {
        self.0.model_ref
    }

    /// The stored model tag for vectors produced by this provider.
    pub fn model_name(&self) -> &'static str {
        self.0.model_ref.as_str()
    }

    /// Embeds a single text, returning a model-tagged vector.
    ///
    /// Applies the configured timeout per attempt and retries once on
    /// provider failure. A vector of the wrong length is a hard error, not
    /// something to retry.
    pub async fn embed(&self, text: &str) -> EmbedResult<EmbeddingVector> {
        let service = self.0.as_ref();
        let expected = service.model_ref.dimensions();

        let mut attempt = 1u32;
        let embedding = loop {
            let request = RigEmbeddingModel::embed_text(&service.model, text);

            match tokio::time::timeout(service.timeout, request).await {
                Ok(Ok(embedding)) => break embedding,
                Ok(Err(err)) if attempt < MAX_EMBED_ATTEMPTS => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        attempt,
                        error = %err,
                        "embedding request failed, retrying"
                    );
                    attempt += 1;
                }
                Ok(Err(err)) => return Err(EmbedError::provider(err.to_string())),
                Err(_) => return Err(EmbedError::Timeout(service.timeout)),
            }
        };

        if embedding.vec.len() != expected {
            return Err(EmbedError::DimensionMismatch {
                expected,
                actual: embedding.vec.len(),
            });
        }

        tracing::debug!(
            target: TRACING_TARGET,
            model = service.model_ref.as_str(),
            chars = text.len(),
            "text embedded"
        );

        Ok(EmbeddingVector::new(service.model_ref.as_str(), embedding.vec))
    }
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("model", &self.0.model_ref.as_str())
            .field("timeout", &self.0.timeout)
            .finish()
    }
}
