//! Ingestion orchestration: validation, generation, publish, commit.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use deepsky_core::ImageNamespace;
use deepsky_opendal::ObjectStore;
use deepsky_postgres::model::{Image, NewImage};
use deepsky_postgres::query::ImageRepository;
use deepsky_postgres::PgClient;
use deepsky_pyramid::PyramidGenerator;
use deepsky_rig::EmbeddingProvider;

use super::TRACING_TARGET;
use super::error::{PipelineError, PipelineResult};
use super::publisher::{ArtifactPublisher, DEFAULT_TILE_CONCURRENCY, PublishedArtifacts};

/// Tuning knobs for the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bound on concurrent tile uploads within one publish.
    pub tile_concurrency: usize,
    /// Deadline for decoding and tiling one image.
    pub generation_timeout: Duration,
    /// Deadline for publishing the full derived-asset set.
    pub publish_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tile_concurrency: DEFAULT_TILE_CONCURRENCY,
            generation_timeout: Duration::from_secs(60),
            publish_timeout: Duration::from_secs(120),
        }
    }
}

/// One validated upload, parsed from a multipart request.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Uploaded file name; only its sanitized stem and extension survive
    /// into storage keys.
    pub file_name: String,
    /// Raw uploaded bytes.
    pub bytes: Bytes,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Referenced category; zero stands for "not provided".
    pub category_id: i32,
}

impl IngestRequest {
    /// Rejects incomplete uploads before anything touches storage.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.bytes.is_empty()
            || self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.category_id == 0
        {
            return Err(PipelineError::validation("Missing required fields"));
        }

        if self.category_id < 0 {
            return Err(PipelineError::validation(
                "categoryId must be a positive integer",
            ));
        }

        Ok(())
    }
}

struct IngestPipelineInner {
    publisher: ArtifactPublisher,
    pg_client: PgClient,
    embeddings: EmbeddingProvider,
    generation_timeout: Duration,
    publish_timeout: Duration,
}

/// The ingestion pipeline, cheaply cloneable for handler state.
///
/// Stages run in order: validate, generate staging artifacts, publish
/// (full copy, preview, tiles, manifest last, verify), clean up staging,
/// then insert the catalog row as the commit marker.
#[derive(Clone)]
pub struct IngestPipeline {
    inner: Arc<IngestPipelineInner>,
}

impl IngestPipeline {
    /// Creates a pipeline over the given clients.
    pub fn new(
        store: ObjectStore,
        pg_client: PgClient,
        embeddings: EmbeddingProvider,
        config: PipelineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(IngestPipelineInner {
                publisher: ArtifactPublisher::new(store, config.tile_concurrency),
                pg_client,
                embeddings,
                generation_timeout: config.generation_timeout,
                publish_timeout: config.publish_timeout,
            }),
        }
    }

    /// Runs one upload through the full pipeline.
    ///
    /// Identical bytes derive identical namespaces, so re-ingesting the
    /// same file converges on the same keys instead of duplicating
    /// artifacts.
    pub async fn ingest(&self, request: IngestRequest) -> PipelineResult<Image> {
        request.validate()?;

        let namespace = ImageNamespace::derive(&request.file_name, &request.bytes);

        tracing::info!(
            target: TRACING_TARGET,
            namespace = %namespace,
            size = request.bytes.len(),
            "ingestion started"
        );

        let pyramid = self.generate(request.bytes.clone()).await?;
        let tile_count = pyramid.tile_count();

        let publish = self
            .inner
            .publisher
            .publish(&namespace, request.bytes.clone(), &pyramid);
        let published = match tokio::time::timeout(self.inner.publish_timeout, publish).await {
            Ok(outcome) => outcome,
            Err(_) => Err(PipelineError::StageTimeout { stage: "publish" }),
        };

        // Staging artifacts are removed whether the publish succeeded or not.
        if let Err(err) = pyramid.close() {
            tracing::warn!(
                target: TRACING_TARGET,
                namespace = %namespace,
                error = %err,
                "failed to remove staging directory"
            );
        }
        let published = published?;

        let image = self.commit(&request, published).await?;

        tracing::info!(
            target: TRACING_TARGET,
            namespace = %namespace,
            image_id = image.image_id,
            tiles = tile_count,
            "ingestion committed"
        );

        Ok(image)
    }

    /// Decodes and tiles the upload on the blocking pool.
    async fn generate(&self, bytes: Bytes) -> PipelineResult<deepsky_pyramid::GeneratedPyramid> {
        let generation =
            tokio::task::spawn_blocking(move || PyramidGenerator::new().generate(&bytes));

        match tokio::time::timeout(self.inner.generation_timeout, generation).await {
            Ok(Ok(outcome)) => Ok(outcome?),
            Ok(Err(join_error)) => Err(PipelineError::Unexpected(join_error.to_string().into())),
            // The blocking task keeps running after the deadline; its
            // staging directory is dropped when it finishes.
            Err(_) => Err(PipelineError::StageTimeout {
                stage: "generation",
            }),
        }
    }

    /// Computes the embedding (best effort) and inserts the catalog row.
    async fn commit(
        &self,
        request: &IngestRequest,
        published: PublishedArtifacts,
    ) -> PipelineResult<Image> {
        let prompt = format!("{} {}", request.title, request.description);
        let (ai_description, embedding_model) = match self.inner.embeddings.embed(&prompt).await {
            Ok(vector) => {
                let model = vector.model().to_string();
                (Some(vector.to_delimited()), Some(model))
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "embedding failed; storing the image without one"
                );
                (None, None)
            }
        };

        let new_image = NewImage {
            title: request.title.clone(),
            description: request.description.clone(),
            category_id: request.category_id,
            preview_image_url: published.preview_key,
            full_image_url: published.manifest_key,
            ai_description,
            embedding_model,
        };

        Ok(self.inner.pg_client.create_image(new_image).await?)
    }
}

impl std::fmt::Debug for IngestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestPipeline")
            .field("generation_timeout", &self.inner.generation_timeout)
            .field("publish_timeout", &self.inner.publish_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, description: &str, bytes: &[u8], category_id: i32) -> IngestRequest {
        IngestRequest {
            file_name: "orion.png".to_string(),
            bytes: Bytes::copy_from_slice(bytes),
            title: title.to_string(),
            description: description.to_string(),
            category_id,
        }
    }

    #[test]
    fn complete_request_passes_validation() {
        assert!(request("Orion", "A nebula", b"bytes", 3).validate().is_ok());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let cases = [
            request("", "A nebula", b"bytes", 3),
            request("Orion", "   ", b"bytes", 3),
            request("Orion", "A nebula", b"", 3),
            request("Orion", "A nebula", b"bytes", 0),
        ];

        for case in cases {
            match case.validate() {
                Err(PipelineError::Validation(message)) => {
                    assert_eq!(message, "Missing required fields");
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_category_is_rejected() {
        match request("Orion", "A nebula", b"bytes", -4).validate() {
            Err(PipelineError::Validation(message)) => {
                assert_eq!(message, "categoryId must be a positive integer");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
