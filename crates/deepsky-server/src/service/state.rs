//! Shared service state with dependency injection for handlers.

use axum::extract::FromRef;
use deepsky_opendal::ObjectStore;
use deepsky_postgres::PgClient;
use deepsky_rig::EmbeddingProvider;
use url::Url;

use super::TRACING_TARGET;
use super::config::ServiceConfig;
use super::error::ServiceResult;
use super::preview::PreviewResolver;
use super::search::SemanticSearch;
use crate::pipeline::IngestPipeline;

/// The public base URL under which published storage keys are reachable.
///
/// Keys are joined by string concatenation, not URL resolution: a base of
/// `https://cdn.example.com/bucket/` and a key of `images/a/output.dzi`
/// always yields `https://cdn.example.com/bucket/images/a/output.dzi`.
#[derive(Debug, Clone)]
pub struct PublicBucketUrl(Url);

impl PublicBucketUrl {
    /// Wraps a base URL.
    pub fn new(base: Url) -> Self {
        Self(base)
    }

    /// Joins a storage key onto the base.
    pub fn join_key(&self, key: &str) -> String {
        let base = self.0.as_str();
        let key = key.trim_start_matches('/');
        if base.ends_with('/') {
            format!("{base}{key}")
        } else {
            format!("{base}/{key}")
        }
    }
}

/// Aggregated application state shared across all handlers.
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    object_store: ObjectStore,
    embedding_provider: EmbeddingProvider,
    preview_resolver: PreviewResolver,
    semantic_search: SemanticSearch,
    ingest_pipeline: IngestPipeline,
    public_bucket_url: PublicBucketUrl,
}

impl ServiceState {
    /// Builds all clients and services from the configuration.
    ///
    /// Postgres connections are established lazily by the pool; this
    /// constructor performs no network I/O. Migrations run separately at
    /// startup via [`deepsky_postgres::run_pending_migrations`].
    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        let pg_client = config.connect_postgres()?;
        let object_store = config.connect_storage()?;
        let embedding_provider = config.connect_embeddings()?;

        let preview_resolver =
            PreviewResolver::new(object_store.clone(), config.preview_concurrency);
        let semantic_search = SemanticSearch::new(pg_client.clone(), embedding_provider.clone());
        let ingest_pipeline = IngestPipeline::new(
            object_store.clone(),
            pg_client.clone(),
            embedding_provider.clone(),
            config.pipeline_config(),
        );

        tracing::info!(
            target: TRACING_TARGET,
            storage = config.storage.backend_name(),
            "service state initialized"
        );

        Ok(Self {
            pg_client,
            object_store,
            embedding_provider,
            preview_resolver,
            semantic_search,
            ingest_pipeline,
            public_bucket_url: PublicBucketUrl::new(config.public_bucket_url.clone()),
        })
    }
}

/// Implements [`FromRef`] for each field so handlers can extract the
/// clients they need directly.
macro_rules! impl_di {
    ($($field:ident: $ty:ty),+ $(,)?) => {$(
        impl FromRef<ServiceState> for $ty {
            fn from_ref(state: &ServiceState) -> Self {
                state.$field.clone()
            }
        }
    )+};
}

impl_di![
    pg_client: PgClient,
    object_store: ObjectStore,
    embedding_provider: EmbeddingProvider,
    preview_resolver: PreviewResolver,
    semantic_search: SemanticSearch,
    ingest_pipeline: IngestPipeline,
    public_bucket_url: PublicBucketUrl,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_key_concatenates() {
        let base = PublicBucketUrl::new(
            "https://storage.googleapis.com/deepsky-public/".parse().unwrap(),
        );
        assert_eq!(
            base.join_key("images/orion-abc/orion-abc_dzi/output.dzi"),
            "https://storage.googleapis.com/deepsky-public/images/orion-abc/orion-abc_dzi/output.dzi"
        );
    }

    #[test]
    fn join_key_inserts_missing_slash() {
        let base = PublicBucketUrl::new("https://cdn.example.com/bucket".parse().unwrap());
        assert_eq!(
            base.join_key("/images/a/full.jpg"),
            "https://cdn.example.com/bucket/images/a/full.jpg"
        );
    }

    #[test]
    fn state_builds_from_default_config() {
        let state = ServiceState::from_config(&ServiceConfig::default()).unwrap();
        let _pg = PgClient::from_ref(&state);
        let _store = ObjectStore::from_ref(&state);
        let _pipeline = IngestPipeline::from_ref(&state);
    }
}
