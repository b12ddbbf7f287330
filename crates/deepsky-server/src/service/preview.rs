//! Preview resolution to base64 data URIs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use deepsky_core::preview_content_type;
use deepsky_opendal::ObjectStore;
use futures::{StreamExt, stream};

use super::TRACING_TARGET;

/// Resolves storage keys to inline `data:` URIs with bounded fan-out.
///
/// Fetch failures degrade to an empty string rather than failing the
/// surrounding request; a list endpoint stays usable when a single
/// preview object is missing.
#[derive(Debug, Clone)]
pub struct PreviewResolver {
    store: ObjectStore,
    concurrency: usize,
}

impl PreviewResolver {
    /// Creates a resolver over the given store.
    pub fn new(store: ObjectStore, concurrency: usize) -> Self {
        Self {
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetches one object and encodes it as a base64 data URI.
    ///
    /// Returns an empty string for blank keys and fetch failures.
    pub async fn data_uri(&self, key: &str) -> String {
        if key.trim().is_empty() {
            return String::new();
        }

        match self.store.get(key).await {
            Ok(bytes) => {
                let mime = preview_content_type(key);
                format!("data:{mime};base64,{}", BASE64.encode(bytes))
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    key,
                    error = %err,
                    "preview fetch failed"
                );
                String::new()
            }
        }
    }

    /// Resolves many keys concurrently, preserving input order.
    pub async fn resolve_many<T: Send>(&self, items: Vec<(T, String)>) -> Vec<(T, String)> {
        stream::iter(items)
            .map(|(item, key)| async move {
                let uri = self.data_uri(&key).await;
                (item, uri)
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use deepsky_core::CONTENT_TYPE_JPEG;

    use super::*;

    #[tokio::test]
    async fn resolves_stored_objects() -> anyhow::Result<()> {
        let store = ObjectStore::memory()?;
        store
            .put("images/a/resized.jpg", Bytes::from_static(b"abc"), CONTENT_TYPE_JPEG)
            .await?;

        let resolver = PreviewResolver::new(store, 4);
        let uri = resolver.data_uri("images/a/resized.jpg").await;
        assert_eq!(uri, "data:image/jpeg;base64,YWJj");
        Ok(())
    }

    #[tokio::test]
    async fn missing_objects_degrade_to_empty() -> anyhow::Result<()> {
        let resolver = PreviewResolver::new(ObjectStore::memory()?, 4);
        assert_eq!(resolver.data_uri("images/gone/resized.jpg").await, "");
        assert_eq!(resolver.data_uri("   ").await, "");
        Ok(())
    }

    #[tokio::test]
    async fn batch_resolution_preserves_order() -> anyhow::Result<()> {
        let store = ObjectStore::memory()?;
        store
            .put("images/a/resized.jpg", Bytes::from_static(b"a"), CONTENT_TYPE_JPEG)
            .await?;
        store
            .put("images/c/resized.jpg", Bytes::from_static(b"c"), CONTENT_TYPE_JPEG)
            .await?;

        let resolver = PreviewResolver::new(store, 2);
        let resolved = resolver
            .resolve_many(vec![
                ("first", "images/a/resized.jpg".to_string()),
                ("missing", "images/b/resized.jpg".to_string()),
                ("third", "images/c/resized.jpg".to_string()),
            ])
            .await;

        assert_eq!(resolved[0].0, "first");
        assert!(resolved[0].1.starts_with("data:image/jpeg;base64,"));
        assert_eq!(resolved[1], ("missing", String::new()));
        assert_eq!(resolved[2].0, "third");
        Ok(())
    }
}
