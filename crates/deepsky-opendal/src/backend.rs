//! Object store implementation.

use std::time::Duration;

use bytes::Bytes;
use opendal::{Operator, services};

use crate::TRACING_TARGET;
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};

/// Maximum number of attempts for a single write.
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Backoff before the second attempt; doubles on each subsequent one.
const WRITE_BACKOFF_BASE: Duration = Duration::from_millis(200);

/// Unified object store that wraps OpenDAL operators.
///
/// Writes carry an explicit content type and retry transient backend
/// failures with exponential backoff.
#[derive(Clone)]
pub struct ObjectStore {
    operator: Operator,
    config: StorageConfig,
}

impl ObjectStore {
    /// Creates a new object store from configuration.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let operator = Self::create_operator(&config)?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = config.backend_name(),
            "object store initialized"
        );

        Ok(Self { operator, config })
    }

    /// Creates an in-memory store for tests.
    pub fn memory() -> StorageResult<Self> {
        Self::new(StorageConfig::Memory)
    }

    /// Returns the configuration for this store.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Writes an object with the given content type.
    ///
    /// Transient failures are retried up to [`MAX_WRITE_ATTEMPTS`] times;
    /// permanent failures surface immediately.
    pub async fn put(&self, path: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        let mut attempt = 1u32;

        loop {
            let outcome = self
                .operator
                .write_with(path, data.clone())
                .content_type(content_type)
                .await;

            match outcome {
                Ok(_) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        path = %path,
                        size = data.len(),
                        attempt,
                        "object written"
                    );
                    return Ok(());
                }
                Err(err) if err.is_temporary() && attempt < MAX_WRITE_ATTEMPTS => {
                    let backoff = WRITE_BACKOFF_BASE * 2u32.pow(attempt - 1);
                    tracing::warn!(
                        target: TRACING_TARGET,
                        path = %path,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "transient write failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) if attempt > 1 => {
                    return Err(StorageError::WriteExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Reads an object into memory.
    pub async fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        Ok(self.operator.read(path).await?.to_vec())
    }

    /// Checks whether an object exists.
    pub async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.operator.exists(path).await?)
    }

    /// Lists every object path under a prefix.
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        use futures::TryStreamExt;

        let entries: Vec<_> = self
            .operator
            .lister_with(prefix)
            .recursive(true)
            .await?
            .try_collect()
            .await?;

        Ok(entries
            .into_iter()
            .filter(|e| !e.path().ends_with('/'))
            .map(|e| e.path().to_string())
            .collect())
    }

    /// Removes every object under a prefix.
    pub async fn remove_all(&self, prefix: &str) -> StorageResult<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            prefix = %prefix,
            "removing objects"
        );

        self.operator.remove_all(prefix).await?;

        Ok(())
    }

    /// Creates an OpenDAL operator based on configuration.
    fn create_operator(config: &StorageConfig) -> StorageResult<Operator> {
        match config {
            #[cfg(feature = "gcs")]
            StorageConfig::Gcs(gcs) => {
                let mut builder = services::Gcs::default().bucket(&gcs.bucket);

                if let Some(ref credential_path) = gcs.credential_path {
                    builder = builder.credential_path(credential_path);
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            #[cfg(feature = "s3")]
            StorageConfig::S3(s3) => {
                let mut builder = services::S3::default().bucket(&s3.bucket).region(&s3.region);

                if let Some(ref endpoint) = s3.endpoint {
                    builder = builder.endpoint(endpoint);
                }

                if let Some(ref access_key_id) = s3.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }

                if let Some(ref secret_access_key) = s3.secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            StorageConfig::Fs(fs) => {
                let builder = services::Fs::default().root(&fs.root);

                Operator::new(builder)
                    .map(|op| op.finish())
                    .map_err(|e| StorageError::init(e.to_string()))
            }

            StorageConfig::Memory => Operator::new(services::Memory::default())
                .map(|op| op.finish())
                .map_err(|e| StorageError::init(e.to_string())),
        }
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("backend", &self.config.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = ObjectStore::memory().unwrap();
        store
            .put("images/ngc-1976/full.jpg", Bytes::from_static(b"jpeg"), "image/jpeg")
            .await
            .unwrap();

        assert!(store.exists("images/ngc-1976/full.jpg").await.unwrap());
        assert_eq!(store.get("images/ngc-1976/full.jpg").await.unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = ObjectStore::memory().unwrap();
        assert!(!store.exists("images/missing/full.jpg").await.unwrap());

        let err = store.get("images/missing/full.jpg").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_returns_only_objects_under_the_prefix() {
        let store = ObjectStore::memory().unwrap();
        for path in [
            "images/a/full.jpg",
            "images/a/a_dzi/output.dzi",
            "images/b/full.jpg",
        ] {
            store.put(path, Bytes::from_static(b"x"), "image/jpeg").await.unwrap();
        }

        let mut listed = store.list("images/a/").await.unwrap();
        listed.sort();
        assert_eq!(listed, vec!["images/a/a_dzi/output.dzi", "images/a/full.jpg"]);
    }

    #[tokio::test]
    async fn remove_all_clears_the_prefix() {
        let store = ObjectStore::memory().unwrap();
        store.put("images/a/full.jpg", Bytes::from_static(b"x"), "image/jpeg").await.unwrap();
        store.put("images/a/resized.jpg", Bytes::from_static(b"x"), "image/jpeg").await.unwrap();

        store.remove_all("images/a/").await.unwrap();
        assert!(store.list("images/a/").await.unwrap().is_empty());
    }
}
