//! Object storage backend selection.

use std::fmt;

use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use deepsky_opendal::{FsConfig, StorageConfig};
use serde::{Deserialize, Serialize};

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Local filesystem, primarily for development.
    Fs,
    /// In-memory store for tests.
    Memory,
    /// Google Cloud Storage.
    #[cfg(feature = "gcs")]
    Gcs,
    /// Amazon S3 compatible storage.
    #[cfg(feature = "s3")]
    S3,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fs => "fs",
            Self::Memory => "memory",
            #[cfg(feature = "gcs")]
            Self::Gcs => "gcs",
            #[cfg(feature = "s3")]
            Self::S3 => "s3",
        };
        f.write_str(name)
    }
}

/// Object storage configuration arguments.
///
/// The selected backend decides which of the remaining options are
/// required; [`StorageArgs::into_config`] enforces that.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageArgs {
    /// Storage backend holding the published artifacts.
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value = "fs")]
    pub storage_backend: StorageBackend,

    /// Directory acting as the bucket root (fs backend).
    #[arg(long, env = "STORAGE_FS_ROOT", default_value = "./data")]
    pub storage_fs_root: String,

    /// GCS bucket name (gcs backend).
    #[cfg(feature = "gcs")]
    #[arg(long, env = "GCS_BUCKET")]
    pub gcs_bucket: Option<String>,

    /// Path to a GCS service account credential file. Falls back to
    /// application default credentials when absent.
    #[cfg(feature = "gcs")]
    #[arg(long, env = "GCS_CREDENTIAL_PATH")]
    pub gcs_credential_path: Option<String>,

    /// S3 bucket name (s3 backend).
    #[cfg(feature = "s3")]
    #[arg(long, env = "S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// AWS region (s3 backend).
    #[cfg(feature = "s3")]
    #[arg(long, env = "S3_REGION")]
    pub s3_region: Option<String>,

    /// Custom endpoint URL for S3-compatible storage such as MinIO or R2.
    #[cfg(feature = "s3")]
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// S3 access key ID. Falls back to ambient AWS credentials when absent.
    #[cfg(feature = "s3")]
    #[arg(long, env = "S3_ACCESS_KEY_ID")]
    pub s3_access_key_id: Option<String>,

    /// S3 secret access key.
    #[cfg(feature = "s3")]
    #[arg(long, env = "S3_SECRET_ACCESS_KEY")]
    pub s3_secret_access_key: Option<String>,
}

impl StorageArgs {
    /// Converts the parsed arguments into a backend configuration.
    pub fn into_config(self) -> anyhow::Result<StorageConfig> {
        match self.storage_backend {
            StorageBackend::Fs => Ok(StorageConfig::Fs(FsConfig::new(self.storage_fs_root))),
            StorageBackend::Memory => Ok(StorageConfig::Memory),
            #[cfg(feature = "gcs")]
            StorageBackend::Gcs => self.into_gcs_config(),
            #[cfg(feature = "s3")]
            StorageBackend::S3 => self.into_s3_config(),
        }
    }

    #[cfg(feature = "gcs")]
    fn into_gcs_config(self) -> anyhow::Result<StorageConfig> {
        use deepsky_opendal::GcsConfig;

        let bucket = self
            .gcs_bucket
            .context("--gcs-bucket is required for the gcs backend")?;

        let mut config = GcsConfig::new(bucket);
        if let Some(path) = self.gcs_credential_path {
            config = config.with_credential_path(path);
        }

        Ok(StorageConfig::Gcs(config))
    }

    #[cfg(feature = "s3")]
    fn into_s3_config(self) -> anyhow::Result<StorageConfig> {
        use deepsky_opendal::S3Config;

        let bucket = self
            .s3_bucket
            .context("--s3-bucket is required for the s3 backend")?;
        let region = self
            .s3_region
            .context("--s3-region is required for the s3 backend")?;

        let mut config = S3Config::new(bucket, region);
        if let Some(endpoint) = self.s3_endpoint {
            config = config.with_endpoint(endpoint);
        }

        match (self.s3_access_key_id, self.s3_secret_access_key) {
            (Some(id), Some(secret)) => config = config.with_credentials(id, secret),
            (None, None) => {}
            _ => bail!("--s3-access-key-id and --s3-secret-access-key must be provided together"),
        }

        Ok(StorageConfig::S3(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(backend: StorageBackend) -> StorageArgs {
        StorageArgs {
            storage_backend: backend,
            storage_fs_root: "./data".to_string(),
            #[cfg(feature = "gcs")]
            gcs_bucket: None,
            #[cfg(feature = "gcs")]
            gcs_credential_path: None,
            #[cfg(feature = "s3")]
            s3_bucket: None,
            #[cfg(feature = "s3")]
            s3_region: None,
            #[cfg(feature = "s3")]
            s3_endpoint: None,
            #[cfg(feature = "s3")]
            s3_access_key_id: None,
            #[cfg(feature = "s3")]
            s3_secret_access_key: None,
        }
    }

    #[test]
    fn fs_backend_uses_the_configured_root() {
        let config = args(StorageBackend::Fs).into_config().unwrap();
        assert_eq!(config, StorageConfig::Fs(FsConfig::new("./data")));
    }

    #[test]
    fn memory_backend_needs_no_options() {
        let config = args(StorageBackend::Memory).into_config().unwrap();
        assert_eq!(config, StorageConfig::Memory);
    }

    #[cfg(feature = "gcs")]
    #[test]
    fn gcs_backend_requires_a_bucket() {
        assert!(args(StorageBackend::Gcs).into_config().is_err());

        let mut with_bucket = args(StorageBackend::Gcs);
        with_bucket.gcs_bucket = Some("deepsky-public".to_string());
        assert!(with_bucket.into_config().is_ok());
    }

    #[cfg(feature = "s3")]
    #[test]
    fn s3_backend_requires_bucket_and_region() {
        let mut incomplete = args(StorageBackend::S3);
        incomplete.s3_bucket = Some("deepsky-public".to_string());
        assert!(incomplete.into_config().is_err());

        let mut complete = args(StorageBackend::S3);
        complete.s3_bucket = Some("deepsky-public".to_string());
        complete.s3_region = Some("us-east-1".to_string());
        assert!(complete.into_config().is_ok());
    }

    #[cfg(feature = "s3")]
    #[test]
    fn s3_credentials_must_be_paired() {
        let mut partial = args(StorageBackend::S3);
        partial.s3_bucket = Some("deepsky-public".to_string());
        partial.s3_region = Some("us-east-1".to_string());
        partial.s3_access_key_id = Some("AKIA...".to_string());
        assert!(partial.into_config().is_err());
    }
}
