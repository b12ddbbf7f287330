//! Derived-asset publishing to object storage.

use bytes::Bytes;
use deepsky_core::{CONTENT_TYPE_JPEG, CONTENT_TYPE_XML, ImageNamespace, preview_content_type};
use deepsky_opendal::ObjectStore;
use deepsky_pyramid::GeneratedPyramid;
use futures::{StreamExt, TryStreamExt, stream};

use super::TRACING_TARGET;
use super::error::{PipelineError, PipelineResult};

/// Default bound on concurrent tile uploads.
pub(crate) const DEFAULT_TILE_CONCURRENCY: usize = 8;

/// Keys of a fully published derived-asset set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifacts {
    /// Key of the byte-for-byte full-resolution copy.
    pub full_copy_key: String,
    /// Key of the resized preview.
    pub preview_key: String,
    /// Key of the deep-zoom manifest.
    pub manifest_key: String,
    /// Number of pyramid tiles uploaded.
    pub tile_count: u64,
}

/// Publishes a generated pyramid plus its companions to object storage.
///
/// Upload order is fixed: full copy, preview, tiles, then the manifest
/// last. A reader that can fetch `output.dzi` can therefore resolve every
/// tile it references. After the manifest the publisher verifies that
/// every expected key exists before reporting success.
#[derive(Debug, Clone)]
pub struct ArtifactPublisher {
    store: ObjectStore,
    tile_concurrency: usize,
}

impl ArtifactPublisher {
    /// Creates a publisher over the given store.
    pub fn new(store: ObjectStore, tile_concurrency: usize) -> Self {
        Self {
            store,
            tile_concurrency: tile_concurrency.max(1),
        }
    }

    /// Returns the underlying object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Publishes the full copy, preview, tiles, and manifest for one image.
    ///
    /// A mid-publish failure leaves already-written artifacts in place;
    /// the caller must not insert a catalog row unless this returns `Ok`.
    pub async fn publish(
        &self,
        namespace: &ImageNamespace,
        source: Bytes,
        pyramid: &GeneratedPyramid,
    ) -> PipelineResult<PublishedArtifacts> {
        let full_copy_key = namespace.full_copy_key();
        let preview_key = namespace.preview_key();
        let manifest_key = namespace.manifest_key();

        self.store
            .put(&full_copy_key, source, CONTENT_TYPE_JPEG)
            .await?;

        self.store
            .put(
                &preview_key,
                Bytes::copy_from_slice(pyramid.preview()),
                preview_content_type(&preview_key),
            )
            .await?;

        let tile_coords = tile_coordinates(pyramid);
        stream::iter(tile_coords.iter().copied())
            .map(|(level, col, row)| async move {
                let path = pyramid.tile_path(level, col, row);
                let bytes = tokio::fs::read(&path).await?;
                self.store
                    .put(
                        &namespace.tile_key(level, col, row),
                        bytes.into(),
                        CONTENT_TYPE_JPEG,
                    )
                    .await?;
                Ok::<(), PipelineError>(())
            })
            .buffer_unordered(self.tile_concurrency)
            .try_collect::<Vec<()>>()
            .await?;

        // Manifest goes last: its visibility implies every tile is in place.
        self.store
            .put(
                &manifest_key,
                Bytes::from(pyramid.manifest().to_xml()),
                CONTENT_TYPE_XML,
            )
            .await?;

        self.verify(namespace, &tile_coords).await?;

        tracing::info!(
            target: TRACING_TARGET,
            namespace = %namespace,
            tiles = tile_coords.len(),
            "derived assets published"
        );

        Ok(PublishedArtifacts {
            full_copy_key,
            preview_key,
            manifest_key,
            tile_count: tile_coords.len() as u64,
        })
    }

    /// Checks that every expected key exists in storage.
    async fn verify(
        &self,
        namespace: &ImageNamespace,
        tile_coords: &[(u32, u32, u32)],
    ) -> PipelineResult<()> {
        let mut keys = Vec::with_capacity(tile_coords.len() + 3);
        keys.push(namespace.full_copy_key());
        keys.push(namespace.preview_key());
        keys.push(namespace.manifest_key());
        keys.extend(
            tile_coords
                .iter()
                .map(|&(level, col, row)| namespace.tile_key(level, col, row)),
        );

        let checks = stream::iter(keys)
            .map(|key| async move {
                let present = self.store.exists(&key).await?;
                Ok::<(String, bool), PipelineError>((key, present))
            })
            .buffer_unordered(self.tile_concurrency)
            .try_collect::<Vec<_>>()
            .await?;

        for (key, present) in checks {
            if !present {
                return Err(PipelineError::MissingArtifact { key });
            }
        }

        Ok(())
    }
}

/// Tile coordinates in deterministic order: levels ascending, row-major
/// within a level.
fn tile_coordinates(pyramid: &GeneratedPyramid) -> Vec<(u32, u32, u32)> {
    let layout = pyramid.layout();
    let mut coords = Vec::with_capacity(layout.total_tiles() as usize);

    for level in layout.levels() {
        let (cols, rows) = layout.tile_grid(level);
        for row in 0..rows {
            for col in 0..cols {
                coords.push((level, col, row));
            }
        }
    }

    coords
}

#[cfg(test)]
mod tests {
    use deepsky_pyramid::{DziManifest, PyramidGenerator};
    use image::{DynamicImage, RgbImage};

    use super::*;

    fn encoded_test_image(width: u32, height: u32) -> Vec<u8> {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([(x % 256) as u8, (y % 256) as u8, 128]);
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn publish_round_trip_on_memory_backend() -> anyhow::Result<()> {
        let source = encoded_test_image(600, 400);
        let namespace = ImageNamespace::derive("orion.png", &source);
        let pyramid = PyramidGenerator::new().generate(&source)?;
        let tile_count = pyramid.tile_count();

        let store = ObjectStore::memory()?;
        let publisher = ArtifactPublisher::new(store.clone(), DEFAULT_TILE_CONCURRENCY);
        let published = publisher
            .publish(&namespace, Bytes::from(source.clone()), &pyramid)
            .await?;

        assert_eq!(published.tile_count, tile_count);
        assert!(store.exists(&published.full_copy_key).await?);
        assert!(store.exists(&published.preview_key).await?);

        // The stored manifest parses back to the generator's layout, and
        // every tile it implies resolves.
        let manifest_xml = String::from_utf8(store.get(&published.manifest_key).await?)?;
        let manifest = DziManifest::parse(&manifest_xml)?;
        assert_eq!(manifest.width, 600);
        assert_eq!(manifest.height, 400);

        for (level, col, row) in tile_coordinates(&pyramid) {
            assert!(
                store.exists(&namespace.tile_key(level, col, row)).await?,
                "tile {level}/{col}_{row} missing"
            );
        }

        // The full copy is byte-for-byte the uploaded source.
        assert_eq!(store.get(&published.full_copy_key).await?, source);

        Ok(())
    }

    #[tokio::test]
    async fn tile_failure_leaves_full_copy_but_no_manifest() -> anyhow::Result<()> {
        let source = encoded_test_image(600, 400);
        let namespace = ImageNamespace::derive("orion.png", &source);
        let pyramid = PyramidGenerator::new().generate(&source)?;

        // Break one staged tile so the upload stage fails mid-publish.
        let (level, col, row) = *tile_coordinates(&pyramid).last().unwrap();
        std::fs::remove_file(pyramid.tile_path(level, col, row))?;

        let store = ObjectStore::memory()?;
        let publisher = ArtifactPublisher::new(store.clone(), DEFAULT_TILE_CONCURRENCY);
        let result = publisher
            .publish(&namespace, Bytes::from(source), &pyramid)
            .await;

        assert!(result.is_err());
        assert!(store.exists(&namespace.full_copy_key()).await?);
        assert!(!store.exists(&namespace.manifest_key()).await?);

        Ok(())
    }

    #[tokio::test]
    async fn tile_order_is_deterministic() -> anyhow::Result<()> {
        let source = encoded_test_image(300, 200);
        let pyramid = PyramidGenerator::new().generate(&source)?;

        let first = tile_coordinates(&pyramid);
        let second = tile_coordinates(&pyramid);
        assert_eq!(first, second);
        assert_eq!(first.len() as u64, pyramid.tile_count());

        // Coarsest level first.
        assert_eq!(first[0], (0, 0, 0));
        Ok(())
    }
}
