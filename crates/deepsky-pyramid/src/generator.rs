//! Tile pyramid generation into a local staging directory.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use tempfile::TempDir;

use crate::TRACING_TARGET;
use crate::error::{PyramidError, PyramidResult};
use crate::layout::{PREVIEW_WIDTH, PyramidLayout};
use crate::manifest::DziManifest;

/// JPEG quality used for pyramid tiles.
const TILE_QUALITY: u8 = 90;

/// JPEG quality used for the preview; re-encoded at maximum quality.
const PREVIEW_QUALITY: u8 = 100;

/// Directory holding the per-level tile directories.
const TILE_DIR: &str = "output_files";

/// Renders deep-zoom pyramids from decoded source images.
#[derive(Debug, Clone, Copy, Default)]
pub struct PyramidGenerator {
    _private: (),
}

/// A fully rendered pyramid staged on local disk, plus the preview bytes.
///
/// The staging directory is removed when the value is dropped; call
/// [`GeneratedPyramid::close`] to surface removal errors instead.
#[derive(Debug)]
pub struct GeneratedPyramid {
    staging: TempDir,
    layout: PyramidLayout,
    manifest: DziManifest,
    preview: Vec<u8>,
    tile_count: u64,
}

impl PyramidGenerator {
    /// Creates a generator with the default tile parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the source bytes and renders the full pyramid, the manifest,
    /// and the preview.
    ///
    /// Any decode failure aborts before a single file is written.
    pub fn generate(&self, bytes: &[u8]) -> PyramidResult<GeneratedPyramid> {
        let source = image::load_from_memory(bytes).map_err(PyramidError::Decode)?;
        let layout = PyramidLayout::new(source.width(), source.height());

        tracing::debug!(
            target: TRACING_TARGET,
            width = layout.width(),
            height = layout.height(),
            levels = layout.max_level() + 1,
            tiles = layout.total_tiles(),
            "rendering tile pyramid"
        );

        let staging = TempDir::with_prefix("deepsky-dzi-")?;

        let manifest = DziManifest::for_layout(&layout);
        fs::write(staging.path().join(DziManifest::FILE_NAME), manifest.to_xml())?;

        let preview = render_preview(&source)?;

        let mut tile_count = 0u64;
        let mut current = source;

        for level in layout.levels().rev() {
            let (width, height) = layout.level_dimensions(level);
            if (current.width(), current.height()) != (width, height) {
                current = current.resize_exact(width, height, FilterType::Lanczos3);
            }

            let level_dir = staging.path().join(TILE_DIR).join(level.to_string());
            fs::create_dir_all(&level_dir)?;

            let (cols, rows) = layout.tile_grid(level);
            for row in 0..rows {
                for col in 0..cols {
                    let (x, y, tile_w, tile_h) = layout.tile_rect(level, col, row);
                    let tile = current.crop_imm(x, y, tile_w, tile_h).to_rgb8();
                    write_jpeg(&level_dir.join(format!("{col}_{row}.jpeg")), &tile, TILE_QUALITY)?;
                    tile_count += 1;
                }
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            tiles = tile_count,
            "tile pyramid staged"
        );

        Ok(GeneratedPyramid {
            staging,
            layout,
            manifest,
            preview,
            tile_count,
        })
    }
}

impl GeneratedPyramid {
    /// Root of the staging directory.
    pub fn root(&self) -> &Path {
        self.staging.path()
    }

    /// Geometry of the rendered pyramid.
    pub fn layout(&self) -> &PyramidLayout {
        &self.layout
    }

    /// The rendered manifest.
    pub fn manifest(&self) -> &DziManifest {
        &self.manifest
    }

    /// JPEG bytes of the fixed-width preview.
    pub fn preview(&self) -> &[u8] {
        &self.preview
    }

    /// Number of tiles rendered across all levels.
    pub fn tile_count(&self) -> u64 {
        self.tile_count
    }

    /// Path of the staged manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.staging.path().join(DziManifest::FILE_NAME)
    }

    /// Path of one staged tile.
    pub fn tile_path(&self, level: u32, col: u32, row: u32) -> PathBuf {
        self.staging
            .path()
            .join(TILE_DIR)
            .join(level.to_string())
            .join(format!("{col}_{row}.jpeg"))
    }

    /// Removes the staging directory, surfacing any I/O error.
    pub fn close(self) -> std::io::Result<()> {
        self.staging.close()
    }
}

/// Renders the fixed-width preview, preserving aspect ratio.
fn render_preview(source: &DynamicImage) -> PyramidResult<Vec<u8>> {
    let height = ((source.height() as f64) * (PREVIEW_WIDTH as f64) / (source.width() as f64))
        .round()
        .max(1.0) as u32;

    let resized = source
        .resize_exact(PREVIEW_WIDTH, height, FilterType::Lanczos3)
        .to_rgb8();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, PREVIEW_QUALITY)
        .encode_image(&resized)
        .map_err(PyramidError::Encode)?;

    Ok(buf)
}

fn write_jpeg(path: &Path, tile: &RgbImage, quality: u8) -> PyramidResult<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode_image(tile)
        .map_err(PyramidError::Encode)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 600x400 gradient encoded as PNG.
    fn sample_png() -> Vec<u8> {
        let img = RgbImage::from_fn(600, 400, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        png
    }

    #[test]
    fn generates_every_level_and_tile() {
        let pyramid = PyramidGenerator::new().generate(&sample_png()).unwrap();
        let layout = *pyramid.layout();

        // ceil(log2(600)) = 10, so levels 0..=10.
        assert_eq!(layout.max_level(), 10);
        assert_eq!(pyramid.tile_count(), layout.total_tiles());

        for level in layout.levels() {
            let (cols, rows) = layout.tile_grid(level);
            for row in 0..rows {
                for col in 0..cols {
                    assert!(pyramid.tile_path(level, col, row).is_file());
                }
            }
        }
    }

    #[test]
    fn manifest_records_native_dimensions() {
        let pyramid = PyramidGenerator::new().generate(&sample_png()).unwrap();
        let xml = fs::read_to_string(pyramid.manifest_path()).unwrap();
        let manifest = DziManifest::parse(&xml).unwrap();
        assert_eq!((manifest.width, manifest.height), (600, 400));
        assert_eq!(manifest.tile_size, 256);
        assert_eq!(manifest.overlap, 0);
        assert_eq!(manifest.format, "jpeg");
    }

    #[test]
    fn finest_level_edge_tiles_keep_their_remainder_size() {
        let pyramid = PyramidGenerator::new().generate(&sample_png()).unwrap();
        let level = pyramid.layout().max_level();
        let bytes = fs::read(pyramid.tile_path(level, 2, 1)).unwrap();
        let tile = image::load_from_memory(&bytes).unwrap();
        assert_eq!((tile.width(), tile.height()), (600 - 512, 400 - 256));
    }

    #[test]
    fn preview_is_fixed_width_jpeg() {
        let pyramid = PyramidGenerator::new().generate(&sample_png()).unwrap();
        let preview = image::load_from_memory(pyramid.preview()).unwrap();
        assert_eq!(preview.width(), PREVIEW_WIDTH);
        // 400 * 384 / 600 = 256.
        assert_eq!(preview.height(), 256);
    }

    #[test]
    fn regeneration_is_idempotent() {
        let bytes = sample_png();
        let generator = PyramidGenerator::new();
        let first = generator.generate(&bytes).unwrap();
        let second = generator.generate(&bytes).unwrap();

        assert_eq!(first.layout(), second.layout());
        assert_eq!(first.tile_count(), second.tile_count());
        assert_eq!(first.manifest(), second.manifest());
        assert_eq!(
            fs::read(first.tile_path(0, 0, 0)).unwrap(),
            fs::read(second.tile_path(0, 0, 0)).unwrap()
        );
    }

    #[test]
    fn undecodable_bytes_fail_before_any_write() {
        let err = PyramidGenerator::new().generate(b"not an image").unwrap_err();
        assert!(matches!(err, PyramidError::Decode(_)));
    }

    #[test]
    fn close_removes_the_staging_directory() {
        let pyramid = PyramidGenerator::new().generate(&sample_png()).unwrap();
        let root = pyramid.root().to_path_buf();
        pyramid.close().unwrap();
        assert!(!root.exists());
    }
}
