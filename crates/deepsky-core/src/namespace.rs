//! Per-image storage namespaces and deterministic key derivation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Storage prefix shared by all image namespaces.
const KEY_ROOT: &str = "images";

/// Number of hex characters of the content hash kept in the slug.
const HASH_PREFIX_LEN: usize = 12;

/// Maximum length of the sanitized file stem in the slug.
const MAX_STEM_LEN: usize = 64;

/// Fallback stem when sanitization leaves nothing usable.
const DEFAULT_STEM: &str = "image";

/// Fallback extension for the preview key.
const DEFAULT_EXTENSION: &str = "jpg";

/// The storage key prefix grouping all derived artifacts for one source image.
///
/// The slug combines the sanitized upload file stem with a content-hash
/// prefix, so identical bytes converge on identical keys while distinct
/// uploads can never collide on a shared file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageNamespace {
    slug: String,
    extension: String,
}

impl ImageNamespace {
    /// Derives the namespace for an upload from its file name and bytes.
    pub fn derive(file_name: &str, bytes: &[u8]) -> Self {
        let path = std::path::Path::new(file_name);

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(sanitize)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STEM.to_string());

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(sanitize)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

        let digest = Sha256::digest(bytes);
        let hash = hex::encode(&digest[..HASH_PREFIX_LEN / 2]);

        let namespace = Self {
            slug: format!("{stem}-{hash}"),
            extension,
        };

        tracing::debug!(
            target: crate::TRACING_TARGET,
            file_name,
            slug = %namespace.slug,
            "derived image namespace"
        );

        namespace
    }

    /// Returns the namespace slug.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Returns the sanitized extension of the uploaded file name.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Key prefix under which every artifact of this image lives.
    pub fn prefix(&self) -> String {
        format!("{KEY_ROOT}/{}/", self.slug)
    }

    /// Key of the byte-for-byte full-resolution copy.
    pub fn full_copy_key(&self) -> String {
        format!("{KEY_ROOT}/{}/full.jpg", self.slug)
    }

    /// Key of the resized preview.
    pub fn preview_key(&self) -> String {
        format!("{KEY_ROOT}/{}/resized.{}", self.slug, self.extension)
    }

    /// Key of the deep-zoom manifest.
    pub fn manifest_key(&self) -> String {
        format!("{KEY_ROOT}/{slug}/{slug}_dzi/output.dzi", slug = self.slug)
    }

    /// Key of one pyramid tile.
    pub fn tile_key(&self, level: u32, col: u32, row: u32) -> String {
        format!(
            "{KEY_ROOT}/{slug}/{slug}_dzi/output_files/{level}/{col}_{row}.jpeg",
            slug = self.slug
        )
    }
}

impl std::fmt::Display for ImageNamespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.slug)
    }
}

/// Lowercases and strips everything outside `[a-z0-9_-]`, collapsing runs of
/// separators.
fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len().min(MAX_STEM_LEN));
    let mut last_dash = false;

    for ch in input.chars() {
        if out.len() >= MAX_STEM_LEN {
            break;
        }
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
            last_dash = false;
        } else if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }

    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_share_a_slug() {
        let a = ImageNamespace::derive("orion.png", b"same-bytes");
        let b = ImageNamespace::derive("orion.png", b"same-bytes");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_bytes_never_collide() {
        let a = ImageNamespace::derive("orion.png", b"first");
        let b = ImageNamespace::derive("orion.png", b"second");
        assert_ne!(a.slug(), b.slug());
    }

    #[test]
    fn strips_path_unsafe_characters() {
        let ns = ImageNamespace::derive("../..//Hubble Deep Field!.JPG", b"bytes");
        assert!(ns.slug().starts_with("hubble-deep-field"));
        assert_eq!(ns.extension(), "jpg");
        assert!(!ns.prefix().contains(".."));
    }

    #[test]
    fn empty_stem_falls_back() {
        let ns = ImageNamespace::derive("....", b"bytes");
        assert!(ns.slug().starts_with(DEFAULT_STEM));
        assert_eq!(ns.extension(), DEFAULT_EXTENSION);
    }

    #[test]
    fn key_shapes_match_the_catalog_layout() {
        let ns = ImageNamespace::derive("orion.png", b"bytes");
        let slug = ns.slug().to_string();
        assert_eq!(ns.full_copy_key(), format!("images/{slug}/full.jpg"));
        assert_eq!(ns.preview_key(), format!("images/{slug}/resized.png"));
        assert_eq!(
            ns.manifest_key(),
            format!("images/{slug}/{slug}_dzi/output.dzi")
        );
        assert_eq!(
            ns.tile_key(9, 2, 1),
            format!("images/{slug}/{slug}_dzi/output_files/9/2_1.jpeg")
        );
    }
}
