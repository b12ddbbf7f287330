//! The DZI manifest descriptor.

use regex::Regex;

use crate::error::{PyramidError, PyramidResult};
use crate::layout::{PyramidLayout, TILE_OVERLAP, TILE_SIZE};

/// Deep-zoom schema namespace expected by standard viewers.
const DZI_XMLNS: &str = "http://schemas.microsoft.com/deepzoom/2008";

/// The XML descriptor naming a pyramid's tile size, overlap, format, and
/// native dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DziManifest {
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Overlap between neighboring tiles in pixels.
    pub overlap: u32,
    /// Tile encoding format, e.g. `jpeg`.
    pub format: String,
    /// Native width of the source image.
    pub width: u32,
    /// Native height of the source image.
    pub height: u32,
}

impl DziManifest {
    /// File name of the manifest inside the pyramid directory.
    pub const FILE_NAME: &'static str = "output.dzi";

    /// Builds the manifest for a layout with the default tile parameters.
    pub fn for_layout(layout: &PyramidLayout) -> Self {
        Self {
            tile_size: TILE_SIZE,
            overlap: TILE_OVERLAP,
            format: "jpeg".to_string(),
            width: layout.width(),
            height: layout.height(),
        }
    }

    /// Renders the manifest as UTF-8 XML.
    pub fn to_xml(&self) -> String {
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<Image xmlns=\"{xmlns}\" TileSize=\"{tile_size}\" ",
                "Overlap=\"{overlap}\" Format=\"{format}\">\n",
                "  <Size Width=\"{width}\" Height=\"{height}\"/>\n",
                "</Image>\n",
            ),
            xmlns = DZI_XMLNS,
            tile_size = self.tile_size,
            overlap = self.overlap,
            format = self.format,
            width = self.width,
            height = self.height,
        )
    }

    /// Parses a manifest previously written by [`DziManifest::to_xml`] or by
    /// another deep-zoom tiler.
    pub fn parse(xml: &str) -> PyramidResult<Self> {
        Ok(Self {
            tile_size: attr_u32(xml, "TileSize")?,
            overlap: attr_u32(xml, "Overlap")?,
            format: attr_string(xml, "Format")?,
            width: attr_u32(xml, "Width")?,
            height: attr_u32(xml, "Height")?,
        })
    }
}

fn attr_string(xml: &str, name: &'static str) -> PyramidResult<String> {
    // Attribute names come from a fixed, trusted set.
    let re = Regex::new(&format!("{name}=\"([A-Za-z0-9]+)\"")).expect("valid attribute pattern");
    re.captures(xml)
        .map(|c| c[1].to_string())
        .ok_or_else(|| PyramidError::Manifest(format!("missing attribute {name}")))
}

fn attr_u32(xml: &str, name: &'static str) -> PyramidResult<u32> {
    let value = attr_string(xml, name)?;
    value
        .parse()
        .map_err(|_| PyramidError::Manifest(format!("non-numeric attribute {name}={value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_round_trip() {
        let manifest = DziManifest::for_layout(&PyramidLayout::new(1000, 600));
        let parsed = DziManifest::parse(&manifest.to_xml()).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn xml_carries_the_deep_zoom_namespace() {
        let manifest = DziManifest::for_layout(&PyramidLayout::new(16, 16));
        assert!(manifest.to_xml().contains(DZI_XMLNS));
    }

    #[test]
    fn parse_rejects_missing_attributes() {
        let err = DziManifest::parse("<Image/>").unwrap_err();
        assert!(matches!(err, PyramidError::Manifest(_)));
    }
}
