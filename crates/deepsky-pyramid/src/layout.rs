//! Deep-zoom level and tile grid math.

/// Edge length of a square tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Overlap between neighboring tiles in pixels.
pub const TILE_OVERLAP: u32 = 0;

/// Fixed width of the resized preview in pixels.
pub const PREVIEW_WIDTH: u32 = 384;

/// The level and tile grid geometry of one deep-zoom pyramid.
///
/// Level 0 holds the whole image inside a single coarsest tile; each
/// subsequent level doubles linear resolution up to the native dimensions at
/// the finest level. Edge tiles keep their exact remainder size, never
/// padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidLayout {
    width: u32,
    height: u32,
    tile_size: u32,
}

impl PyramidLayout {
    /// Creates the layout for a source image of the given native dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            tile_size: TILE_SIZE,
        }
    }

    /// Native width of the source image.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Native height of the source image.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile edge length.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Finest level index; the level count is `max_level() + 1`.
    ///
    /// Equals `ceil(log2(max(width, height)))`.
    pub fn max_level(&self) -> u32 {
        let longest = self.width.max(self.height).max(1);
        let mut level = 0;
        while (1u64 << level) < longest as u64 {
            level += 1;
        }
        level
    }

    /// Iterates levels from coarsest (0) to finest.
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = u32> {
        0..=self.max_level()
    }

    /// Image dimensions at a level, produced by repeated ceil-halving of the
    /// native dimensions.
    pub fn level_dimensions(&self, level: u32) -> (u32, u32) {
        debug_assert!(level <= self.max_level());
        let shift = self.max_level() - level;
        (ceil_shr(self.width, shift), ceil_shr(self.height, shift))
    }

    /// Tile grid at a level as `(columns, rows)`.
    pub fn tile_grid(&self, level: u32) -> (u32, u32) {
        let (w, h) = self.level_dimensions(level);
        (w.div_ceil(self.tile_size), h.div_ceil(self.tile_size))
    }

    /// Pixel rectangle of one tile at a level as `(x, y, width, height)`.
    ///
    /// Edge tiles are truncated to the level bounds.
    pub fn tile_rect(&self, level: u32, col: u32, row: u32) -> (u32, u32, u32, u32) {
        let (w, h) = self.level_dimensions(level);
        let x = col * self.tile_size;
        let y = row * self.tile_size;
        debug_assert!(x < w && y < h);
        (x, y, self.tile_size.min(w - x), self.tile_size.min(h - y))
    }

    /// Total number of tiles across every level.
    pub fn total_tiles(&self) -> u64 {
        self.levels()
            .map(|level| {
                let (cols, rows) = self.tile_grid(level);
                cols as u64 * rows as u64
            })
            .sum()
    }
}

/// `ceil(value / 2^shift)`, clamped to at least one pixel.
fn ceil_shr(value: u32, shift: u32) -> u32 {
    let divisor = 1u64 << shift;
    let out = (value as u64 + divisor - 1) >> shift;
    (out as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_level_is_ceil_log2_of_longest_edge() {
        assert_eq!(PyramidLayout::new(1, 1).max_level(), 0);
        assert_eq!(PyramidLayout::new(2, 2).max_level(), 1);
        assert_eq!(PyramidLayout::new(256, 256).max_level(), 8);
        assert_eq!(PyramidLayout::new(257, 100).max_level(), 9);
        assert_eq!(PyramidLayout::new(1000, 600).max_level(), 10);
    }

    #[test]
    fn level_zero_fits_in_one_tile() {
        let layout = PyramidLayout::new(10_000, 7_200);
        let (w, h) = layout.level_dimensions(0);
        assert!(w <= TILE_SIZE && h <= TILE_SIZE);
        assert_eq!(layout.tile_grid(0), (1, 1));
    }

    #[test]
    fn finest_level_is_native_resolution() {
        let layout = PyramidLayout::new(1000, 600);
        assert_eq!(layout.level_dimensions(layout.max_level()), (1000, 600));
    }

    #[test]
    fn each_level_doubles_linear_resolution() {
        let layout = PyramidLayout::new(1000, 600);
        for level in 1..=layout.max_level() {
            let (w_prev, _) = layout.level_dimensions(level - 1);
            let (w, _) = layout.level_dimensions(level);
            assert_eq!(w_prev, w.div_ceil(2));
        }
    }

    #[test]
    fn finest_level_tiles_cover_native_dimensions_exactly() {
        let layout = PyramidLayout::new(1000, 600);
        let level = layout.max_level();
        let (cols, rows) = layout.tile_grid(level);

        let covered_width: u32 = (0..cols)
            .map(|col| layout.tile_rect(level, col, 0).2)
            .sum();
        let covered_height: u32 = (0..rows)
            .map(|row| layout.tile_rect(level, 0, row).3)
            .sum();

        assert_eq!(covered_width, 1000);
        assert_eq!(covered_height, 600);
    }

    #[test]
    fn edge_tiles_are_truncated_not_padded() {
        let layout = PyramidLayout::new(600, 400);
        let level = layout.max_level();
        // 600x400 at the finest level: 3x2 grid.
        assert_eq!(layout.tile_grid(level), (3, 2));
        let (_, _, w, h) = layout.tile_rect(level, 2, 1);
        assert_eq!((w, h), (600 - 2 * TILE_SIZE, 400 - TILE_SIZE));
    }
}
