//! Rectangular pixel regions processed as one scheduling unit.

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// A rectangular region of the image, already clipped to the image edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's first column
    pub x: u32,
    /// Y coordinate of the tile's first row
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    /// Create a `size` x `size` tile at (x, y) clipped to a `image_width` x
    /// `image_height` image. Tiles starting past an edge are empty.
    pub fn clipped(x: u32, y: u32, size: u32, image_width: u32, image_height: u32) -> Self {
        Self {
            x,
            y,
            width: size.min(image_width.saturating_sub(x)),
            height: size.min(image_height.saturating_sub(y)),
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Row-major pixel coordinates covered by the tile.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let Tile { x, y, width, height } = *self;
        (y..y + height).flat_map(move |py| (x..x + width).map(move |px| (px, py)))
    }
}
