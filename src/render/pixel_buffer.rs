//! Borrowed view of the color buffer for presentation.
//!
//! Bundles the bytes with the layout facts a blitter needs (width, row
//! stride, height, bytes per pixel and channel order). Rows are stored
//! bottom-up: row 0 is the bottom of the image.

use super::color::Rgb8;

/// Bytes per stored pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Byte order of the three channels inside a stored pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Blue, green, red. What device-independent bitmaps expect.
    #[default]
    Bgr,
    /// Red, green, blue.
    Rgb,
}

impl ChannelOrder {
    #[inline]
    pub fn encode(self, color: Rgb8) -> [u8; BYTES_PER_PIXEL] {
        match self {
            ChannelOrder::Bgr => [color.b, color.g, color.r],
            ChannelOrder::Rgb => [color.r, color.g, color.b],
        }
    }

    #[inline]
    pub fn decode(self, bytes: [u8; BYTES_PER_PIXEL]) -> Rgb8 {
        match self {
            ChannelOrder::Bgr => Rgb8::new(bytes[2], bytes[1], bytes[0]),
            ChannelOrder::Rgb => Rgb8::new(bytes[0], bytes[1], bytes[2]),
        }
    }
}

/// Rounds a pixel width up to the next multiple of four.
#[inline]
pub fn padded_line_width(width: u32) -> u32 {
    width.div_ceil(4) * 4
}

/// A read-only view into a packed 24-bit color buffer.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    bytes: &'a [u8],
    width: u32,
    height: u32,
    line_width: u32,
    channel_order: ChannelOrder,
}

impl<'a> PixelBuffer<'a> {
    /// # Panics
    /// Panics in debug builds if `bytes` does not hold `line_width * height` pixels.
    pub fn new(
        bytes: &'a [u8],
        width: u32,
        height: u32,
        line_width: u32,
        channel_order: ChannelOrder,
    ) -> Self {
        debug_assert_eq!(
            bytes.len(),
            line_width as usize * height as usize * BYTES_PER_PIXEL,
            "Color buffer size doesn't match dimensions"
        );
        Self {
            bytes,
            width,
            height,
            line_width,
            channel_order,
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes from the start of one row to the next.
    pub fn stride_bytes(&self) -> usize {
        self.line_width as usize * BYTES_PER_PIXEL
    }

    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Get the color at (x, y), or None if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride_bytes() + x as usize * BYTES_PER_PIXEL;
        let bytes = self.bytes.get(offset..offset + BYTES_PER_PIXEL)?;
        Some(self.channel_order.decode([bytes[0], bytes[1], bytes[2]]))
    }
}
