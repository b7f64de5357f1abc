//! Per-pixel ray generation into a packed 24-bit color buffer.
//!
//! Provides the [`RayTracer`] struct which owns the color buffer and writes
//! one visualized ray direction per pixel.

use super::color::{direction_to_color, Rgb8};
use super::pixel_buffer::{padded_line_width, ChannelOrder, PixelBuffer, BYTES_PER_PIXEL};
use super::tile::Tile;
use crate::error::RenderError;
use crate::math::{Mat4, Vec4};

/// Computes the color for pixel (x, y) under `ray_matrix`.
///
/// The pixel center `(x + 0.5, y + 0.5, 0, 1)` is pushed through the matrix
/// and the resulting direction is normalized before being mapped to a color.
#[inline]
pub fn compute_ray_color(ray_matrix: &Mat4, x: u32, y: u32) -> Rgb8 {
    let center = Vec4::point(x as f32 + 0.5, y as f32 + 0.5, 0.0);
    let direction = (*ray_matrix * center).to_vec3().normalize();
    direction_to_color(direction)
}

#[derive(Debug, Default)]
pub struct RayTracer {
    color_buffer: Vec<u8>,
    width: u32,
    height: u32,
    /// Row length in pixels, padded to a multiple of four.
    line_width: u32,
    channel_order: ChannelOrder,
}

impl RayTracer {
    /// Creates an empty tracer. Nothing is drawn until [`RayTracer::resize`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel_order(channel_order: ChannelOrder) -> Self {
        Self {
            channel_order,
            ..Self::default()
        }
    }

    /// Reallocates the color buffer for a new image size.
    ///
    /// The previous buffer is released first. Non-positive dimensions leave
    /// the tracer empty and every later trace is a no-op. Allocation failure
    /// is reported instead of leaving a half-sized buffer behind.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), RenderError> {
        self.color_buffer = Vec::new();
        self.width = 0;
        self.height = 0;
        self.line_width = 0;

        if width <= 0 || height <= 0 {
            log::warn!("viewport {width}x{height} is empty, color buffer released");
            return Ok(());
        }

        let (width, height) = (width as u32, height as u32);
        let line_width = padded_line_width(width);
        let allocation_failed = |bytes| RenderError::Allocation {
            bytes,
            width,
            height,
        };
        let bytes = (line_width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| allocation_failed(usize::MAX))?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|_| allocation_failed(bytes))?;
        buffer.resize(bytes, 0);

        self.color_buffer = buffer;
        self.width = width;
        self.height = height;
        self.line_width = line_width;

        log::debug!("color buffer resized to {width}x{height} ({bytes} bytes)");
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.color_buffer.is_empty()
    }

    /// Zeroes the whole buffer, padding included.
    pub fn clear(&mut self) {
        self.color_buffer.fill(0);
    }

    /// Writes the ray color for pixel (x, y). Out-of-bounds pixels are ignored.
    #[inline]
    pub fn trace_pixel(&mut self, ray_matrix: &Mat4, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let color = compute_ray_color(ray_matrix, x, y);
        let offset = (y as usize * self.line_width as usize + x as usize) * BYTES_PER_PIXEL;
        self.color_buffer[offset..offset + BYTES_PER_PIXEL]
            .copy_from_slice(&self.channel_order.encode(color));
    }

    /// Traces every pixel of `tile` in row-major order.
    pub fn trace_tile(&mut self, ray_matrix: &Mat4, tile: &Tile) {
        for (x, y) in tile.pixels() {
            self.trace_pixel(ray_matrix, x, y);
        }
    }

    /// Returns the buffer and its layout for presentation.
    pub fn pixel_buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer::new(
            &self.color_buffer,
            self.width,
            self.height,
            self.line_width,
            self.channel_order,
        )
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, value: u8) {
        self.color_buffer.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::math::Vec3;

    #[test]
    fn resize_pads_rows_to_four_pixels() {
        let mut tracer = RayTracer::new();
        for (w, h) in [(4, 4), (5, 3), (1, 1), (799, 600)] {
            tracer.resize(w, h).unwrap();
            let view = tracer.pixel_buffer();
            let stride = padded_line_width(w as u32) as usize;
            assert_eq!(view.bytes().len(), stride * h as usize * 3);
            assert_eq!(view.stride_bytes(), stride * 3);
            assert_eq!((view.width(), view.height()), (w as u32, h as u32));
        }
    }

    #[test]
    fn non_positive_dimensions_leave_tracer_empty() {
        let mut tracer = RayTracer::new();
        tracer.resize(8, 8).unwrap();

        for (w, h) in [(0, 8), (8, 0), (-3, 5), (5, -1), (0, 0)] {
            tracer.resize(w, h).unwrap();
            assert!(tracer.is_empty());
            assert_eq!((tracer.width(), tracer.height()), (0, 0));
        }

        // Tracing into an empty tracer does nothing.
        tracer.trace_pixel(&Mat4::identity(), 0, 0);
        tracer.clear();
        assert!(tracer.pixel_buffer().is_empty());
    }

    #[test]
    fn oversized_resize_reports_allocation_failure() {
        let mut tracer = RayTracer::new();
        tracer.resize(8, 8).unwrap();

        let err = tracer.resize(i32::MAX, i32::MAX).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Allocation {
                width: 2_147_483_647,
                height: 2_147_483_647,
                ..
            }
        ));
        assert!(tracer.is_empty());
        assert_eq!((tracer.width(), tracer.height()), (0, 0));

        tracer.resize(2, 2).unwrap();
        assert_eq!(tracer.pixel_buffer().bytes().len(), 4 * 2 * 3);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut tracer = RayTracer::new();
        tracer.resize(3, 2).unwrap();
        tracer.fill(0xAB);
        tracer.clear();
        assert!(tracer.pixel_buffer().bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn trace_pixel_stores_bgr() {
        let mut camera = Camera::default();
        camera.look(Vec3::new(-5.0, 0.0, 0.0), Vec3::ZERO, true);
        camera.set_viewport(1, 1);

        // Looking down +X: the single pixel's ray is (1, 0, 0), pure red.
        let mut tracer = RayTracer::new();
        tracer.resize(1, 1).unwrap();
        tracer.trace_pixel(&camera.ray_matrix(), 0, 0);

        assert_eq!(&tracer.pixel_buffer().bytes()[..3], &[0, 0, 255]);
        assert_eq!(tracer.pixel_buffer().pixel(0, 0), Some(Rgb8::new(255, 0, 0)));
    }

    #[test]
    fn rgb_order_is_honored() {
        let mut camera = Camera::default();
        camera.look(Vec3::new(-5.0, 0.0, 0.0), Vec3::ZERO, true);
        camera.set_viewport(1, 1);

        let mut tracer = RayTracer::with_channel_order(ChannelOrder::Rgb);
        tracer.resize(1, 1).unwrap();
        tracer.trace_pixel(&camera.ray_matrix(), 0, 0);

        assert_eq!(&tracer.pixel_buffer().bytes()[..3], &[255, 0, 0]);
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut tracer = RayTracer::new();
        tracer.resize(2, 2).unwrap();
        tracer.fill(7);
        tracer.trace_pixel(&Mat4::identity(), 2, 0);
        tracer.trace_pixel(&Mat4::identity(), 0, 2);
        assert!(tracer.pixel_buffer().bytes().iter().all(|&b| b == 7));
    }

    #[test]
    fn trace_tile_leaves_row_padding_untouched() {
        let mut camera = Camera::default();
        camera.set_viewport(3, 2);
        let mut tracer = RayTracer::new();
        tracer.resize(3, 2).unwrap();
        tracer.fill(0xEE);

        tracer.trace_tile(&camera.ray_matrix(), &Tile::clipped(0, 0, 16, 3, 2));

        let view = tracer.pixel_buffer();
        for row in view.bytes().chunks(view.stride_bytes()) {
            assert!(row[9..].iter().all(|&b| b == 0xEE));
        }
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(
                    view.pixel(x, y),
                    Some(compute_ray_color(&camera.ray_matrix(), x, y))
                );
            }
        }
    }

    #[test]
    fn ray_colors_stay_in_range_and_centered_rays_are_dark() {
        let mut camera = Camera::default();
        camera.look(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, false);
        camera.set_viewport(5, 5);
        let m = camera.ray_matrix();

        // The center ray is (0, 0, -1): every component clamps to zero.
        assert_eq!(compute_ray_color(&m, 2, 2), Rgb8::BLACK);

        // Right of center only the red channel can light up.
        let right = compute_ray_color(&m, 4, 2);
        assert!(right.r > 0);
        assert_eq!((right.g, right.b), (0, 0));

        // Above center (rows grow upward) only green.
        let up = compute_ray_color(&m, 2, 4);
        assert!(up.g > 0);
        assert_eq!((up.r, up.b), (0, 0));
    }
}
