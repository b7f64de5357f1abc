//! Ray-direction visualization.

use crate::math::Vec3;

/// An 8-bit-per-channel color in red, green, blue order.
///
/// Storage order is a presentation concern; see
/// [`ChannelOrder`](super::pixel_buffer::ChannelOrder).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Maps a signed unit component onto a channel: `<= 0` is 0, `>= 1` is 255,
/// anything between is `round(value * 255)`.
#[inline]
pub fn unit_to_channel(value: f32) -> u8 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        255
    } else {
        (value * 255.0).round() as u8
    }
}

/// Colors a normalized ray direction by its x, y and z components.
#[inline]
pub fn direction_to_color(direction: Vec3) -> Rgb8 {
    Rgb8::new(
        unit_to_channel(direction.x),
        unit_to_channel(direction.y),
        unit_to_channel(direction.z),
    )
}
