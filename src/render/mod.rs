//! Ray generation and the color buffer it fills.

pub mod color;
pub mod pixel_buffer;
pub mod ray_tracer;
pub mod tile;

pub use color::Rgb8;
pub use pixel_buffer::{ChannelOrder, PixelBuffer};
pub use ray_tracer::{compute_ray_color, RayTracer};
pub use tile::{Tile, DEFAULT_TILE_SIZE};
