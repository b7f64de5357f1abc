//! Single-precision vector and matrix types.
//!
//! Everything in the ray chain stays in `f32` so repeated camera updates
//! accumulate the same rounding on every platform.

pub mod mat4;
pub mod vec3;
pub mod vec4;

pub use mat4::Mat4;
pub use vec3::Vec3;
pub use vec4::Vec4;
