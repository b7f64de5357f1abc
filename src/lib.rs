//! An interactive viewer that colors every pixel by its camera ray direction.
//!
//! The core is platform independent: a [`Camera`](camera::Camera) produces a
//! pixel-to-ray matrix, a [`RayTracer`](render::RayTracer) writes one color
//! per pixel into a packed 24-bit buffer, and a
//! [`Scheduler`](scheduler::Scheduler) spreads the work over short,
//! time-boxed calls so the host's event loop stays responsive. SDL2 is used
//! only by the [`window`] host.
//!
//! # Quick Start
//!
//! ```ignore
//! use raydir::prelude::*;
//!
//! let mut engine = Engine::default();
//! engine.on_resize(800, 600)?;
//! let clock = SystemClock::default();
//! while engine.advance_frame(&clock) {
//!     present(engine.pixel_buffer());
//! }
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod engine;
pub mod error;
pub mod math;
pub mod render;
pub mod scheduler;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use engine::Engine;
pub use error::RenderError;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use raydir::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, DollyDirection, PanDirection, PanModifiers};

    // Engine
    pub use crate::engine::Engine;
    pub use crate::error::RenderError;

    // Math
    pub use crate::math::{Mat4, Vec3, Vec4};

    // Rendering
    pub use crate::render::{ChannelOrder, PixelBuffer, RayTracer, Rgb8};
    pub use crate::scheduler::{Clock, ManualClock, Scheduler, SchedulerConfig, SystemClock};
}
