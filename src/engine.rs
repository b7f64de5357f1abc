//! Core viewer state.
//!
//! The [`Engine`] struct owns the camera, the ray tracer and the progressive
//! scheduler, and is the only thing a presentation host talks to. Input
//! handlers return whether the camera changed; any change restarts the
//! frame from the image origin.

use crate::camera::{Camera, DollyDirection, PanDirection, PanModifiers};
use crate::error::RenderError;
use crate::math::Vec3;
use crate::render::{ChannelOrder, PixelBuffer, RayTracer};
use crate::scheduler::{Clock, Scheduler, SchedulerConfig};

#[derive(Debug, Default)]
pub struct Engine {
    camera: Camera,
    tracer: RayTracer,
    scheduler: Scheduler,
}

impl Engine {
    pub fn new(config: SchedulerConfig, channel_order: ChannelOrder) -> Self {
        Self {
            camera: Camera::default(),
            tracer: RayTracer::with_channel_order(channel_order),
            scheduler: Scheduler::new(config),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn width(&self) -> u32 {
        self.tracer.width()
    }

    pub fn height(&self) -> u32 {
        self.tracer.height()
    }

    // =========================================================================
    // Host -> core
    // =========================================================================

    /// Reallocates the color buffer and updates the projection.
    ///
    /// Always restarts the frame: partial progress never carries over into a
    /// buffer of a different size.
    /// On allocation failure the tracer is left empty and the projection
    /// follows it, so the engine stays usable for a later resize.
    pub fn on_resize(&mut self, width: i32, height: i32) -> Result<(), RenderError> {
        self.scheduler.request_frame();
        let resized = self.tracer.resize(width, height);
        self.camera
            .set_viewport(self.tracer.width(), self.tracer.height());
        resized
    }

    /// Re-aims the camera. See [`Camera::look`].
    pub fn look(&mut self, position: Vec3, reference: Vec3, rotate_around_reference: bool) {
        self.camera.look(position, reference, rotate_around_reference);
        self.scheduler.request_frame();
    }

    pub fn on_pan(&mut self, direction: PanDirection, modifiers: PanModifiers) -> bool {
        let moved = self.camera.pan(direction, modifiers);
        self.redraw_if(moved)
    }

    pub fn on_orbit(&mut self, dx: i32, dy: i32) -> bool {
        let moved = self.camera.orbit(dx, dy);
        self.redraw_if(moved)
    }

    pub fn on_dolly(&mut self, direction: DollyDirection) -> bool {
        let moved = self.camera.dolly(direction);
        self.redraw_if(moved)
    }

    /// Discards any partial frame and starts over on the next advance.
    pub fn request_frame(&mut self) {
        self.scheduler.request_frame();
    }

    /// Runs one time-boxed batch. Returns true while the frame is incomplete.
    pub fn advance_frame(&mut self, clock: &dyn Clock) -> bool {
        self.scheduler
            .advance(&mut self.tracer, &self.camera, clock)
    }

    fn redraw_if(&mut self, changed: bool) -> bool {
        if changed {
            self.scheduler.request_frame();
        }
        changed
    }

    // =========================================================================
    // Core -> host
    // =========================================================================

    pub fn pixel_buffer(&self) -> PixelBuffer<'_> {
        self.tracer.pixel_buffer()
    }

    pub fn is_frame_complete(&self) -> bool {
        self.scheduler.is_frame_complete()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.scheduler.elapsed().as_secs_f32()
    }

    /// Formats `"<title> - WxH, Time: S.SSS s"` for a title bar.
    pub fn status_text(&self, title: &str) -> String {
        format!(
            "{} - {}x{}, Time: {:.3} s",
            title,
            self.width(),
            self.height(),
            self.elapsed_seconds()
        )
    }
}
