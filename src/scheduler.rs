//! Time-boxed, tile-by-tile progressive rendering.
//!
//! Rendering happens on the caller's thread. Each call to
//! [`Scheduler::advance`] traces 16x16 tiles in row-major order, starting at
//! the resume cursor, until the time budget for the call is spent or the last
//! row is done. The caller presents the buffer after every call and calls
//! again while [`Scheduler::advance`] returns `true`, so the image fills in
//! progressively without a worker thread and without blocking the event loop
//! for longer than one budget.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::camera::Camera;
use crate::render::{RayTracer, Tile, DEFAULT_TILE_SIZE};

/// Default wall-clock budget per call to [`Scheduler::advance`].
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(125);

/// Monotonic time source measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to. Useful for hosts that own their own
/// frame timing and for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Wall-clock budget for one call to [`Scheduler::advance`].
    pub time_budget: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }
}

/// Next pixel to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// No frame in progress.
    Idle,
    /// A frame is partially traced. `started` is the clock reading when it began.
    Rendering { started: Duration },
}

#[derive(Debug)]
pub struct Scheduler {
    config: SchedulerConfig,
    state: FrameState,
    cursor: Cursor,
    /// A new frame starts on the next call to `advance`.
    pending: bool,
    elapsed: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    /// Creates a scheduler with a frame already requested.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config: SchedulerConfig {
                tile_size: config.tile_size.max(1),
                ..config
            },
            state: FrameState::Idle,
            cursor: Cursor::default(),
            pending: true,
            elapsed: Duration::ZERO,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Restarts rendering from the image origin on the next call to
    /// [`Scheduler::advance`]. Any partial progress is discarded.
    pub fn request_frame(&mut self) {
        self.cursor = Cursor::default();
        self.pending = true;
    }

    /// Returns true once the requested frame has been fully traced.
    pub fn is_frame_complete(&self) -> bool {
        self.state == FrameState::Idle && !self.pending
    }

    /// Time from the start of the current or last frame to the end of the
    /// most recent call to [`Scheduler::advance`].
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Runs one time-boxed batch of tiles.
    ///
    /// Starting a requested frame clears the buffer and records the start
    /// time. At least one tile is traced per call even when the clock has
    /// already overrun the budget. Returns true if the frame is still
    /// incomplete and the caller should invoke `advance` again after
    /// presenting.
    pub fn advance(&mut self, tracer: &mut RayTracer, camera: &Camera, clock: &dyn Clock) -> bool {
        if self.pending {
            self.pending = false;
            self.cursor = Cursor::default();
            tracer.clear();
            self.state = FrameState::Rendering {
                started: clock.now(),
            };
            log::debug!("frame started at {}x{}", tracer.width(), tracer.height());
        }

        let FrameState::Rendering { started } = self.state else {
            return false;
        };

        let (width, height) = (tracer.width(), tracer.height());
        let size = self.config.tile_size;
        let ray_matrix = camera.ray_matrix();
        let slice_start = clock.now();

        while self.cursor.y < height {
            let tile = Tile::clipped(self.cursor.x, self.cursor.y, size, width, height);
            tracer.trace_tile(&ray_matrix, &tile);

            self.cursor.x += size;
            if self.cursor.x >= width {
                self.cursor.x = 0;
                self.cursor.y += size;
            }

            if clock.now().saturating_sub(slice_start) >= self.config.time_budget {
                break;
            }
        }

        self.elapsed = clock.now().saturating_sub(started);

        if self.cursor.y >= height {
            self.cursor = Cursor { x: 0, y: height };
            self.state = FrameState::Idle;
            log::info!(
                "frame {}x{} complete in {:.3} s",
                width,
                height,
                self.elapsed.as_secs_f32()
            );
            return false;
        }

        true
    }
}
