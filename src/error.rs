//! Error types surfaced to the presentation host.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The color buffer for a new image size could not be allocated.
    #[error("failed to allocate a {bytes}-byte color buffer for {width}x{height}")]
    Allocation {
        bytes: usize,
        width: u32,
        height: u32,
    },

    /// The windowing layer reported a failure.
    #[error("window error: {0}")]
    Window(String),
}

impl From<String> for RenderError {
    fn from(message: String) -> Self {
        RenderError::Window(message)
    }
}
