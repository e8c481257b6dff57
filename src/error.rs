//! Error types for configuration and frame production.

use std::collections::TryReserveError;

use thiserror::Error;

/// Rejected configuration, detected before any frame is filled
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("texture size must be greater than zero")]
    ZeroTextureSize,

    #[error("at least one noise octave is required")]
    ZeroOctaves,

    #[error("color gradient has no stops")]
    EmptyGradient,

    #[error("parameter `{name}` must be finite")]
    NonFinite { name: &'static str },

    #[error("`{name}` compounded over {octaves} octaves overflows f32")]
    OctaveOverflow { name: &'static str, octaves: u32 },

    #[error("parallel fill chunk size must be greater than zero")]
    ZeroChunkSize,

    #[error("worker pool size must be greater than zero")]
    ZeroWorkers,

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to allocate pixel buffers: {0}")]
    Allocation(#[from] FrameError),
}

/// Failure while producing a single frame
///
/// The previously completed frame stays valid when one of these is returned.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame size must be greater than zero")]
    ZeroSize,

    #[error("cannot allocate pixel buffer of {pixels} pixels")]
    Allocation {
        pixels: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("pixel buffer holds {actual} pixels, frame needs {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Reject NaN and infinities for a named parameter
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}
