//! Image, animation, and fill configuration.

use glam::Vec2;

use crate::error::{ensure_finite, ConfigError};

/// Pixels per parallel work item
pub const DEFAULT_CHUNK_PIXELS: usize = 64;

/// Image and animation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParameters {
    /// Side length of the square output buffer (pixels)
    /// Changing it reallocates the buffers
    pub texture_size: u32,

    /// Width of the sampled window in noise space (zoom, resolution independent)
    pub noise_scale: f32,

    /// Sampling origin in noise space
    pub noise_offset: Vec2,

    /// Drift of the sampling origin (noise units per second)
    pub offset_velocity: Vec2,

    /// Darken toward the edges
    pub vignette: bool,

    /// Remap intensity through the color lookup table instead of grayscale
    pub colorize: bool,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            texture_size: 512,
            noise_scale: 10.0,
            noise_offset: Vec2::ZERO,
            offset_velocity: Vec2::X,
            vignette: true,
            colorize: true,
        }
    }
}

impl RenderParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texture_size == 0 {
            return Err(ConfigError::ZeroTextureSize);
        }
        ensure_finite("noise_scale", self.noise_scale)?;
        ensure_finite("noise_offset.x", self.noise_offset.x)?;
        ensure_finite("noise_offset.y", self.noise_offset.y)?;
        ensure_finite("offset_velocity.x", self.offset_velocity.x)?;
        ensure_finite("offset_velocity.y", self.offset_velocity.y)?;
        Ok(())
    }

    /// Number of pixels in one frame
    pub fn pixel_count(&self) -> usize {
        let side = self.texture_size as usize;
        side * side
    }
}

/// How a frame is distributed over threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStrategy {
    /// Rows then columns on the calling thread
    Sequential,

    /// Contiguous chunks of the flat pixel range, evaluated by worker threads
    Parallel { chunk_pixels: usize },
}

impl Default for FillStrategy {
    fn default() -> Self {
        Self::Parallel {
            chunk_pixels: DEFAULT_CHUNK_PIXELS,
        }
    }
}

/// Fill strategy plus worker pool sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillSettings {
    pub strategy: FillStrategy,

    /// Dedicated worker pool size; `None` shares rayon's global pool
    pub workers: Option<usize>,
}

impl FillSettings {
    pub fn sequential() -> Self {
        Self {
            strategy: FillStrategy::Sequential,
            workers: None,
        }
    }

    pub fn parallel(chunk_pixels: usize) -> Self {
        Self {
            strategy: FillStrategy::Parallel { chunk_pixels },
            workers: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let FillStrategy::Parallel { chunk_pixels: 0 } = self.strategy {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}
