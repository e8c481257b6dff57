//! Parameter definitions with documented semantics and validation.
//!
//! Parameters are plain data owned by the host. They are validated once when
//! handed to the renderer and then treated as an immutable snapshot for the
//! duration of every fill.

mod noise;
mod render;

// Re-export all types
pub use self::noise::{NoiseParameters, Normalization};
pub use self::render::{FillSettings, FillStrategy, RenderParameters, DEFAULT_CHUNK_PIXELS};

use crate::color::ColorGradient;
use crate::error::ConfigError;

/// Everything needed to construct a renderer
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    pub noise: NoiseParameters,
    pub render: RenderParameters,
    pub fill: FillSettings,
    pub gradient: ColorGradient,
}

impl RendererConfig {
    /// Validate every parameter group
    ///
    /// Gradients reject empty stop lists at construction and need no check here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.noise.validate()?;
        self.render.validate()?;
        self.fill.validate()
    }
}
