//! Driftfield library - animated fractal noise images
//!
//! Layered coherent noise is evaluated for every pixel of a square buffer,
//! optionally vignetted and colorized through a lookup table, and recomputed
//! each tick as the sampling origin drifts.

pub mod animation;
pub mod buffer;
pub mod cli;
pub mod color;
pub mod error;
pub mod fill;
pub mod noise;
pub mod octaves;
pub mod params;
pub mod pixel;
pub mod renderer;

#[cfg(feature = "window")]
pub mod rendering;

pub use self::animation::OffsetAnimator;
pub use self::buffer::PixelBuffer;
pub use self::color::{
    Color32, ColorGradient, ColorLookupTable, GradientMode, GradientPreset, GradientStop,
};
pub use self::error::{ConfigError, FrameError};
pub use self::fill::{FillStats, FrameFiller};
pub use self::noise::{Constant, FromFn, NoiseSource, PerlinSource};
pub use self::octaves::OctaveAccumulator;
pub use self::params::{
    FillSettings, FillStrategy, NoiseParameters, Normalization, RenderParameters, RendererConfig,
};
pub use self::pixel::{FrameContext, PixelEvaluator, Shade};
pub use self::renderer::NoiseRenderer;
