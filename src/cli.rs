//! Command-line argument parsing.

use clap::{Parser, ValueEnum};
use glam::Vec2;

use crate::color::GradientPreset;
use crate::params::{
    FillSettings, FillStrategy, NoiseParameters, Normalization, RenderParameters, RendererConfig,
    DEFAULT_CHUNK_PIXELS,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "driftfield")]
#[command(about = "Animated fractal noise texture", long_about = None)]
pub struct Args {
    /// Texture side length (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 512)]
    pub size: u32,

    /// Width of the visible window in noise space
    #[arg(long, default_value_t = 10.0)]
    pub scale: f32,

    /// Number of noise octaves
    #[arg(long, default_value_t = 4)]
    pub octaves: u32,

    /// Frequency multiplier per octave
    #[arg(long, default_value_t = 2.0)]
    pub lacunarity: f32,

    /// Amplitude multiplier per octave
    #[arg(long, default_value_t = 0.5)]
    pub persistence: f32,

    /// Octave normalization
    #[arg(long, value_enum, default_value_t = NormalizationArg::Signed)]
    pub normalization: NormalizationArg,

    /// Horizontal drift (noise units per second)
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub velocity_x: f32,

    /// Vertical drift (noise units per second)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub velocity_y: f32,

    /// Disable edge darkening
    #[arg(long)]
    pub no_vignette: bool,

    /// Render grayscale instead of remapping through the gradient
    #[arg(long)]
    pub no_colorize: bool,

    /// Gradient preset: grayscale, sunset, ocean, fire, terrain (default)
    #[arg(long, value_name = "PRESET", default_value = "terrain")]
    pub gradient: String,

    /// Fill strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Parallel)]
    pub strategy: StrategyArg,

    /// Pixels per parallel work item
    #[arg(long, value_name = "PIXELS", default_value_t = DEFAULT_CHUNK_PIXELS)]
    pub chunk: usize,

    /// Dedicated fill threads (default: shared global pool)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Perlin noise seed
    #[arg(long, default_value_t = 0)]
    pub seed: u32,

    /// Render this many frames without a window and report timing
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NormalizationArg {
    Signed,
    Centered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Sequential,
    Parallel,
}

impl Args {
    /// Parse gradient preset from command-line arguments
    pub fn parse_gradient_preset(&self) -> GradientPreset {
        GradientPreset::from_name(&self.gradient).unwrap_or_else(|| {
            log::warn!("Unknown gradient preset '{}', using terrain", self.gradient);
            GradientPreset::Terrain
        })
    }

    pub fn noise_params(&self) -> NoiseParameters {
        NoiseParameters {
            num_octaves: self.octaves,
            lacunarity: self.lacunarity,
            persistence: self.persistence,
            normalization: match self.normalization {
                NormalizationArg::Signed => Normalization::Signed,
                NormalizationArg::Centered => Normalization::Centered,
            },
        }
    }

    pub fn render_params(&self) -> RenderParameters {
        RenderParameters {
            texture_size: self.size,
            noise_scale: self.scale,
            noise_offset: Vec2::ZERO,
            offset_velocity: Vec2::new(self.velocity_x, self.velocity_y),
            vignette: !self.no_vignette,
            colorize: !self.no_colorize,
        }
    }

    pub fn fill_settings(&self) -> FillSettings {
        let strategy = match self.strategy {
            StrategyArg::Sequential => FillStrategy::Sequential,
            StrategyArg::Parallel => FillStrategy::Parallel {
                chunk_pixels: self.chunk,
            },
        };

        FillSettings {
            strategy,
            workers: self.workers,
        }
    }

    /// Assemble the full renderer configuration (validated later by the renderer)
    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            noise: self.noise_params(),
            render: self.render_params(),
            fill: self.fill_settings(),
            gradient: self.parse_gradient_preset().gradient(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parameter_defaults() {
        let args = Args::try_parse_from(["driftfield"]).unwrap();
        let config = args.renderer_config();

        assert_eq!(config.noise, NoiseParameters::default());
        assert_eq!(config.render, RenderParameters::default());
        assert_eq!(config.fill, FillSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_map_onto_config() {
        let args = Args::try_parse_from([
            "driftfield",
            "--size",
            "64",
            "--octaves",
            "2",
            "--velocity-x",
            "-0.5",
            "--no-vignette",
            "--strategy",
            "sequential",
            "--normalization",
            "centered",
            "--gradient",
            "fire",
        ])
        .unwrap();
        let config = args.renderer_config();

        assert_eq!(config.render.texture_size, 64);
        assert_eq!(config.render.offset_velocity, Vec2::new(-0.5, 0.0));
        assert!(!config.render.vignette);
        assert!(config.render.colorize);
        assert_eq!(config.noise.num_octaves, 2);
        assert_eq!(config.noise.normalization, Normalization::Centered);
        assert_eq!(config.fill.strategy, FillStrategy::Sequential);
        assert_eq!(config.gradient, GradientPreset::Fire.gradient());
    }

    #[test]
    fn test_unknown_gradient_falls_back() {
        let args = Args::try_parse_from(["driftfield", "--gradient", "plaid"]).unwrap();
        assert_eq!(args.parse_gradient_preset(), GradientPreset::Terrain);
    }
}
