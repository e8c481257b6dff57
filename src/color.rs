//! Colors, gradients, and the 256-entry color lookup table.

use std::ops::Index;

use bytemuck::{Pod, Zeroable};

use crate::error::ConfigError;

/// Number of entries in a color lookup table (one per intensity byte)
pub const CLUT_LEN: usize = 256;

/// 8-bit RGBA color, laid out for direct texture upload
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Fully opaque gray with all three channels set to `value`
    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Rec. 709 relative luminance in [0, 1] (computed on the encoded values)
    pub fn luminance(&self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    /// Per-channel linear interpolation, rounded to nearest
    pub fn lerp(self, other: Self, t: f32) -> Self {
        #[inline]
        fn channel(a: u8, b: u8, t: f32) -> u8 {
            (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: channel(self.r, other.r, t),
            g: channel(self.g, other.g, t),
            b: channel(self.b, other.b, t),
            a: channel(self.a, other.a, t),
        }
    }
}

// ============================================================================
// Gradient
// ============================================================================

/// How a gradient fills the space between stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientMode {
    /// Linear blend between neighbouring stops
    #[default]
    Blend,

    /// Hold the color of the first stop at or after the sampled position
    Fixed,
}

/// One color stop of a gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in [0, 1]
    pub position: f32,
    pub color: Color32,
}

impl GradientStop {
    pub const fn new(position: f32, color: Color32) -> Self {
        Self { position, color }
    }
}

/// Ordered color ramp sampled to build a lookup table
#[derive(Debug, Clone, PartialEq)]
pub struct ColorGradient {
    stops: Vec<GradientStop>,
    mode: GradientMode,
}

impl ColorGradient {
    /// Build a gradient from stops in any order
    ///
    /// Positions are clamped to [0, 1] and stops sorted by position. Stops
    /// sharing a position keep their input order.
    pub fn new(stops: Vec<GradientStop>, mode: GradientMode) -> Result<Self, ConfigError> {
        if stops.is_empty() {
            return Err(ConfigError::EmptyGradient);
        }

        let mut stops = stops
            .into_iter()
            .map(|stop| {
                if stop.position.is_nan() {
                    return Err(ConfigError::NonFinite {
                        name: "gradient stop position",
                    });
                }
                Ok(GradientStop::new(stop.position.clamp(0.0, 1.0), stop.color))
            })
            .collect::<Result<Vec<_>, _>>()?;
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));

        Ok(Self { stops, mode })
    }

    /// Two-stop blend from `from` at 0 to `to` at 1
    pub fn linear(from: Color32, to: Color32) -> Self {
        Self {
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
            mode: GradientMode::Blend,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn mode(&self) -> GradientMode {
        self.mode
    }

    /// Sample the gradient at `t`; positions outside the stops take the end colors
    pub fn evaluate(&self, t: f32) -> Color32 {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];

        if t.is_nan() || t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        // First stop strictly past t; exists because t < last.position
        let upper = self.stops.partition_point(|stop| stop.position <= t);
        let hi = self.stops[upper];
        let lo = self.stops[upper - 1];

        match self.mode {
            GradientMode::Fixed => {
                if lo.position == t {
                    lo.color
                } else {
                    hi.color
                }
            }
            GradientMode::Blend => {
                let span = hi.position - lo.position;
                lo.color.lerp(hi.color, (t - lo.position) / span)
            }
        }
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        GradientPreset::Terrain.gradient()
    }
}

/// Built-in gradients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientPreset {
    Grayscale,
    Sunset,
    Ocean,
    Fire,
    Terrain,
}

impl GradientPreset {
    pub const ALL: [Self; 5] = [
        Self::Grayscale,
        Self::Sunset,
        Self::Ocean,
        Self::Fire,
        Self::Terrain,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Sunset => "sunset",
            Self::Ocean => "ocean",
            Self::Fire => "fire",
            Self::Terrain => "terrain",
        }
    }

    /// Look up a preset by its lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }

    /// Preset following this one, wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn gradient(self) -> ColorGradient {
        let stops = match self {
            Self::Grayscale => return ColorGradient::linear(Color32::BLACK, Color32::WHITE),
            Self::Sunset => vec![
                GradientStop::new(0.0, Color32::rgb(80, 20, 120)),
                GradientStop::new(0.33, Color32::rgb(255, 50, 120)),
                GradientStop::new(0.66, Color32::rgb(255, 150, 50)),
                GradientStop::new(1.0, Color32::rgb(255, 255, 150)),
            ],
            Self::Ocean => vec![
                GradientStop::new(0.0, Color32::rgb(10, 30, 100)),
                GradientStop::new(0.5, Color32::rgb(30, 180, 220)),
                GradientStop::new(1.0, Color32::rgb(150, 255, 200)),
            ],
            Self::Fire => vec![
                GradientStop::new(0.0, Color32::BLACK),
                GradientStop::new(0.2, Color32::rgb(80, 10, 0)),
                GradientStop::new(0.4, Color32::rgb(200, 50, 0)),
                GradientStop::new(0.6, Color32::rgb(255, 150, 20)),
                GradientStop::new(0.8, Color32::rgb(255, 230, 100)),
                GradientStop::new(1.0, Color32::rgb(255, 255, 220)),
            ],
            Self::Terrain => vec![
                GradientStop::new(0.0, Color32::rgb(8, 24, 88)),
                GradientStop::new(0.38, Color32::rgb(30, 90, 180)),
                GradientStop::new(0.45, Color32::rgb(220, 205, 140)),
                GradientStop::new(0.55, Color32::rgb(70, 150, 60)),
                GradientStop::new(0.72, Color32::rgb(40, 90, 35)),
                GradientStop::new(0.85, Color32::rgb(120, 110, 100)),
                GradientStop::new(1.0, Color32::WHITE),
            ],
        };

        ColorGradient {
            stops,
            mode: GradientMode::Blend,
        }
    }
}

// ============================================================================
// Color lookup table
// ============================================================================

/// Intensity byte → display color
///
/// Built once from a gradient and reused across frames until rebuilt.
#[derive(Clone, PartialEq, Eq)]
pub struct ColorLookupTable {
    colors: [Color32; CLUT_LEN],
}

impl ColorLookupTable {
    /// Sample `gradient` at `i / 255` for every entry
    pub fn from_gradient(gradient: &ColorGradient) -> Self {
        let mut colors = [Color32::BLACK; CLUT_LEN];
        let last = (CLUT_LEN - 1) as f32;

        for (i, color) in colors.iter_mut().enumerate() {
            *color = gradient.evaluate(i as f32 / last);
        }

        Self { colors }
    }

    /// Gray ramp, identical to the uncolorized output
    pub fn grayscale() -> Self {
        let mut colors = [Color32::BLACK; CLUT_LEN];
        for (i, color) in colors.iter_mut().enumerate() {
            *color = Color32::gray(i as u8);
        }
        Self { colors }
    }

    #[inline]
    pub fn lookup(&self, intensity: u8) -> Color32 {
        self.colors[intensity as usize]
    }

    pub fn colors(&self) -> &[Color32; CLUT_LEN] {
        &self.colors
    }
}

impl Index<u8> for ColorLookupTable {
    type Output = Color32;

    fn index(&self, intensity: u8) -> &Color32 {
        &self.colors[intensity as usize]
    }
}

impl Default for ColorLookupTable {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl std::fmt::Debug for ColorLookupTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorLookupTable")
            .field("first", &self.colors[0])
            .field("last", &self.colors[CLUT_LEN - 1])
            .finish()
    }
}
