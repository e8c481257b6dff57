//! Fractal noise parameters.

use crate::error::{ensure_finite, ConfigError};

/// How raw octave samples are folded into the [0, 1] intensity range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Sum weighted samples, then remap the sum with `(u + 1) * 0.5`
    #[default]
    Signed,

    /// Subtract 0.5 from each sample before weighting, add 0.5 to the sum
    ///
    /// Meant for primitives whose native range is [0, 1]. Fed with a
    /// [-1, 1] primitive the field comes out darker and clips more.
    Centered,
}

/// Octave summation controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParameters {
    /// Number of octaves summed (>= 1)
    pub num_octaves: u32,

    /// Frequency multiplier applied per octave, starting at octave 1
    /// Typical value: 2.0
    pub lacunarity: f32,

    /// Amplitude multiplier applied per octave, starting at octave 1
    /// Typical value: 0.5
    pub persistence: f32,

    pub normalization: Normalization,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            num_octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            normalization: Normalization::Signed,
        }
    }
}

impl NoiseParameters {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_octaves == 0 {
            return Err(ConfigError::ZeroOctaves);
        }
        ensure_finite("lacunarity", self.lacunarity)?;
        ensure_finite("persistence", self.persistence)?;

        // Highest octave frequency and total amplitude must stay finite
        let octaves = self.num_octaves;
        let frequency = (self.lacunarity.abs() as f64).powf(f64::from(octaves - 1));
        if frequency > f64::from(f32::MAX) {
            return Err(ConfigError::OctaveOverflow {
                name: "lacunarity",
                octaves,
            });
        }
        if amplitude_sum(self.persistence, octaves) > f64::from(f32::MAX) * 0.5 {
            return Err(ConfigError::OctaveOverflow {
                name: "persistence",
                octaves,
            });
        }

        Ok(())
    }
}

/// Sum of `|persistence|^k` for `k` in `0..octaves`
fn amplitude_sum(persistence: f32, octaves: u32) -> f64 {
    let p = persistence.abs() as f64;
    if p == 1.0 {
        f64::from(octaves)
    } else {
        (p.powf(f64::from(octaves)) - 1.0) / (p - 1.0)
    }
}
