//! Multi-octave (fractal) noise accumulation.

use glam::Vec2;

use crate::noise::NoiseSource;
use crate::params::{NoiseParameters, Normalization};

/// Sums a noise source over geometrically scaled octaves
///
/// Octave 0 is always sampled at unit frequency and amplitude; lacunarity and
/// persistence compound from octave 1 onward. With a single octave the output
/// is therefore independent of both multipliers.
#[derive(Debug, Clone, Copy)]
pub struct OctaveAccumulator {
    params: NoiseParameters,
}

impl OctaveAccumulator {
    pub fn new(params: NoiseParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NoiseParameters {
        &self.params
    }

    /// Weighted octave sum before the final normalization offset
    ///
    /// `Centered` subtracts 0.5 from every sample before weighting it.
    pub fn fractal_sum<N: NoiseSource + ?Sized>(&self, noise: &N, point: Vec2) -> f32 {
        let centering = match self.params.normalization {
            Normalization::Signed => 0.0,
            Normalization::Centered => 0.5,
        };

        let mut u = 0.0;
        let mut lacu = 1.0;
        let mut pers = 1.0;

        for octave in 0..self.params.num_octaves {
            if octave != 0 {
                lacu *= self.params.lacunarity;
                pers *= self.params.persistence;
            }

            u += (noise.sample(point * lacu) - centering) * pers;
        }

        u
    }

    /// Octave sum mapped to the nominal [0, 1] range (not clamped)
    pub fn sample<N: NoiseSource + ?Sized>(&self, noise: &N, point: Vec2) -> f32 {
        let u = self.fractal_sum(noise, point);
        match self.params.normalization {
            Normalization::Signed => (u + 1.0) * 0.5,
            Normalization::Centered => u + 0.5,
        }
    }
}
