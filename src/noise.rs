//! Coherent noise primitives.
//!
//! The pipeline only needs "evaluate 2D coherent noise at a point"; everything
//! that can answer that question implements [`NoiseSource`].

use ::noise::{NoiseFn, Perlin};
use glam::Vec2;

/// A continuous, deterministic 2D noise field
///
/// Implementations must return values in [-1, 1] and must never return NaN.
/// Sources are shared read-only across fill workers, hence `Send + Sync`.
pub trait NoiseSource: Send + Sync {
    /// Sample the field at a noise-space position
    fn sample(&self, point: Vec2) -> f32;
}

/// Seeded gradient (Perlin) noise
#[derive(Clone, Debug)]
pub struct PerlinSource {
    perlin: Perlin,
    seed: u32,
}

impl PerlinSource {
    /// Create new Perlin source with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PerlinSource {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseSource for PerlinSource {
    fn sample(&self, point: Vec2) -> f32 {
        self.perlin.get([point.x as f64, point.y as f64]) as f32
    }
}

/// Flat field returning the same value everywhere
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant(pub f32);

impl NoiseSource for Constant {
    fn sample(&self, _point: Vec2) -> f32 {
        self.0
    }
}

/// Adapter turning a closure into a noise source
///
/// Mostly useful for synthetic fields: gradients across the image, fields that
/// deliberately leave the nominal range, and so on.
#[derive(Clone, Copy, Debug)]
pub struct FromFn<F>(pub F);

impl<F> NoiseSource for FromFn<F>
where
    F: Fn(Vec2) -> f32 + Send + Sync,
{
    fn sample(&self, point: Vec2) -> f32 {
        (self.0)(point)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &N {
    fn sample(&self, point: Vec2) -> f32 {
        (**self).sample(point)
    }
}
