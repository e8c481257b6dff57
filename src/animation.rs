//! Noise offset drift over time.

use glam::Vec2;

/// Scrolls the sampling origin at a constant velocity
///
/// The offset grows without bound; noise is evaluated at arbitrary
/// coordinates so no wrapping is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetAnimator {
    offset: Vec2,
    velocity: Vec2,
}

impl OffsetAnimator {
    pub fn new(offset: Vec2, velocity: Vec2) -> Self {
        Self { offset, velocity }
    }

    /// Advance by `elapsed_s` seconds and return the new offset
    pub fn advance(&mut self, elapsed_s: f32) -> Vec2 {
        self.offset += self.velocity * elapsed_s;
        self.offset
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }
}
