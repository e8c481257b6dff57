//! Per-pixel evaluation: coordinate transform, octaves, vignette, color.

use glam::Vec2;

use crate::color::{Color32, ColorLookupTable};
use crate::noise::NoiseSource;
use crate::octaves::OctaveAccumulator;
use crate::params::{NoiseParameters, RenderParameters};

/// Read-only snapshot of everything one frame needs
///
/// Borrowed by every pixel of a fill, so nothing it points at can change
/// until the fill returns.
#[derive(Debug)]
pub struct FrameContext<'a, N: ?Sized> {
    pub noise: &'a N,
    pub noise_params: NoiseParameters,
    /// Render parameters with `noise_offset` set to this frame's offset
    pub render: RenderParameters,
    /// Used only when `render.colorize` is set; grayscale otherwise
    pub clut: Option<&'a ColorLookupTable>,
}

impl<N: ?Sized> Clone for FrameContext<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: ?Sized> Copy for FrameContext<'_, N> {}

/// Output of one pixel evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shade {
    pub color: Color32,
    /// Octave sum fell outside [0, 1] and was clamped
    ///
    /// Darkening from the vignette alone does not count.
    pub clamped: bool,
}

/// Pure function from pixel coordinates to color for one frame
///
/// Resolution-dependent factors are computed once per frame.
pub struct PixelEvaluator<'a, N: ?Sized> {
    noise: &'a N,
    octaves: OctaveAccumulator,
    clut: Option<&'a ColorLookupTable>,
    size: f32,
    noise_mult: f32,
    minus_half: f32,
    offset: Vec2,
    vignette: bool,
}

impl<'a, N: NoiseSource + ?Sized> PixelEvaluator<'a, N> {
    pub fn new(ctx: &FrameContext<'a, N>) -> Self {
        let size = ctx.render.texture_size as f32;
        let clut = if ctx.render.colorize { ctx.clut } else { None };

        Self {
            noise: ctx.noise,
            octaves: OctaveAccumulator::new(ctx.noise_params),
            clut,
            size,
            noise_mult: ctx.render.noise_scale / size,
            minus_half: -size * 0.5,
            offset: ctx.render.noise_offset,
            vignette: ctx.render.vignette,
        }
    }

    /// Noise-space position of a pixel
    ///
    /// The sampling window is centered on the offset and spans `noise_scale`
    /// units regardless of resolution.
    #[inline]
    pub fn noise_position(&self, column: u32, row: u32) -> Vec2 {
        Vec2::new(
            (self.minus_half + column as f32) * self.noise_mult,
            (self.minus_half + row as f32) * self.noise_mult,
        ) + self.offset
    }

    /// Elliptical edge falloff in screen space
    ///
    /// 1 at the center, reaching zero and going negative toward the corners.
    #[inline]
    pub fn vignette_factor(&self, column: u32, row: u32) -> f32 {
        let sx = (column as f32 / self.size - 0.5) * 3.0;
        let sy = (row as f32 / self.size - 0.5) * 3.0;
        ((1.0 - sx * sx) + (1.0 - sy * sy)) * 0.5
    }

    /// Normalized intensity before clamping
    #[inline]
    pub fn intensity(&self, column: u32, row: u32) -> f32 {
        let u = self
            .octaves
            .sample(self.noise, self.noise_position(column, row));
        self.apply_vignette(u, column, row)
    }

    #[inline]
    fn apply_vignette(&self, u: f32, column: u32, row: u32) -> f32 {
        if self.vignette {
            u * self.vignette_factor(column, row)
        } else {
            u
        }
    }

    /// Evaluate a pixel
    ///
    /// # Panics
    /// If the noise source produced NaN. That is a broken source, not an
    /// input to clamp.
    #[inline]
    pub fn shade(&self, column: u32, row: u32) -> Shade {
        let raw = self
            .octaves
            .sample(self.noise, self.noise_position(column, row));
        let u = self.apply_vignette(raw, column, row);
        assert!(
            !u.is_nan(),
            "noise source produced NaN at pixel ({column}, {row})"
        );

        // Round half up (u >= 0 after the clamp, so f32::round agrees)
        let level = (u.clamp(0.0, 1.0) * 255.0).round() as u8;

        let color = match self.clut {
            Some(clut) => clut.lookup(level),
            None => Color32::gray(level),
        };

        Shade {
            color,
            clamped: !(0.0..=1.0).contains(&raw),
        }
    }

    #[inline]
    pub fn evaluate(&self, column: u32, row: u32) -> Color32 {
        self.shade(column, row).color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorGradient, GradientPreset};
    use crate::noise::{Constant, FromFn, PerlinSource};

    fn render(size: u32) -> RenderParameters {
        RenderParameters {
            texture_size: size,
            noise_scale: 4.0,
            noise_offset: Vec2::ZERO,
            offset_velocity: Vec2::ZERO,
            vignette: false,
            colorize: false,
        }
    }

    fn context<N: ?Sized>(noise: &N, render: RenderParameters) -> FrameContext<'_, N> {
        FrameContext {
            noise,
            noise_params: NoiseParameters::default(),
            render,
            clut: None,
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let noise = PerlinSource::new(11);
        let ctx = FrameContext {
            render: RenderParameters {
                vignette: true,
                noise_offset: Vec2::new(3.5, -1.25),
                ..render(32)
            },
            ..context(&noise, render(32))
        };
        let a = PixelEvaluator::new(&ctx);
        let b = PixelEvaluator::new(&ctx);

        for row in 0..32 {
            for column in 0..32 {
                assert_eq!(a.shade(column, row), b.shade(column, row));
                assert_eq!(a.shade(column, row), a.shade(column, row));
            }
        }
    }

    #[test]
    fn test_noise_position_centers_window() {
        let noise = Constant(0.0);
        let ctx = FrameContext {
            render: RenderParameters {
                noise_offset: Vec2::new(10.0, 20.0),
                ..render(4)
            },
            ..context(&noise, render(4))
        };
        let eval = PixelEvaluator::new(&ctx);

        // scale 4 over 4 pixels: one noise unit per pixel, starting at -2
        assert_eq!(eval.noise_position(0, 0), Vec2::new(8.0, 18.0));
        assert_eq!(eval.noise_position(2, 3), Vec2::new(10.0, 21.0));
    }

    #[test]
    fn test_zero_field_is_mid_gray() {
        let noise = Constant(0.0);
        let ctx = FrameContext {
            noise_params: NoiseParameters {
                num_octaves: 1,
                ..Default::default()
            },
            ..context(&noise, render(4))
        };
        let eval = PixelEvaluator::new(&ctx);

        // u = 0.5, 255 * 0.5 = 127.5 rounds up
        let shade = eval.shade(1, 2);
        assert_eq!(shade.color, Color32::rgba(128, 128, 128, 255));
        assert!(!shade.clamped);
    }

    #[test]
    fn test_out_of_range_clamps_to_bounds() {
        let bright = Constant(3.0);
        let eval = PixelEvaluator::new(&context(&bright, render(8)));
        let shade = eval.shade(3, 3);
        assert_eq!(shade.color, Color32::WHITE);
        assert!(shade.clamped);

        let dark = Constant(-3.0);
        let eval = PixelEvaluator::new(&context(&dark, render(8)));
        let shade = eval.shade(3, 3);
        assert_eq!(shade.color, Color32::BLACK);
        assert!(shade.clamped);
    }

    #[test]
    fn test_vignette_darkens_toward_corners() {
        let noise = Constant(0.5);
        let size = 16;
        let ctx = FrameContext {
            render: RenderParameters {
                vignette: true,
                ..render(size)
            },
            ..context(&noise, render(size))
        };
        let eval = PixelEvaluator::new(&ctx);

        let center = eval.evaluate(size / 2, size / 2).r;
        for (column, row) in [(0, 0), (size - 1, 0), (0, size - 1), (size - 1, size - 1)] {
            assert!(center >= eval.evaluate(column, row).r);
        }
        assert_eq!(eval.vignette_factor(size / 2, size / 2), 1.0);
        assert!(eval.vignette_factor(0, 0) < 0.0);
    }

    #[test]
    fn test_clamp_flag_tracks_octave_range_under_vignette() {
        let vignetted = RenderParameters {
            vignette: true,
            ..render(16)
        };

        // In-range field: corners go black from the vignette alone
        let mid = Constant(0.5);
        let eval = PixelEvaluator::new(&context(&mid, vignetted));
        let corner = eval.shade(0, 0);
        assert_eq!(corner.color, Color32::BLACK);
        assert!(!corner.clamped);

        // Out-of-range field is reported even where the vignette is 1
        let bright = Constant(3.0);
        let eval = PixelEvaluator::new(&context(&bright, vignetted));
        let center = eval.shade(8, 8);
        assert_eq!(center.color, Color32::WHITE);
        assert!(center.clamped);
    }

    #[test]
    fn test_colorize_uses_lookup_table() {
        let clut = ColorLookupTable::from_gradient(&GradientPreset::Fire.gradient());
        let noise = Constant(1.0);
        let ctx = FrameContext {
            render: RenderParameters {
                colorize: true,
                ..render(4)
            },
            clut: Some(&clut),
            ..context(&noise, render(4))
        };
        assert_eq!(PixelEvaluator::new(&ctx).evaluate(0, 0), clut[255]);

        // colorize off ignores the table even when one is supplied
        let gray = FrameContext {
            render: render(4),
            ..ctx
        };
        assert_eq!(PixelEvaluator::new(&gray).evaluate(0, 0), Color32::WHITE);
    }

    #[test]
    fn test_colorize_without_table_falls_back_to_gray() {
        let noise = Constant(0.0);
        let ctx = FrameContext {
            noise_params: NoiseParameters {
                num_octaves: 1,
                ..Default::default()
            },
            render: RenderParameters {
                colorize: true,
                ..render(4)
            },
            ..context(&noise, render(4))
        };
        assert_eq!(PixelEvaluator::new(&ctx).evaluate(0, 0), Color32::gray(128));
    }

    #[test]
    fn test_clut_from_gradient_matches_linear_field() {
        // Field sweeps the full range across a row
        let noise = FromFn(|p: Vec2| p.x / 2.0);
        let clut = ColorLookupTable::from_gradient(&ColorGradient::linear(
            Color32::BLACK,
            Color32::WHITE,
        ));
        let ctx = FrameContext {
            noise_params: NoiseParameters {
                num_octaves: 1,
                ..Default::default()
            },
            render: RenderParameters {
                colorize: true,
                ..render(4)
            },
            clut: Some(&clut),
            ..context(&noise, render(4))
        };
        let eval = PixelEvaluator::new(&ctx);

        let row: Vec<u8> = (0..4).map(|c| eval.evaluate(c, 0).r).collect();
        assert!(row.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(row[0], 0);
    }

    #[test]
    #[should_panic(expected = "NaN")]
    fn test_nan_is_fatal() {
        let noise = Constant(f32::NAN);
        PixelEvaluator::new(&context(&noise, render(2))).shade(0, 0);
    }
}
