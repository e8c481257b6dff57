//! Full-frame fill: sequential and chunked parallel strategies.
//!
//! Every pixel is a pure function of its coordinates and the shared frame
//! snapshot, so chunk size and execution order never change the result.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::buffer::PixelBuffer;
use crate::color::Color32;
use crate::error::{ConfigError, FrameError};
use crate::noise::NoiseSource;
use crate::params::{FillSettings, FillStrategy};
use crate::pixel::{FrameContext, PixelEvaluator};

/// Summary of one fill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    pub pixels: usize,
    /// Pixels whose intensity left [0, 1] before clamping
    pub clamped_pixels: usize,
}

impl FillStats {
    fn merge(self, other: Self) -> Self {
        Self {
            pixels: self.pixels + other.pixels,
            clamped_pixels: self.clamped_pixels + other.clamped_pixels,
        }
    }
}

/// Recomputes whole frames with a fixed strategy
///
/// Holds no per-frame state; the optional pool is reused across frames.
pub struct FrameFiller {
    strategy: FillStrategy,
    pool: Option<ThreadPool>,
}

impl FrameFiller {
    pub fn new(settings: FillSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        let pool = match (settings.strategy, settings.workers) {
            (FillStrategy::Parallel { .. }, Some(workers)) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("driftfield-fill-{i}"))
                    .build()?,
            ),
            (FillStrategy::Sequential, Some(_)) => {
                log::warn!("worker count ignored for sequential fill");
                None
            }
            _ => None,
        };

        Ok(Self {
            strategy: settings.strategy,
            pool,
        })
    }

    pub fn sequential() -> Self {
        Self {
            strategy: FillStrategy::Sequential,
            pool: None,
        }
    }

    pub fn strategy(&self) -> FillStrategy {
        self.strategy
    }

    /// Number of threads a parallel fill can use
    pub fn worker_count(&self) -> usize {
        match (self.strategy, &self.pool) {
            (FillStrategy::Sequential, _) => 1,
            (_, Some(pool)) => pool.current_num_threads(),
            (_, None) => rayon::current_num_threads(),
        }
    }

    /// Overwrite every pixel of `buffer` for the frame described by `ctx`
    ///
    /// Returns only once the whole buffer is written.
    pub fn fill<N: NoiseSource + ?Sized>(
        &self,
        buffer: &mut PixelBuffer,
        ctx: &FrameContext<'_, N>,
    ) -> Result<FillStats, FrameError> {
        if ctx.render.texture_size == 0 {
            return Err(FrameError::ZeroSize);
        }

        let expected = ctx.render.pixel_count();
        if buffer.size() != ctx.render.texture_size || buffer.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }

        let size = ctx.render.texture_size;
        let pixels = buffer.pixels_mut();

        let stats = match self.strategy {
            FillStrategy::Sequential => fill_sequential(pixels, size, ctx),
            FillStrategy::Parallel { chunk_pixels } => match &self.pool {
                Some(pool) => pool.install(|| fill_parallel(pixels, size, chunk_pixels, ctx)),
                None => fill_parallel(pixels, size, chunk_pixels, ctx),
            },
        };

        Ok(stats)
    }
}

impl std::fmt::Debug for FrameFiller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameFiller")
            .field("strategy", &self.strategy)
            .field("workers", &self.worker_count())
            .finish()
    }
}

/// Rows then columns on the calling thread
fn fill_sequential<N: NoiseSource + ?Sized>(
    pixels: &mut [Color32],
    size: u32,
    ctx: &FrameContext<'_, N>,
) -> FillStats {
    let eval = PixelEvaluator::new(ctx);
    let mut clamped_pixels = 0;

    for (row, line) in pixels.chunks_exact_mut(size as usize).enumerate() {
        for (column, pixel) in line.iter_mut().enumerate() {
            let shade = eval.shade(column as u32, row as u32);
            *pixel = shade.color;
            clamped_pixels += shade.clamped as usize;
        }
    }

    FillStats {
        pixels: pixels.len(),
        clamped_pixels,
    }
}

/// Fixed-size chunks of the flat index range, one rayon task each
fn fill_parallel<N: NoiseSource + ?Sized>(
    pixels: &mut [Color32],
    size: u32,
    chunk_pixels: usize,
    ctx: &FrameContext<'_, N>,
) -> FillStats {
    let eval = PixelEvaluator::new(ctx);
    let side = size as usize;

    pixels
        .par_chunks_mut(chunk_pixels)
        .enumerate()
        .map(|(chunk_index, chunk)| {
            let start = chunk_index * chunk_pixels;
            let mut clamped_pixels = 0;

            for (offset, pixel) in chunk.iter_mut().enumerate() {
                let ndx = start + offset;
                let shade = eval.shade((ndx % side) as u32, (ndx / side) as u32);
                *pixel = shade.color;
                clamped_pixels += shade.clamped as usize;
            }

            FillStats {
                pixels: chunk.len(),
                clamped_pixels,
            }
        })
        .reduce(FillStats::default, FillStats::merge)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::color::{ColorLookupTable, GradientPreset};
    use crate::noise::{Constant, FromFn, PerlinSource};
    use crate::params::{NoiseParameters, RenderParameters};

    fn render(size: u32) -> RenderParameters {
        RenderParameters {
            texture_size: size,
            noise_scale: 6.0,
            noise_offset: Vec2::new(0.3, -2.7),
            offset_velocity: Vec2::ZERO,
            vignette: true,
            colorize: true,
        }
    }

    fn filled<N: NoiseSource + ?Sized>(
        filler: &FrameFiller,
        ctx: &FrameContext<'_, N>,
    ) -> PixelBuffer {
        let mut buffer = PixelBuffer::try_new(ctx.render.texture_size).unwrap();
        filler.fill(&mut buffer, ctx).unwrap();
        buffer
    }

    #[test]
    fn test_sequential_and_parallel_match() {
        let noise = PerlinSource::new(42);
        let clut = ColorLookupTable::from_gradient(&GradientPreset::Terrain.gradient());
        let sequential = FrameFiller::sequential();
        let fillers = [
            FrameFiller::new(FillSettings::parallel(64)).unwrap(),
            FrameFiller::new(FillSettings::parallel(1)).unwrap(),
            FrameFiller::new(FillSettings::parallel(1000)).unwrap(),
            FrameFiller::new(FillSettings {
                workers: Some(3),
                ..FillSettings::parallel(64)
            })
            .unwrap(),
        ];

        for size in [1, 2, 64, 257] {
            let ctx = FrameContext {
                noise: &noise,
                noise_params: NoiseParameters::default(),
                render: render(size),
                clut: Some(&clut),
            };
            let expected = filled(&sequential, &ctx);

            for filler in &fillers {
                let actual = filled(filler, &ctx);
                assert_eq!(
                    expected.as_bytes(),
                    actual.as_bytes(),
                    "size {size}, {filler:?}"
                );
            }
        }
    }

    #[test]
    fn test_fill_writes_row_major() {
        // Upper half of the field at -1, lower half at +1
        let noise = FromFn(|p: Vec2| if p.y < 0.0 { -1.0 } else { 1.0 });
        let ctx = FrameContext {
            noise: &noise,
            noise_params: NoiseParameters {
                num_octaves: 1,
                ..Default::default()
            },
            render: RenderParameters {
                texture_size: 4,
                noise_scale: 4.0,
                noise_offset: Vec2::ZERO,
                offset_velocity: Vec2::ZERO,
                vignette: false,
                colorize: false,
            },
            clut: None,
        };

        let fillers = [
            FrameFiller::sequential(),
            FrameFiller::new(FillSettings::parallel(3)).unwrap(),
        ];

        for filler in fillers {
            let buffer = filled(&filler, &ctx);
            // Rows 0 and 1 sample y < 0
            assert_eq!(buffer.get(3, 1), Some(Color32::BLACK));
            assert_eq!(buffer.get(0, 2), Some(Color32::WHITE));
            assert_eq!(buffer.pixels()[7], Color32::BLACK);
            assert_eq!(buffer.pixels()[8], Color32::WHITE);
        }
    }

    #[test]
    fn test_end_to_end_zero_field() {
        let noise = Constant(0.0);
        let ctx = FrameContext {
            noise: &noise,
            noise_params: NoiseParameters {
                num_octaves: 1,
                ..Default::default()
            },
            render: RenderParameters {
                texture_size: 4,
                noise_scale: 4.0,
                noise_offset: Vec2::ZERO,
                offset_velocity: Vec2::ZERO,
                vignette: false,
                colorize: false,
            },
            clut: None,
        };

        let mut buffer = PixelBuffer::try_new(4).unwrap();
        let stats = FrameFiller::new(FillSettings::default())
            .unwrap()
            .fill(&mut buffer, &ctx)
            .unwrap();

        assert_eq!(
            stats,
            FillStats {
                pixels: 16,
                clamped_pixels: 0
            }
        );
        assert!(buffer
            .pixels()
            .iter()
            .all(|c| *c == Color32::rgba(128, 128, 128, 255)));
    }

    #[test]
    fn test_stats_count_clamped_pixels() {
        // Octave sum is 2x, so the field leaves [0, 1] away from x = 0
        let noise = FromFn(|p: Vec2| p.x * 0.5);
        let ctx = FrameContext {
            noise: &noise,
            noise_params: NoiseParameters::default(),
            render: render(64),
            clut: None,
        };

        let seq = filled(&FrameFiller::sequential(), &ctx);
        let mut buffer = PixelBuffer::try_new(64).unwrap();
        let stats = FrameFiller::new(FillSettings::parallel(64))
            .unwrap()
            .fill(&mut buffer, &ctx)
            .unwrap();
        let seq_stats = FrameFiller::sequential().fill(&mut buffer, &ctx).unwrap();

        assert!(stats.clamped_pixels > 0);
        assert!(stats.clamped_pixels < stats.pixels);
        assert_eq!(stats, seq_stats);
        assert_eq!(stats.pixels, 64 * 64);
        assert_eq!(seq, buffer);
    }

    #[test]
    fn test_buffer_size_mismatch_rejected() {
        let noise = Constant(0.0);
        let ctx = FrameContext {
            noise: &noise,
            noise_params: NoiseParameters::default(),
            render: render(8),
            clut: None,
        };
        let mut buffer = PixelBuffer::try_new(4).unwrap();

        let result = FrameFiller::sequential().fill(&mut buffer, &ctx);
        assert!(matches!(
            result,
            Err(FrameError::BufferSize {
                expected: 64,
                actual: 16
            })
        ));
    }

    #[test]
    fn test_zero_size_frame_rejected_by_both_strategies() {
        let noise = Constant(0.0);
        let ctx = FrameContext {
            noise: &noise,
            noise_params: NoiseParameters::default(),
            render: render(0),
            clut: None,
        };

        for filler in [
            FrameFiller::sequential(),
            FrameFiller::new(FillSettings::parallel(64)).unwrap(),
        ] {
            let mut buffer = PixelBuffer::try_new(1).unwrap();
            let before = buffer.clone();
            assert!(matches!(
                filler.fill(&mut buffer, &ctx),
                Err(FrameError::ZeroSize)
            ));
            assert_eq!(buffer, before);
        }
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            FrameFiller::new(FillSettings::parallel(0)),
            Err(ConfigError::ZeroChunkSize)
        ));
    }

    #[test]
    fn test_dedicated_pool_size() {
        let filler = FrameFiller::new(FillSettings {
            workers: Some(2),
            ..FillSettings::parallel(64)
        })
        .unwrap();
        assert_eq!(filler.worker_count(), 2);
        assert_eq!(FrameFiller::sequential().worker_count(), 1);
    }
}
