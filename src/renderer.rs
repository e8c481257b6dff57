//! Frame orchestration: parameters, lookup table, animation, and buffers.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;

use crate::animation::OffsetAnimator;
use crate::buffer::PixelBuffer;
use crate::color::{ColorGradient, ColorLookupTable};
use crate::error::{ConfigError, FrameError};
use crate::fill::{FillStats, FrameFiller};
use crate::noise::NoiseSource;
use crate::params::{FillSettings, NoiseParameters, RenderParameters, RendererConfig};
use crate::pixel::FrameContext;

/// Animated noise image driven by explicit ticks
///
/// Parameters change only through the setters, between frames. Each fill
/// works on an immutable snapshot and writes the back buffer; the buffers are
/// swapped only when the fill succeeds, so [`front`](Self::front) always holds
/// the last complete frame.
pub struct NoiseRenderer<N> {
    noise: N,
    noise_params: NoiseParameters,
    render: RenderParameters,
    gradient: ColorGradient,
    clut: Arc<ColorLookupTable>,
    rebuild_requested: bool,
    animator: OffsetAnimator,
    filler: FrameFiller,
    front: PixelBuffer,
    back: PixelBuffer,
    frames: u64,
}

impl<N: NoiseSource> NoiseRenderer<N> {
    /// Validate `config`, build the lookup table, and allocate both buffers
    pub fn new(config: RendererConfig, noise: N) -> Result<Self, ConfigError> {
        config.validate()?;

        let filler = FrameFiller::new(config.fill)?;
        let (front, back) = allocate_pair(config.render.texture_size)?;
        let clut = Arc::new(ColorLookupTable::from_gradient(&config.gradient));

        log::info!(
            "Noise renderer ready: {0}x{0}, {1} octave(s), {2:?} fill on {3} worker(s)",
            config.render.texture_size,
            config.noise.num_octaves,
            filler.strategy(),
            filler.worker_count()
        );

        Ok(Self {
            noise,
            noise_params: config.noise,
            render: config.render,
            gradient: config.gradient,
            clut,
            rebuild_requested: false,
            animator: OffsetAnimator::new(config.render.noise_offset, config.render.offset_velocity),
            filler,
            front,
            back,
            frames: 0,
        })
    }

    /// Advance one frame
    ///
    /// Rebuilds the lookup table if requested, drifts the offset by
    /// `elapsed_s`, then renders. On error the previous frame stays in front.
    pub fn tick(&mut self, elapsed_s: f32) -> Result<&PixelBuffer, FrameError> {
        if self.rebuild_requested {
            self.rebuild_clut();
        }

        self.animator.advance(elapsed_s);
        self.render()
    }

    /// Re-render at the current offset without advancing time
    pub fn render(&mut self) -> Result<&PixelBuffer, FrameError> {
        let clut = Arc::clone(&self.clut);
        let ctx = FrameContext {
            noise: &self.noise,
            noise_params: self.noise_params,
            render: self.render_params(),
            clut: Some(&*clut),
        };

        let start = Instant::now();
        let stats = self.filler.fill(&mut self.back, &ctx)?;
        self.log_frame(&stats, start);

        std::mem::swap(&mut self.front, &mut self.back);
        self.frames += 1;

        Ok(&self.front)
    }

    fn log_frame(&self, stats: &FillStats, start: Instant) {
        log::trace!(
            "frame {}: {} pixels in {:.2}ms",
            self.frames,
            stats.pixels,
            start.elapsed().as_secs_f64() * 1000.0
        );

        if stats.clamped_pixels > 0 {
            log::debug!(
                "frame {}: octave sum out of range at {} of {} pixels",
                self.frames,
                stats.clamped_pixels,
                stats.pixels
            );
        }
    }

    /// Ask for the lookup table to be rebuilt from the current gradient
    ///
    /// Acts once on the next tick; repeated requests before then collapse.
    pub fn request_clut_rebuild(&mut self) {
        self.rebuild_requested = true;
    }

    pub fn clut_rebuild_pending(&self) -> bool {
        self.rebuild_requested
    }

    fn rebuild_clut(&mut self) {
        // Fills holding the old table keep it alive until they finish
        self.clut = Arc::new(ColorLookupTable::from_gradient(&self.gradient));
        self.rebuild_requested = false;
        log::debug!("Rebuilt color lookup table ({} stops)", self.gradient.stops().len());
    }

    /// Replace the gradient; takes effect on the next requested rebuild
    pub fn set_gradient(&mut self, gradient: ColorGradient) {
        self.gradient = gradient;
    }

    pub fn set_noise_params(&mut self, params: NoiseParameters) -> Result<(), ConfigError> {
        params.validate()?;
        self.noise_params = params;
        Ok(())
    }

    /// Replace render parameters
    ///
    /// Resets the animated offset and velocity to those in `params`. Buffers
    /// are reallocated only when the texture size changes; if that allocation
    /// fails nothing is modified.
    pub fn set_render_params(&mut self, params: RenderParameters) -> Result<(), ConfigError> {
        params.validate()?;

        if params.texture_size != self.render.texture_size {
            let (front, back) = allocate_pair(params.texture_size)?;
            log::info!(
                "Reallocated frame buffers: {0}x{0} -> {1}x{1}",
                self.render.texture_size,
                params.texture_size
            );
            self.front = front;
            self.back = back;
        }

        self.animator = OffsetAnimator::new(params.noise_offset, params.offset_velocity);
        self.render = params;
        Ok(())
    }

    pub fn set_fill_settings(&mut self, settings: FillSettings) -> Result<(), ConfigError> {
        self.filler = FrameFiller::new(settings)?;
        Ok(())
    }

    pub fn set_vignette(&mut self, enabled: bool) {
        self.render.vignette = enabled;
    }

    pub fn set_colorize(&mut self, enabled: bool) {
        self.render.colorize = enabled;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.render.offset_velocity = velocity;
        self.animator.set_velocity(velocity);
    }

    /// Last completed frame
    pub fn front(&self) -> &PixelBuffer {
        &self.front
    }

    /// Current lookup table snapshot
    pub fn clut(&self) -> Arc<ColorLookupTable> {
        Arc::clone(&self.clut)
    }

    pub fn gradient(&self) -> &ColorGradient {
        &self.gradient
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn noise_params(&self) -> NoiseParameters {
        self.noise_params
    }

    /// Render parameters with the current animated offset
    pub fn render_params(&self) -> RenderParameters {
        RenderParameters {
            noise_offset: self.animator.offset(),
            ..self.render
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.animator.offset()
    }

    pub fn texture_size(&self) -> u32 {
        self.render.texture_size
    }

    pub fn filler(&self) -> &FrameFiller {
        &self.filler
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

fn allocate_pair(size: u32) -> Result<(PixelBuffer, PixelBuffer), FrameError> {
    Ok((PixelBuffer::try_new(size)?, PixelBuffer::try_new(size)?))
}
