//! Driftfield - animated fractal noise in a window
//!
//! Renders the noise field on the CPU every frame and presents it as a
//! texture. Keys: V vignette, C colorize, G next gradient, R rebuild
//! gradient table, Space pause drift, Esc quit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use driftfield::cli::Args;
use driftfield::rendering::TexturePresenter;
use driftfield::{GradientPreset, NoiseRenderer, PerlinSource};

/// Fixed timestep for headless runs (seconds)
const HEADLESS_STEP_S: f32 = 1.0 / 60.0;

/// Main application state
struct App {
    // Window and presentation
    window: Option<Arc<Window>>,
    presenter: Option<TexturePresenter>,

    // Frame generation
    renderer: NoiseRenderer<PerlinSource>,
    preset: GradientPreset,
    paused: bool,

    // Time tracking
    last_frame: Instant,
}

impl App {
    fn new(renderer: NoiseRenderer<PerlinSource>, preset: GradientPreset) -> Self {
        Self {
            window: None,
            presenter: None,
            renderer,
            preset,
            paused: false,
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyV => {
                let enabled = !self.renderer.render_params().vignette;
                self.renderer.set_vignette(enabled);
                log::info!("Vignette: {}", if enabled { "on" } else { "off" });
            }
            KeyCode::KeyC => {
                let enabled = !self.renderer.render_params().colorize;
                self.renderer.set_colorize(enabled);
                log::info!("Colorize: {}", if enabled { "on" } else { "off" });
            }
            KeyCode::KeyG => {
                self.preset = self.preset.next();
                self.renderer.set_gradient(self.preset.gradient());
                self.renderer.request_clut_rebuild();
                log::info!("Gradient: {}", self.preset.name());
            }
            KeyCode::KeyR => self.renderer.request_clut_rebuild(),
            KeyCode::Space => {
                self.paused = !self.paused;
                log::info!("Drift {}", if self.paused { "paused" } else { "resumed" });
            }
            _ => {}
        }
    }

    /// Generate and present a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };

        let elapsed_s = self.last_frame.elapsed().as_secs_f32();
        self.last_frame = Instant::now();
        let elapsed_s = if self.paused { 0.0 } else { elapsed_s };

        match self.renderer.tick(elapsed_s) {
            Ok(frame) => presenter.upload(frame),
            // Texture still holds the last good frame
            Err(e) => log::error!("Frame failed, keeping previous frame: {e}"),
        }

        match presenter.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Driftfield")
            .with_inner_size(winit::dpi::LogicalSize::new(800, 800));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let texture_size = self.renderer.texture_size();
        let presenter =
            match pollster::block_on(TexturePresenter::new(Arc::clone(&window), texture_size)) {
                Ok(presenter) => presenter,
                Err(e) => {
                    log::error!("Failed to initialize presentation: {e}");
                    event_loop.exit();
                    return;
                }
            };

        log::info!("Driftfield is running (Esc to quit)");

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Tick a fixed number of frames without a window and report fill timing
fn run_headless(
    mut renderer: NoiseRenderer<PerlinSource>,
    frames: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let size = renderer.texture_size();
    log::info!("Headless: {frames} frames at {size}x{size}");

    let mut total = Duration::ZERO;
    let mut slowest = Duration::ZERO;

    for _ in 0..frames {
        let start = Instant::now();
        renderer.tick(HEADLESS_STEP_S)?;
        let elapsed = start.elapsed();

        total += elapsed;
        slowest = slowest.max(elapsed);
    }

    if frames > 0 {
        let mean = total / frames;
        log::info!(
            "Mean frame: {:.2}ms ({:.1} fps), slowest: {:.2}ms, final offset: {}",
            mean.as_secs_f64() * 1000.0,
            1.0 / mean.as_secs_f64().max(f64::EPSILON),
            slowest.as_secs_f64() * 1000.0,
            renderer.offset()
        );
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let preset = args.parse_gradient_preset();
    let renderer = NoiseRenderer::new(args.renderer_config(), PerlinSource::new(args.seed))?;

    if let Some(frames) = args.headless {
        return run_headless(renderer, frames);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(renderer, preset);
    event_loop.run_app(&mut app)?;

    Ok(())
}
