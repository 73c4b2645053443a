//! noisegram - dynamic noise image next to its live intensity histogram
//!
//! Every frame builds a new layered noise field, renders it to a gray bitmap,
//! bins the bitmap's intensities and draws image and histogram side by side.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use noisegram::chart::{self, ChartAxes};
use noisegram::cli::Args;
use noisegram::frame::FrameGenerator;
use noisegram::layout::Grid;
use noisegram::params::RenderConfig;
use noisegram::rendering::RenderSystem;
use noisegram::snapshot::write_snapshot;

/// Gap around each pane (pixels)
const PANE_MARGIN: f32 = 16.0;

struct FpsTracker {
    frame_times: VecDeque<Duration>,
    last_frame: Instant,
    last_report: Instant,
}

impl FpsTracker {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_times: VecDeque::new(),
            last_frame: now,
            last_report: now,
        }
    }

    fn record_frame(&mut self, frame_index: u64) {
        let now = Instant::now();
        self.frame_times.push_back(now - self.last_frame);
        self.last_frame = now;
        if self.frame_times.len() > 60 {
            self.frame_times.pop_front();
        }

        if now - self.last_report > Duration::from_secs(1) {
            log::debug!("Frame {}: {:.1} FPS", frame_index, self.current_fps());
            self.last_report = now;
        }
    }

    fn current_fps(&self) -> f32 {
        let total: Duration = self.frame_times.iter().sum();
        let avg = total.as_secs_f32() / self.frame_times.len().max(1) as f32;
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }
}

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Frame pipeline
    frames: FrameGenerator,

    // Configuration
    render_config: RenderConfig,
    grid: Grid,

    fps: FpsTracker,
}

impl App {
    fn new(render_config: RenderConfig, frames: FrameGenerator) -> Self {
        let grid = Grid::new(render_config.grid_rows, render_config.grid_cols);
        Self {
            window: None,
            render_system: None,
            frames,
            render_config,
            grid,
            fps: FpsTracker::new(),
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
            .with_title(self.render_config.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let frame = self.frames.frame();
        let image_size = (frame.bitmap.width(), frame.bitmap.height());
        let max_bins = self.frames.histogram_params().bins;

        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            image_size,
            max_bins,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Press ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

impl App {
    /// Generate, upload and draw a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let frame = match self.frames.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Frame generation failed: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Copy host buffers into display-side storage
        render_system.update_image(frame.bitmap);
        let axes = ChartAxes::for_histogram(frame.bitmap.pixel_count(), frame.histogram.bins());
        render_system.update_chart(&chart::bar_vertices(frame.histogram, &axes));

        let surface = render_system.size();
        let image_aspect = frame.bitmap.width() as f32 / frame.bitmap.height() as f32;
        let image_viewport = self
            .grid
            .cell(0, 0, surface)
            .inset(PANE_MARGIN)
            .fit_aspect(image_aspect);
        let chart_viewport = self.grid.cell(1, 0, surface).inset(PANE_MARGIN);

        match render_system.render(image_viewport, chart_viewport) {
            Ok(()) => self.fps.record_frame(frame.index),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.resize(surface.0, surface.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu_core=warn,wgpu_hal=warn"),
    )
    .init();

    let args = Args::parse();
    let noise_params = args.noise_params().context("invalid noise configuration")?;
    let histogram_params = args
        .histogram_params()
        .context("invalid histogram configuration")?;

    log::info!(
        "Image {}x{}, {} bins, octaves {}..=0, persistence {}",
        args.size,
        args.size,
        histogram_params.bins,
        noise_params.max_octave,
        noise_params.persistence
    );
    if let Some(seed) = args.seed {
        log::info!("Seed: {}", seed);
    }

    let mut frames = FrameGenerator::new(
        args.size,
        args.size,
        noise_params,
        histogram_params,
        args.seed,
    )?;

    if let Some(dir) = &args.snapshot {
        write_snapshot(&mut frames, dir)
            .with_context(|| format!("failed to write snapshot to {}", dir.display()))?;
        return Ok(());
    }

    let mut app = App::new(args.render_config(), frames);
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app)?;

    Ok(())
}
