//! Cumulus Desktop — native point-cloud viewer.
//!
//! Loads a PLY file, expands every point into a screen-facing triangle
//! sprite on the GPU, and renders the result with a fly camera. Uses
//! `winit` 0.30 for windowing and `cumulus-render` for everything GPU.

mod controller;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

use cumulus_cloud::{load_ply, PointCloud};
use cumulus_render::context::GpuContext;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "cumulus", about = "Point cloud viewer")]
struct Cli {
    /// Input point cloud (PLY).
    input: PathBuf,

    /// Sprite circumradius in pixels.
    #[arg(long, default_value_t = 3.0)]
    sprite_px: f32,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Winit 0.30 application handler.
struct App {
    cloud: PointCloud,
    sprite_px: f32,
    window: Option<Arc<Window>>,
    state: Option<AppState>,
    frame_count: u64,
}

impl App {
    fn new(cloud: PointCloud, sprite_px: f32) -> Self {
        Self {
            cloud,
            sprite_px,
            window: None,
            state: None,
            frame_count: 0,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized.
        }

        let attrs = WindowAttributes::default()
            .with_title("Cumulus — Point Cloud Viewer")
            .with_inner_size(LogicalSize::new(1280, 800))
            .with_min_inner_size(LogicalSize::new(400, 300));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let gpu = pollster::block_on(GpuContext::new_with_surface(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
        ))
        .expect("Failed to initialize GPU");

        let state = AppState::new(
            gpu,
            &self.cloud,
            self.sprite_px,
            size.width.max(1),
            size.height.max(1),
        );

        info!(
            "Cumulus initialized: {}×{}, {} points, GPU: {}",
            size.width,
            size.height,
            self.cloud.len(),
            state.gpu.adapter.get_info().name
        );

        self.state = Some(state);
        self.window = Some(window);

        // Request the first frame.
        self.window.as_ref().unwrap().request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(state)) = (self.window.as_ref(), self.state.as_mut()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed after {} frames", self.frame_count);
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.logical_key == Key::Named(NamedKey::Escape)
                    && event.state == ElementState::Pressed
                {
                    event_loop.exit();
                    return;
                }
                state
                    .controller
                    .process_key(&event.logical_key, event.state == ElementState::Pressed);
            }

            WindowEvent::Resized(new_size) => {
                state.resize(new_size.width, new_size.height);
                window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                match state.render_frame() {
                    Ok(stats) => {
                        self.frame_count += 1;
                        if self.frame_count % 300 == 0 {
                            info!(
                                "Frame {}: {} points, {} triangle vertices, {} draw call(s)",
                                self.frame_count,
                                stats.point_count,
                                stats.triangle_vertices,
                                stats.draw_calls
                            );
                        }
                    }
                    Err(cumulus_render::renderer::RenderError::Surface(
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                    )) => {
                        // Reconfigure surface on lost/outdated.
                        let size = window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        error!("Render error: {e}");
                    }
                }
                // Continuous redraws: the camera may be in motion.
                window.request_redraw();
            }

            _ => {}
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let cloud = match load_ply(&cli.input) {
        Ok(cloud) => cloud,
        Err(e) => {
            error!("Failed to load {}: {e}", cli.input.display());
            std::process::exit(1);
        }
    };
    info!("Loaded {} points from {}", cloud.len(), cli.input.display());

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cloud, cli.sprite_px);
    event_loop.run_app(&mut app).expect("Event loop error");
}
