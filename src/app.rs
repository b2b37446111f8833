//! Window shell: a winit event loop driving a [`Portfolio`].
//!
//! The shell owns everything platform-facing: the window, the GPU surface,
//! raw input and the wall clock. Each redraw it turns completed clicks into
//! pointer events, advances the portfolio, clears the surface to the current
//! sky colour and mirrors the scene flags into the window title.

use std::sync::Arc;

use glam::Vec2;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::clock::Clock;
use crate::config::PortfolioConfig;
use crate::error::AppError;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::portfolio::Portfolio;

/// Open the window and run until it is closed.
pub fn run(config: PortfolioConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DeskfolioApp {
        state: AppState::Pending(config),
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct DeskfolioApp {
    state: AppState,
    /// Startup failure reported once the event loop has exited.
    error: Option<AppError>,
}

enum AppState {
    Pending(PortfolioConfig),
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        portfolio: Portfolio,
        input: Input,
        clock: Clock,
        base_title: String,
        title: String,
    },
    Stopped,
}

impl AppState {
    fn start(event_loop: &ActiveEventLoop, config: PortfolioConfig) -> Result<Self, AppError> {
        let attrs = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let portfolio = Portfolio::new(&config);
        info!(
            width = gpu.width(),
            height = gpu.height(),
            "scene started"
        );
        window.request_redraw();

        Ok(AppState::Running {
            window,
            gpu,
            portfolio,
            input: Input::new(),
            clock: Clock::new(),
            base_title: config.window.title.clone(),
            title: config.window.title,
        })
    }
}

impl ApplicationHandler for DeskfolioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Pending(_)) {
            return;
        }
        let AppState::Pending(config) = std::mem::replace(&mut self.state, AppState::Stopped)
        else {
            return;
        };
        match AppState::start(event_loop, config) {
            Ok(running) => self.state = running,
            Err(err) => {
                error!(error = %err, "startup failed");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running {
            window,
            gpu,
            portfolio,
            input,
            clock,
            base_title,
            title,
        } = &mut self.state
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let tick = clock.tick();
                let viewport = Vec2::new(gpu.width() as f32, gpu.height() as f32);

                for &cursor in input.clicks() {
                    let pointer = portfolio.pick(cursor, viewport);
                    portfolio.click(&pointer);
                }
                portfolio.handle_keys(input);
                portfolio.tick(tick, input);

                match gpu.clear(portfolio.sky_color()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(err) => warn!(error = %err, "frame skipped"),
                }

                let status = portfolio.status_line();
                let next = if status.is_empty() {
                    base_title.clone()
                } else {
                    format!("{base_title} | {status}")
                };
                if *title != next {
                    window.set_title(&next);
                    *title = next;
                }

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}
