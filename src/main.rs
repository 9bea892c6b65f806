use std::sync::Arc;

use anyhow::Context as _;
use crossbeam::channel::{self, Receiver, Sender};
use glam::Vec2;
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod config;
mod error;
mod math;
mod renderer;
mod ui;

use config::AppConfig;
use error::RenderError;
use renderer::{FrameStatus, RedrawRequest, RenderContext};
use ui::{Overlay, OverlayInfo};

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    context: Option<RenderContext>,
    overlay: Option<Overlay>,

    redraw_tx: Sender<RedrawRequest>,
    redraw_rx: Receiver<RedrawRequest>,

    cursor: Vec2,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let (redraw_tx, redraw_rx) = channel::unbounded();

        Self {
            config,
            window: None,
            context: None,
            overlay: None,
            redraw_tx,
            redraw_rx,
            cursor: Vec2::ZERO,
            failure: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| RenderError::Initialization(format!("window: {e}")))?,
        );

        let context = RenderContext::new(window.clone(), &self.config, self.redraw_tx.clone())?;
        let overlay = Overlay::new(&window, &context.gpu, self.config.render.show_overlay);

        window.request_redraw();

        self.window = Some(window);
        self.context = Some(context);
        self.overlay = Some(overlay);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        error!("{err}");
        self.failure = Some(anyhow::Error::new(err));
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(context)) = (&self.window, &mut self.context) else {
            return;
        };

        let info = OverlayInfo {
            stats: context.mesh_stats,
            resolution: context.resolution,
            dragging: context.trackball.is_dragging(),
        };
        let overlay = self.overlay.as_mut().filter(|o| o.is_visible());

        let result = context.render(&**window, |gpu, encoder, view| {
            if let Some(overlay) = overlay {
                overlay.paint(window, gpu, encoder, view, &info);
            }
        });

        match result {
            Ok(FrameStatus::Presented) => {}
            Ok(FrameStatus::Skipped) => window.request_redraw(),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyR => {
                if let Some(context) = &mut self.context {
                    context.trackball.reset();
                }
            }
            KeyCode::KeyH => {
                if let Some(overlay) = &mut self.overlay {
                    overlay.toggle();
                    self.request_redraw();
                }
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(overlay), Some(window)) = (&mut self.overlay, &self.window) {
            let response = overlay.on_window_event(window, &event);
            if response.repaint && overlay.is_visible() {
                window.request_redraw();
            }
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                self.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.handle_key(event_loop, key);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);

                if let Some(context) = &mut self.context {
                    if context.trackball.is_dragging() {
                        let size = context.gpu.size;
                        context.trackball.drag_to(self.cursor, size);
                    }
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                if let Some(context) = &mut self.context {
                    let size = context.gpu.size;
                    match state {
                        ElementState::Pressed => context.trackball.begin_drag(self.cursor, size),
                        ElementState::Released => context.trackball.end_drag(),
                    }
                }
                self.request_redraw();
            }

            WindowEvent::RedrawRequested => self.render(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.redraw_rx.try_iter().count() > 0 {
            self.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let event_loop = EventLoop::new().context("winit: failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .context("winit: event loop failed")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
