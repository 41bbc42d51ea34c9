// Window and event loop wiring loosely based on
// glutin's examples/window.rs
// and
// android-activity's examples-na-winit-glutin

use config::DemoConfig;
use input::command_for_physical_key;
use logging::init_logging;
use render_state::Flow;
use std::error::Error;
use std::ops::Add;
use std::time::{Duration, Instant};
use time::FrameClock;
use window::GlWindow;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod frame_updater;
pub mod geometry_buffers;
pub mod gl_context;
pub mod input;
pub mod logging;
pub mod mesh;
#[cfg(test)]
mod recording_context;
pub mod render_state;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod time;
pub mod window;

//

pub enum AppState {
    Paused,
    Active(GlWindow),
}

impl Default for AppState {
    fn default() -> Self {
        Self::Paused
    }
}

pub struct VboApp {
    state: AppState,
    config: DemoConfig,
    // survives suspend, unlike the window
    clock: FrameClock,
    failure: Option<Box<dyn Error>>,
}

impl VboApp {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            state: AppState::default(),
            config,
            clock: FrameClock::new(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, context: &str, e: Box<dyn Error>) {
        log::error!("{}: {}", context, e);
        self.failure = Some(e);
        self.state = AppState::Paused;
        event_loop.exit();
    }
}

impl ApplicationHandler for VboApp {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let (AppState::Active(app), StartCause::ResumeTimeReached { .. } | StartCause::Poll) =
            (&self.state, cause)
        {
            app.window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let AppState::Active(_) = self.state {
            return;
        }
        match GlWindow::new(event_loop, &self.config) {
            Ok(x) => {
                log::info!("{}", x.scene.state);
                self.clock.resume();
                x.window.request_redraw();
                self.state = AppState::Active(x);
            }
            Err(e) => self.fail(event_loop, "malfunction building window", e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        log::trace!("Received Winit event: {event:?}");

        let AppState::Active(app) = &mut self.state else {
            return;
        };

        let result = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::Resized(size) => app.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let Some(command) = command_for_physical_key(event.physical_key) {
                    if app.scene.state.apply(command) == Flow::Exit {
                        event_loop.exit();
                    }
                }
                Ok(())
            }
            WindowEvent::RedrawRequested => {
                let rval = app.frame(&mut self.clock);
                // trigger redraws every 6 milliseconds
                event_loop.set_control_flow(ControlFlow::WaitUntil(
                    Instant::now().add(Duration::from_millis(6)),
                ));
                rval
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.fail(event_loop, "frame failed", e);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        log::debug!("suspend");
        self.state = AppState::Paused;
    }
}

//

/// Read the configuration, start logging and run the demo until the window closes.
pub fn run() -> Result<(), Box<dyn Error>> {
    let config = DemoConfig::from_env();
    init_logging(config.logging());

    let event_loop = EventLoop::new()?;
    let mut app = VboApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
