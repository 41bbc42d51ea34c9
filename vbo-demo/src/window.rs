use crate::config::DemoConfig;
use crate::scene::VboScene;
use crate::time::FrameClock;
use gl_thin::gl_helper::initialize_gl_with;
use glutin::config::{Config, ConfigTemplate, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::{Display, DisplayApiPreference};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawWindowHandle};
use std::error::Error;
use std::ffi::CString;
use std::num::NonZeroU32;
use std::ptr::null;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

/// A window with a current GL 3.3 core context and the scene drawn into it.
pub struct GlWindow {
    // must drop while the context is still alive
    pub scene: VboScene,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    pub window: Window,
}

impl GlWindow {
    pub fn new(event_loop: &ActiveEventLoop, config: &DemoConfig) -> Result<Self, Box<dyn Error>> {
        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        let window = event_loop.create_window(attributes)?;
        let raw_window_handle = window.window_handle()?.as_raw();

        let display = unsafe {
            Display::new(
                event_loop.display_handle()?.as_raw(),
                display_api_preference(raw_window_handle),
            )
        }?;

        let template = Self::config_template(raw_window_handle);
        let gl_config = Self::pick_config(&display, template)?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }?;

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            non_zero(size.width),
            non_zero(size.height),
        );
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }?;

        let context = not_current.make_current(&surface)?;

        initialize_gl_with(|name| match CString::new(name) {
            Ok(name) => display.get_proc_address(&name),
            Err(_) => null(),
        });

        log::info!(
            "opened {}x{} window, {}",
            size.width,
            size.height,
            display.version_string()
        );

        let scene = VboScene::new(config, size.width, size.height)?;

        Ok(Self {
            scene,
            surface,
            context,
            window,
        })
    }

    /// Create template to find OpenGL config.
    pub fn config_template(raw_window_handle: RawWindowHandle) -> ConfigTemplate {
        ConfigTemplateBuilder::new()
            .with_depth_size(24)
            .compatible_with_native_window(raw_window_handle)
            .build()
    }

    fn pick_config(display: &Display, template: ConfigTemplate) -> Result<Config, Box<dyn Error>> {
        let configs_list: Vec<_> = unsafe { display.find_configs(template) }?.collect();
        log::debug!("glutin display configs [{}]", configs_list.len());

        configs_list
            .into_iter()
            .reduce(|accum, config| {
                // prefer the config with the most samples
                if config.num_samples() > accum.num_samples() {
                    config
                } else {
                    accum
                }
            })
            .ok_or_else(|| "no usable GL config".into())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Box<dyn Error>> {
        if width == 0 || height == 0 {
            // minimized
            return Ok(());
        }
        self.surface
            .resize(&self.context, non_zero(width), non_zero(height));
        self.scene.resize(width, height)?;
        Ok(())
    }

    /// update, render, swap.  The update sees the time before this frame's tick.
    pub fn frame(&mut self, clock: &mut FrameClock) -> Result<(), Box<dyn Error>> {
        let outcome = self.scene.update_frame(clock.elapsed_seconds())?;
        log::trace!("update {:?}", outcome);
        clock.tick();
        self.scene.render_frame(clock.elapsed_seconds())?;
        self.surface.swap_buffers(&self.context)?;
        Ok(())
    }
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

#[cfg(target_os = "macos")]
fn display_api_preference(_raw_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Cgl
}

#[cfg(target_os = "windows")]
fn display_api_preference(raw_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Wgl(Some(raw_window_handle))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn display_api_preference(_raw_window_handle: RawWindowHandle) -> DisplayApiPreference {
    DisplayApiPreference::Egl
}
