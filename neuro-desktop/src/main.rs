use neuro::{Neuro, Settings};

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use std::error::Error;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

#[cfg(target_os = "macos")]
use winit::platform::macos::WindowAttributesExtMacOS;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage: neuro-desktop [settings.json]
    let settings = match std::env::args().nth(1) {
        Some(path) => read_settings(&path)?,
        None => Settings::default(),
    };

    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;

    app.exit_state
}

fn read_settings(path: &str) -> Result<Settings, Box<dyn Error>> {
    log::info!("Reading settings from {}", path);
    let source = std::fs::read_to_string(path)?;
    Ok(Settings::from_json(&source)?)
}

struct App {
    settings: Settings,
    start: Instant,
    state: Option<GlState>,
    exit_state: Result<(), Box<dyn Error>>,
}

impl App {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            start: Instant::now(),
            state: None,
            exit_state: Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match GlState::new(event_loop, &self.settings) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Cannot start Neuro: {}", err);
                self.exit_state = Err(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("👋 Closing");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => state.resize(physical_size),

            WindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f64>(state.window.scale_factor());
                state.neuro.pointer_moved(position.x, position.y);
            }

            // Wheel deltas point up the page; progress grows down it.
            // Neuro drops these unless `scrollFromInput` is set.
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, lines) => state.neuro.scroll_lines(-lines),
                MouseScrollDelta::PixelDelta(position) => {
                    let position = position.to_logical::<f64>(state.window.scale_factor());
                    state.neuro.scroll_pixels(-position.y);
                }
            },

            WindowEvent::RedrawRequested => {
                state
                    .neuro
                    .animate(self.start.elapsed().as_secs_f64() * 1000.0);

                if let Err(err) = state.gl_surface.swap_buffers(&state.gl_context) {
                    log::error!("Cannot swap buffers: {}", err);
                }
            }

            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }
}

// Fields drop in order: GL objects go before the context that owns them.
struct GlState {
    neuro: Neuro,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl GlState {
    fn new(event_loop: &ActiveEventLoop, settings: &Settings) -> Result<Self, Box<dyn Error>> {
        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_transparency(true);
        let display_builder =
            DisplayBuilder::new().with_window_attributes(Some(window_attributes()));

        let (window, gl_config) = display_builder.build(event_loop, template, pick_config)?;
        let window = window.ok_or("Cannot create a window")?;

        let raw_window_handle = window.window_handle()?.as_raw();
        let gl_display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let not_current_context =
            unsafe { gl_display.create_context(&gl_config, &context_attributes)? };
        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let gl_surface =
            unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes)? };
        let gl_context = not_current_context.make_current(&gl_surface)?;

        if let Err(err) =
            gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            log::warn!("Cannot enable vsync: {}", err);
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        };

        let physical_size = window.inner_size();
        let logical_size = physical_size.to_logical::<u32>(window.scale_factor());

        let neuro = Neuro::new(
            &Rc::new(gl),
            logical_size.width,
            logical_size.height,
            physical_size.width,
            physical_size.height,
            settings,
        )?;

        Ok(Self {
            neuro,
            gl_surface,
            gl_context,
            window,
        })
    }

    fn resize(&mut self, physical_size: PhysicalSize<u32>) {
        // A minimised window reports a zero size. The surface can't take it.
        if let (Some(width), Some(height)) = (
            NonZeroU32::new(physical_size.width),
            NonZeroU32::new(physical_size.height),
        ) {
            self.gl_surface.resize(&self.gl_context, width, height);
        }

        let logical_size = physical_size.to_logical::<u32>(self.window.scale_factor());
        self.neuro.resize(
            logical_size.width,
            logical_size.height,
            physical_size.width,
            physical_size.height,
        );
    }
}

fn window_attributes() -> WindowAttributes {
    let attributes = Window::default_attributes()
        .with_title("Neuro")
        .with_inner_size(LogicalSize::new(1280, 800))
        .with_resizable(true)
        .with_transparent(true);

    #[cfg(target_os = "macos")]
    let attributes = attributes
        .with_title_hidden(true)
        .with_titlebar_transparent(true)
        .with_fullsize_content_view(true);

    attributes
}

// Prefer a config that can show the page behind the window, otherwise keep
// the first one offered. glutin-winit only calls this with the configs that
// matched the template; a display with none fails in `find_configs` first.
fn pick_config(mut configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    let first = configs
        .next()
        .expect("glutin-winit picks from a non-empty config list");

    if first.supports_transparency().unwrap_or(false) {
        return first;
    }

    configs
        .find(|config| config.supports_transparency().unwrap_or(false))
        .unwrap_or(first)
}
