use crate::size::{effective_pixel_ratio, physical_from_logical_size};

use gloo_utils::format::JsValueSerdeExt;
use neuro::{Settings, CANVAS_ELEMENT_ID};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

/// The neuro background, mounted onto a canvas and animating itself until
/// it is unmounted.
#[wasm_bindgen]
pub struct Neuro {
    background: Rc<RefCell<Background>>,

    // Dropping these removes the listeners and stops the frame loop.
    #[allow(dead_code)]
    listeners: Vec<Listener>,
    #[allow(dead_code)]
    frame_loop: FrameLoop,
}

#[wasm_bindgen]
impl Neuro {
    /// Mount onto the canvas with the given element id, `neuro` by default.
    #[wasm_bindgen(constructor)]
    pub fn new(settings_object: &JsValue, element_id: Option<String>) -> Result<Neuro, JsValue> {
        set_panic_hook();
        init_logging();

        let settings = settings_from_js(settings_object)?;
        let scroll_from_input = settings.scroll_from_input;
        let element_id = element_id.unwrap_or_else(|| CANVAS_ELEMENT_ID.to_string());
        log::info!("Mounting onto #{}", element_id);

        let background = Rc::new(RefCell::new(Background::new(&element_id, settings)?));

        let window = window()?;
        let mut listeners = vec![
            Listener::add(&window, "resize", {
                let background = Rc::clone(&background);
                move |_| {
                    if let Err(err) = background.borrow_mut().fit_to_window() {
                        log::error!("Cannot resize: {:?}", err);
                    }
                }
            })?,
            Listener::add(&window, "pointermove", {
                let background = Rc::clone(&background);
                move |event| {
                    if let Some(event) = event.dyn_ref::<MouseEvent>() {
                        background
                            .borrow_mut()
                            .pointer_moved(f64::from(event.client_x()), f64::from(event.client_y()));
                    }
                }
            })?,
        ];

        // Without this the scroll uniform only moves through `set_scroll_progress`.
        if scroll_from_input {
            listeners.push(Listener::add(&window, "scroll", {
                let background = Rc::clone(&background);
                move |_| {
                    if let Err(err) = background.borrow_mut().scrolled() {
                        log::error!("Cannot read the scroll position: {:?}", err);
                    }
                }
            })?);
        }

        let frame_loop = FrameLoop::start(Rc::clone(&background))?;

        Ok(Self {
            background,
            listeners,
            frame_loop,
        })
    }

    pub fn set_settings(&mut self, settings_object: &JsValue) -> Result<(), JsValue> {
        let settings = settings_from_js(settings_object)?;
        let mut background = self.background.borrow_mut();
        background.instance.update(&settings);
        background.fit_to_window()
    }

    /// Pointer position normalized to `[0, 1]`, with y pointing up.
    pub fn set_pointer_position(&mut self, u: f32, v: f32) {
        self.background
            .borrow_mut()
            .instance
            .set_pointer_position(u, v);
    }

    pub fn set_scroll_progress(&mut self, scroll_progress: f32) {
        self.background
            .borrow_mut()
            .instance
            .set_scroll_progress(scroll_progress);
    }

    /// Remove the event listeners and stop animating.
    pub fn unmount(self) {
        log::info!("Unmounting");
    }
}

struct Background {
    canvas: HtmlCanvasElement,
    instance: neuro::Neuro,
}

impl Background {
    fn new(element_id: &str, settings: Settings) -> Result<Self, JsValue> {
        let window = window()?;
        let logical_width = window_dimension(window.inner_width()?);
        let logical_height = window_dimension(window.inner_height()?);
        let pixel_ratio =
            effective_pixel_ratio(window.device_pixel_ratio(), settings.max_pixel_ratio);
        let (physical_width, physical_height) =
            physical_from_logical_size(logical_width, logical_height, pixel_ratio);

        let (canvas, gl) = get_rendering_context(element_id)?;
        size_canvas(
            &canvas,
            logical_width,
            logical_height,
            physical_width,
            physical_height,
        )?;

        let instance = neuro::Neuro::new(
            &Rc::new(gl),
            logical_width,
            logical_height,
            physical_width,
            physical_height,
            &settings,
        )
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

        Ok(Self { canvas, instance })
    }

    fn animate(&mut self, timestamp: f64) {
        self.instance.animate(timestamp);
    }

    fn fit_to_window(&mut self) -> Result<(), JsValue> {
        let window = window()?;
        let logical_width = window_dimension(window.inner_width()?);
        let logical_height = window_dimension(window.inner_height()?);
        let pixel_ratio = effective_pixel_ratio(
            window.device_pixel_ratio(),
            self.instance.settings().max_pixel_ratio,
        );
        let (physical_width, physical_height) =
            physical_from_logical_size(logical_width, logical_height, pixel_ratio);

        let viewport = self.instance.viewport();
        if (viewport.logical_width, viewport.logical_height)
            == (logical_width, logical_height)
            && (viewport.physical_width, viewport.physical_height)
                == (physical_width, physical_height)
        {
            return Ok(());
        }

        size_canvas(
            &self.canvas,
            logical_width,
            logical_height,
            physical_width,
            physical_height,
        )?;
        self.instance.resize(
            logical_width,
            logical_height,
            physical_width,
            physical_height,
        );

        Ok(())
    }

    fn pointer_moved(&mut self, client_x: f64, client_y: f64) {
        let rect = self.canvas.get_bounding_client_rect();
        self.instance
            .pointer_moved(client_x - rect.left(), client_y - rect.top());
    }

    fn scrolled(&mut self) -> Result<(), JsValue> {
        let window = window()?;
        let scroll_height = window
            .document()
            .and_then(|document| document.document_element())
            .map(|element| f64::from(element.scroll_height()))
            .unwrap_or(0.0);
        let viewport_height = window.inner_height()?.as_f64().unwrap_or(0.0);

        self.instance
            .page_scrolled(window.scroll_y()?, scroll_height, viewport_height);

        Ok(())
    }
}

// A `requestAnimationFrame` loop that reschedules itself after every frame.
struct FrameLoop {
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start(background: Rc<RefCell<Background>>) -> Result<Self, JsValue> {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let next_callback = Rc::clone(&callback);
        let next_handle = Rc::clone(&handle);
        *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            background.borrow_mut().animate(timestamp);

            if let Some(callback) = next_callback.borrow().as_ref() {
                match request_animation_frame(callback) {
                    Ok(id) => next_handle.set(Some(id)),
                    Err(err) => log::error!("Cannot schedule the next frame: {:?}", err),
                }
            }
        }));

        if let Some(first) = callback.borrow().as_ref() {
            handle.set(Some(request_animation_frame(first)?));
        }

        Ok(Self { callback, handle })
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(id) = self.handle.take() {
            if let Ok(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
        }

        // The callback holds a reference to itself. Break the cycle.
        self.callback.borrow_mut().take();
    }
}

struct Listener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add<F>(target: &EventTarget, event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;

        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event_type,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

pub fn get_rendering_context(
    element_id: &str,
) -> Result<(HtmlCanvasElement, glow::Context), JsValue> {
    use web_sys::WebGl2RenderingContext as GL;

    let document = window()?
        .document()
        .ok_or_else(|| JsValue::from_str("I expected to find a document"))?;
    let canvas = document
        .get_element_by_id(element_id)
        .ok_or_else(|| {
            JsValue::from_str(&format!(
                "I expected to find a canvas element with id `{}`",
                element_id
            ))
        })?
        .dyn_into::<HtmlCanvasElement>()?;

    let options = ContextOptions {
        // The page shows through wherever the pattern is dark.
        alpha: true,
        depth: false,
        stencil: false,
        desynchronized: false,
        antialias: false,
        fail_if_major_performance_caveat: false,
        power_preference: "default",
        premultiplied_alpha: true,
        preserve_drawing_buffer: false,
    }
    .serialize()?;

    let gl = match canvas.get_context_with_context_options("webgl2", &options) {
        Ok(Some(gl)) => {
            let gl = gl.dyn_into::<GL>()?;
            glow::Context::from_webgl2_context(gl)
        }
        _ => {
            return Err(JsValue::from_str(
                "Can’t create the WebGl2 rendering context",
            ))
        }
    };

    Ok((canvas, gl))
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptions {
    pub alpha: bool,
    pub depth: bool,
    pub stencil: bool,
    pub desynchronized: bool,
    pub antialias: bool,
    pub fail_if_major_performance_caveat: bool,
    pub power_preference: &'static str,
    pub premultiplied_alpha: bool,
    pub preserve_drawing_buffer: bool,
}

impl ContextOptions {
    pub fn serialize(&self) -> Result<JsValue, JsValue> {
        JsValue::from_serde(self).map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

fn size_canvas(
    canvas: &HtmlCanvasElement,
    logical_width: u32,
    logical_height: u32,
    physical_width: u32,
    physical_height: u32,
) -> Result<(), JsValue> {
    let style = canvas.style();
    style.set_property("width", &format!("{}px", logical_width))?;
    style.set_property("height", &format!("{}px", logical_height))?;
    canvas.set_width(physical_width);
    canvas.set_height(physical_height);
    Ok(())
}

fn settings_from_js(settings_object: &JsValue) -> Result<Settings, JsValue> {
    if settings_object.is_undefined() || settings_object.is_null() {
        return Ok(Settings::default());
    }

    settings_object
        .into_serde()
        .map_err(|err| JsValue::from_str(&format!("Cannot read settings: {}", err)))
}

fn window_dimension(value: JsValue) -> u32 {
    value.as_f64().unwrap_or(0.0).max(0.0) as u32
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("The global `window` doesn’t exist"))
}

fn request_animation_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(callback.as_ref().unchecked_ref())
}

fn init_logging() {
    // Fails if a previous mount already installed the logger.
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("Console logging is already enabled");
    }
}

// https://github.com/rustwasm/console_error_panic_hook#readme
fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
