use crate::{clock, pipeline, render, settings, uniforms};
use clock::Clock;
use pipeline::Pipeline;
use settings::Settings;
use uniforms::{UniformBridge, Uniforms, Viewport};

use thiserror::Error;

/// Something that can put a frame of the neuro pattern on screen.
pub trait Renderer {
    fn resize(&mut self, physical_width: u32, physical_height: u32);
    fn draw(&mut self, uniforms: &Uniforms);
}

pub struct Neuro<R = Pipeline> {
    renderer: R,
    settings: Settings,
    clock: Clock,
    bridge: UniformBridge,
}

impl Neuro<Pipeline> {
    pub fn new(
        context: &render::Context,
        logical_width: u32,
        logical_height: u32,
        physical_width: u32,
        physical_height: u32,
        settings: &Settings,
    ) -> Result<Self, Problem> {
        log::info!("✨ Initialising Neuro");

        let pipeline = Pipeline::new(context, physical_width, physical_height)?;

        Ok(Self::with_renderer(
            pipeline,
            logical_width,
            logical_height,
            physical_width,
            physical_height,
            settings,
        ))
    }
}

impl<R: Renderer> Neuro<R> {
    pub fn with_renderer(
        renderer: R,
        logical_width: u32,
        logical_height: u32,
        physical_width: u32,
        physical_height: u32,
        settings: &Settings,
    ) -> Self {
        log::info!("📐 Logical size: {}x{}", logical_width, logical_height);
        log::info!("📏 Physical size: {}x{}", physical_width, physical_height);

        let viewport = Viewport::new(
            logical_width,
            logical_height,
            physical_width,
            physical_height,
        );

        Self {
            renderer,
            settings: settings.clone(),
            clock: Clock::new(settings.time_scale),
            bridge: UniformBridge::new(viewport),
        }
    }

    pub fn update(&mut self, settings: &Settings) {
        self.settings = settings.clone();
        self.clock.set_time_scale(settings.time_scale);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resize(
        &mut self,
        logical_width: u32,
        logical_height: u32,
        physical_width: u32,
        physical_height: u32,
    ) {
        let viewport = Viewport::new(
            logical_width,
            logical_height,
            physical_width,
            physical_height,
        );

        if self.bridge.resize(viewport) {
            log::debug!(
                "Resized to {}x{} ({}x{}px)",
                logical_width,
                logical_height,
                physical_width,
                physical_height
            );
            self.renderer.resize(physical_width, physical_height);
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.bridge.viewport()
    }

    /// Pointer position in logical pixels from the top-left corner.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.bridge.pointer_moved(x, y);
    }

    /// Pointer position already normalized to `[0, 1]²`, y up.
    pub fn set_pointer_position(&mut self, u: f32, v: f32) {
        self.bridge.set_pointer_position([u, v]);
    }

    pub fn set_scroll_progress(&mut self, scroll_progress: f32) {
        self.bridge.set_scroll_progress(scroll_progress);
    }

    /// Scroll by mouse-wheel lines. Positive values move down the page.
    /// Ignored unless `Settings::scroll_from_input` is set.
    pub fn scroll_lines(&mut self, lines: f32) {
        if self.settings.scroll_from_input {
            self.bridge
                .scroll_by(lines * self.settings.scroll_sensitivity);
        }
    }

    /// Scroll by logical pixels. Positive values move down the page.
    /// Ignored unless `Settings::scroll_from_input` is set.
    pub fn scroll_pixels(&mut self, pixels: f64) {
        let height = self.bridge.viewport().logical_height;
        if self.settings.scroll_from_input && height > 0 {
            self.bridge.scroll_by((pixels / f64::from(height)) as f32);
        }
    }

    /// The page's scroll position changed.
    /// Ignored unless `Settings::scroll_from_input` is set.
    pub fn page_scrolled(&mut self, scroll_y: f64, scroll_height: f64, viewport_height: f64) {
        if self.settings.scroll_from_input {
            self.bridge.set_scroll_progress(uniforms::page_scroll_progress(
                scroll_y,
                scroll_height,
                viewport_height,
            ));
        }
    }

    pub fn animate(&mut self, timestamp: f64) {
        self.compute(timestamp);
        self.render();
    }

    pub fn compute(&mut self, timestamp: f64) {
        self.clock.tick(timestamp);
    }

    pub fn render(&mut self) {
        let uniforms = self.uniforms();
        self.renderer.draw(&uniforms);
    }

    pub fn uniforms(&self) -> Uniforms {
        self.bridge.uniforms(self.clock.time())
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[derive(Error, Debug)]
pub enum Problem {
    #[error("Cannot read settings: {0}")]
    ReadSettings(String),

    #[error(transparent)]
    Render(#[from] render::Problem),
}
