//! Viewport, pointer and scroll state, and the uniform values derived from it.
//!
//! Event handlers write here as often as they like; the frame loop reads a
//! [`Uniforms`] snapshot once per draw, so the last write before a frame wins.

pub const DEFAULT_POINTER_POSITION: [f32; 2] = [0.5, 0.5];

/// Everything a single draw call feeds into the fragment shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Uniforms {
    /// Animation time in seconds. `u_time`.
    pub time: f32,
    /// Logical width over logical height. `u_ratio`.
    pub ratio: f32,
    /// Pointer in `[0, 1]²`, origin at the bottom-left. `u_pointer_position`.
    pub pointer_position: [f32; 2],
    /// `[0, 1]`. `u_scroll_progress`.
    pub scroll_progress: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub logical_width: u32,
    pub logical_height: u32,
    pub physical_width: u32,
    pub physical_height: u32,
}

impl Viewport {
    pub fn new(
        logical_width: u32,
        logical_height: u32,
        physical_width: u32,
        physical_height: u32,
    ) -> Self {
        Self {
            logical_width,
            logical_height,
            physical_width,
            physical_height,
        }
    }

    /// `None` while either side is zero, as with a minimised window.
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.logical_width == 0 || self.logical_height == 0 {
            None
        } else {
            Some(self.logical_width as f32 / self.logical_height as f32)
        }
    }
}

#[derive(Clone, Debug)]
pub struct UniformBridge {
    viewport: Viewport,
    ratio: f32,
    pointer_position: [f32; 2],
    scroll_progress: f32,
}

impl UniformBridge {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ratio: viewport.aspect_ratio().unwrap_or(1.0),
            pointer_position: DEFAULT_POINTER_POSITION,
            scroll_progress: 0.0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns `false` if the viewport is unchanged.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }

        self.viewport = viewport;
        if let Some(ratio) = viewport.aspect_ratio() {
            self.ratio = ratio;
        }

        true
    }

    /// Pointer position in logical pixels, measured from the top-left corner.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        let Viewport {
            logical_width,
            logical_height,
            ..
        } = self.viewport;

        if logical_width == 0 || logical_height == 0 {
            return;
        }

        let u = x / f64::from(logical_width);
        let v = 1.0 - y / f64::from(logical_height);
        self.set_pointer_position([u as f32, v as f32]);
    }

    pub fn set_pointer_position(&mut self, [u, v]: [f32; 2]) {
        if u.is_finite() && v.is_finite() {
            self.pointer_position = [u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)];
        }
    }

    pub fn set_scroll_progress(&mut self, scroll_progress: f32) {
        if scroll_progress.is_finite() {
            self.scroll_progress = scroll_progress.clamp(0.0, 1.0);
        }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_progress(self.scroll_progress + delta);
    }

    pub fn uniforms(&self, time: f32) -> Uniforms {
        Uniforms {
            time,
            ratio: self.ratio,
            pointer_position: self.pointer_position,
            scroll_progress: self.scroll_progress,
        }
    }
}

/// How far down the page has been scrolled, for documents taller than the
/// window. Pages that cannot scroll report zero.
pub fn page_scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f32 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 || !scrollable.is_finite() {
        return 0.0;
    }

    (scroll_y / scrollable).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bridge_for(width: u32, height: u32) -> UniformBridge {
        UniformBridge::new(Viewport::new(width, height, 2 * width, 2 * height))
    }

    #[test]
    fn ratio_follows_every_resize() {
        let mut bridge = bridge_for(1280, 800);
        assert_relative_eq!(bridge.uniforms(0.0).ratio, 1.6);

        for (width, height) in [(800, 1280), (1920, 1080), (1, 1000), (3440, 1440)] {
            bridge.resize(Viewport::new(width, height, width, height));
            assert_relative_eq!(bridge.uniforms(0.0).ratio, width as f32 / height as f32);
        }
    }

    #[test]
    fn resizing_back_restores_the_ratio() {
        let mut bridge = bridge_for(1280, 800);
        let original = bridge.uniforms(0.0).ratio;

        bridge.resize(Viewport::new(640, 960, 640, 960));
        bridge.resize(Viewport::new(1280, 800, 2560, 1600));

        assert_eq!(bridge.uniforms(0.0).ratio, original);
    }

    #[test]
    fn same_size_is_not_a_resize() {
        let mut bridge = bridge_for(1280, 800);
        assert!(!bridge.resize(Viewport::new(1280, 800, 2560, 1600)));
        assert!(bridge.resize(Viewport::new(1280, 800, 1280, 800)));
    }

    #[test]
    fn collapsed_viewport_keeps_the_last_ratio() {
        let mut bridge = bridge_for(1280, 800);
        bridge.resize(Viewport::new(0, 800, 0, 1600));
        assert_relative_eq!(bridge.uniforms(0.0).ratio, 1.6);

        let mut bridge = bridge_for(0, 0);
        assert_eq!(bridge.uniforms(0.0).ratio, 1.0);
        bridge.pointer_moved(10.0, 10.0);
        assert_eq!(bridge.uniforms(0.0).pointer_position, DEFAULT_POINTER_POSITION);
    }

    #[test]
    fn pointer_starts_in_the_centre() {
        assert_eq!(bridge_for(1280, 800).uniforms(0.0).pointer_position, [0.5, 0.5]);
    }

    #[test]
    fn pointer_is_normalized_with_y_up() {
        let mut bridge = bridge_for(1000, 500);

        bridge.pointer_moved(250.0, 100.0);
        let [u, v] = bridge.uniforms(0.0).pointer_position;
        assert_relative_eq!(u, 0.25);
        assert_relative_eq!(v, 0.8);

        bridge.pointer_moved(-20.0, 900.0);
        assert_eq!(bridge.uniforms(0.0).pointer_position, [0.0, 0.0]);
    }

    #[test]
    fn scroll_progress_is_clamped() {
        let mut bridge = bridge_for(1280, 800);
        bridge.scroll_by(0.3);
        bridge.scroll_by(0.3);
        assert_relative_eq!(bridge.uniforms(0.0).scroll_progress, 0.6);

        bridge.scroll_by(5.0);
        assert_eq!(bridge.uniforms(0.0).scroll_progress, 1.0);

        bridge.set_scroll_progress(-1.0);
        assert_eq!(bridge.uniforms(0.0).scroll_progress, 0.0);

        bridge.set_scroll_progress(f32::NAN);
        assert_eq!(bridge.uniforms(0.0).scroll_progress, 0.0);
    }

    #[test]
    fn page_scroll_progress_handles_short_pages() {
        assert_eq!(page_scroll_progress(0.0, 800.0, 800.0), 0.0);
        assert_eq!(page_scroll_progress(120.0, 600.0, 800.0), 0.0);
        assert_relative_eq!(page_scroll_progress(300.0, 1400.0, 800.0), 0.5);
        assert_eq!(page_scroll_progress(900.0, 1400.0, 800.0), 1.0);
    }
}
