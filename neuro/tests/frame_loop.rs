use approx::assert_relative_eq;
use neuro::{Neuro, Renderer, Settings, Uniforms};

#[derive(Default)]
struct RecordingRenderer {
    draws: Vec<Uniforms>,
    resizes: Vec<(u32, u32)>,
}

impl Renderer for RecordingRenderer {
    fn resize(&mut self, physical_width: u32, physical_height: u32) {
        self.resizes.push((physical_width, physical_height));
    }

    fn draw(&mut self, uniforms: &Uniforms) {
        self.draws.push(*uniforms);
    }
}

fn mount(settings: &Settings) -> Neuro<RecordingRenderer> {
    Neuro::with_renderer(RecordingRenderer::default(), 1280, 800, 2560, 1600, settings)
}

#[test]
fn one_tick_issues_one_draw_with_time_running() {
    let mut neuro = mount(&Settings::default());
    assert!(neuro.renderer().draws.is_empty());

    neuro.animate(16.7);

    let draws = &neuro.renderer().draws;
    assert_eq!(draws.len(), 1);
    assert!(draws[0].time > 0.0);
    assert_eq!(draws[0].pointer_position, [0.5, 0.5]);
    assert_eq!(draws[0].scroll_progress, 0.0);
    assert_relative_eq!(draws[0].ratio, 1.6);
}

#[test]
fn time_is_non_decreasing_across_frames() {
    let mut neuro = mount(&Settings::default());

    for timestamp in [16.0, 33.0, 33.0, 20.0, 50.0, 4_000.0, 4_016.0] {
        neuro.animate(timestamp);
    }

    let draws = &neuro.renderer().draws;
    assert_eq!(draws.len(), 7);
    assert!(draws.windows(2).all(|pair| pair[1].time >= pair[0].time));
}

#[test]
fn events_between_frames_reach_the_next_draw() {
    let mut neuro = mount(&Settings::default());
    neuro.animate(16.0);

    neuro.resize(800, 800, 1600, 1600);
    neuro.pointer_moved(200.0, 200.0);
    neuro.pointer_moved(600.0, 200.0);
    neuro.set_scroll_progress(0.2);
    neuro.animate(32.0);

    let renderer = neuro.renderer();
    assert_eq!(renderer.resizes, vec![(1600, 1600)]);

    let last = renderer.draws.last().unwrap();
    assert_relative_eq!(last.ratio, 1.0);
    assert_relative_eq!(last.pointer_position[0], 0.75);
    assert_relative_eq!(last.pointer_position[1], 0.75);
    assert_relative_eq!(last.scroll_progress, 0.2);
}

#[test]
fn repeated_resize_to_the_same_size_is_ignored() {
    let mut neuro = mount(&Settings::default());
    neuro.resize(1280, 800, 2560, 1600);
    neuro.resize(1024, 768, 1024, 768);
    neuro.resize(1024, 768, 1024, 768);

    assert_eq!(neuro.renderer().resizes, vec![(1024, 768)]);
}

#[test]
fn scroll_input_leaves_the_uniform_alone_by_default() {
    let mut neuro = mount(&Settings::default());
    neuro.scroll_lines(4.0);
    neuro.scroll_pixels(400.0);
    neuro.page_scrolled(600.0, 2_000.0, 800.0);
    neuro.animate(16.0);

    assert_eq!(neuro.renderer().draws[0].scroll_progress, 0.0);
}

#[test]
fn scroll_input_drives_the_uniform_when_enabled() {
    let settings = Settings {
        scroll_from_input: true,
        ..Default::default()
    };
    let mut neuro = mount(&settings);

    neuro.scroll_lines(4.0);
    assert_relative_eq!(neuro.uniforms().scroll_progress, 0.2);

    neuro.scroll_pixels(-10_000.0);
    assert_eq!(neuro.uniforms().scroll_progress, 0.0);

    // Pixels are relative to the viewport height.
    neuro.scroll_pixels(400.0);
    assert_relative_eq!(neuro.uniforms().scroll_progress, 0.5);

    neuro.page_scrolled(600.0, 2_000.0, 800.0);
    assert_relative_eq!(neuro.uniforms().scroll_progress, 0.5);
}

#[test]
fn time_tracks_the_host_clock_after_a_stall() {
    let mut neuro = mount(&Settings::default());
    neuro.animate(16.0);
    neuro.animate(10_016.0);

    assert_relative_eq!(neuro.uniforms().time, 10.016);
}

#[test]
fn time_scale_speeds_up_the_pattern() {
    let settings = Settings {
        time_scale: 10.0,
        ..Default::default()
    };
    let mut neuro = mount(&settings);
    neuro.animate(50.0);
    assert_relative_eq!(neuro.uniforms().time, 0.5);

    neuro.update(&Settings::default());
    neuro.animate(100.0);
    assert_relative_eq!(neuro.uniforms().time, 0.55);
}
