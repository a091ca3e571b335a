pub fn physical_from_logical_size(
    logical_width: u32,
    logical_height: u32,
    pixel_ratio: f64,
) -> (u32, u32) {
    (
        (pixel_ratio * f64::from(logical_width)) as u32,
        (pixel_ratio * f64::from(logical_height)) as u32,
    )
}

/// The device pixel ratio to render at. Very dense displays are capped; bogus
/// values fall back to 1.
pub fn effective_pixel_ratio(device_pixel_ratio: f64, max_pixel_ratio: f64) -> f64 {
    let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };

    if max_pixel_ratio.is_finite() && max_pixel_ratio > 0.0 {
        ratio.min(max_pixel_ratio)
    } else {
        ratio
    }
}
