/// Animation time driven by host timestamps. Never runs backwards.
///
/// With a time scale of 1 and a steadily advancing host clock, the time is
/// the host timestamp in seconds: `requestAnimationFrame` time in the
/// browser, time since start on desktop.
#[derive(Clone, Debug)]
pub struct Clock {
    // A timestamp in milliseconds.
    last_timestamp: f64,

    // Wall-clock seconds accumulated so far.
    elapsed_time: f64,

    // Scaled seconds accumulated so far. Accumulating, rather than
    // multiplying on read, keeps it monotonic when the scale changes.
    // Both totals stay in f64: an f32 total stops absorbing 60 fps steps
    // after a few days.
    time: f64,

    time_scale: f64,
}

impl Clock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            last_timestamp: 0.0,
            elapsed_time: 0.0,
            time: 0.0,
            time_scale: sanitize_time_scale(time_scale),
        }
    }

    /// Advance to `timestamp` and return the step taken, in seconds.
    pub fn tick(&mut self, timestamp: f64) -> f64 {
        if !timestamp.is_finite() {
            return 0.0;
        }

        // A host clock that jumps back restarts from the new timestamp.
        let timestep = (0.001 * (timestamp - self.last_timestamp)).max(0.0);
        self.last_timestamp = timestamp;

        self.elapsed_time += timestep;
        self.time += timestep * self.time_scale;

        timestep
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// The value handed to `u_time`.
    pub fn time(&self) -> f32 {
        self.time as f32
    }

    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = sanitize_time_scale(time_scale);
    }
}

fn sanitize_time_scale(time_scale: f32) -> f64 {
    if time_scale.is_finite() {
        f64::from(time_scale.max(0.0))
    } else {
        log::warn!("Ignoring invalid time scale {}", time_scale);
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_tick_advances_from_zero() {
        let mut clock = Clock::new(1.0);
        let timestep = clock.tick(16.0);
        assert_relative_eq!(timestep, 0.016);
        assert!(clock.time() > 0.0);
    }

    #[test]
    fn time_follows_the_host_clock() {
        let mut clock = Clock::new(1.0);
        clock.tick(16.0);
        let timestep = clock.tick(5_016.0);
        assert_relative_eq!(timestep, 5.0);
        assert_relative_eq!(clock.time(), 5.016);
    }

    #[test]
    fn time_never_runs_backwards() {
        let mut clock = Clock::new(1.0);
        let mut previous = clock.time();

        for timestamp in [16.0, 32.0, 8.0, 8.0, 40.0, f64::NAN, 56.0, -1_000.0, 72.0] {
            clock.tick(timestamp);
            assert!(clock.time() >= previous, "time went backwards at {}", timestamp);
            previous = clock.time();
        }
    }

    #[test]
    fn time_keeps_advancing_after_days() {
        const FRAME: f64 = 1000.0 / 60.0;
        const FRAMES_PER_DAY: u64 = 60 * 60 * 60 * 24;

        let mut clock = Clock::new(1.0);
        let mut frame = 0_u64;

        for day in 1..=6 {
            let start = clock.time();
            for _ in 0..FRAMES_PER_DAY {
                frame += 1;
                clock.tick(frame as f64 * FRAME);
            }

            let advanced = clock.time() - start;
            assert!(
                (advanced - 86_400.0).abs() < 1.0,
                "day {}: advanced {} s over 86400 s",
                day,
                advanced
            );
        }

        let before = clock.time();
        for _ in 0..60 {
            frame += 1;
            clock.tick(frame as f64 * FRAME);
        }
        assert!(clock.time() > before, "time stalled at {}", before);
    }

    #[test]
    fn time_scale_applies_to_the_uniform_only() {
        let mut clock = Clock::new(2.0);
        clock.tick(50.0);
        assert_relative_eq!(clock.elapsed_time(), 0.05);
        assert_relative_eq!(clock.time(), 0.1);

        clock.set_time_scale(-3.0);
        clock.tick(100.0);
        assert_relative_eq!(clock.elapsed_time(), 0.1);
        assert_relative_eq!(clock.time(), 0.1);
    }
}
