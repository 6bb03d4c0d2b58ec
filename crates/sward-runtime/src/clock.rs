//! Frame clock

use std::time::Instant;

/// Longest wall-clock frame delta accepted, in seconds. Longer gaps (a hidden
/// tab, a debugger pause) are clamped so time-driven effects do not jump.
const MAX_DELTA: f64 = 0.25;

/// Tracks elapsed time across frames
pub struct GameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by wall time. Call once per frame.
    /// The first tick starts the clock and reports zero delta.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed.min(MAX_DELTA));
    }

    /// Advance the clock by an explicit delta (headless runs, tests).
    /// The delta is taken as given; only negative values are floored to zero.
    pub fn advance(&mut self, dt: f64) {
        self.first_tick = false;
        self.delta_time = dt.max(0.0);
        self.total_time += self.delta_time;
    }

    /// Total elapsed seconds, as the f32 shaders consume
    pub fn elapsed(&self) -> f32 {
        self.total_time as f32
    }
}
