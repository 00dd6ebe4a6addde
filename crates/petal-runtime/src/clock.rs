//! Frame clock with clamped delta time

use std::time::Instant;

/// Default upper bound on a single frame's delta, in seconds
pub const DEFAULT_MAX_DELTA: f64 = 0.05;

/// Tracks elapsed time and per-frame delta for the render loop
pub struct FrameClock {
    /// Total elapsed time in seconds (sum of clamped deltas)
    pub total_time: f64,
    /// Time since last frame in seconds, clamped to `max_delta`
    pub delta_time: f64,
    /// Unclamped wall time in seconds, for rate measurements
    pub real_time: f64,
    /// Largest delta a single frame may report
    pub max_delta: f64,
    /// Number of frames advanced so far
    pub frame: u64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            real_time: 0.0,
            max_delta: DEFAULT_MAX_DELTA,
            frame: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    /// Create a new clock with the default 50ms delta clamp
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock with a custom delta clamp
    pub fn with_max_delta(max_delta: f64) -> Self {
        Self {
            max_delta,
            ..Self::default()
        }
    }

    /// Advance the clock from the wall clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.advance(0.0);
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Advance the clock by an explicit elapsed time (headless runs, tests)
    pub fn advance(&mut self, elapsed: f64) {
        self.real_time += elapsed.max(0.0);
        // A stalled frame advances by at most max_delta
        self.delta_time = elapsed.clamp(0.0, self.max_delta);
        self.total_time += self.delta_time;
        self.frame += 1;
    }
}
