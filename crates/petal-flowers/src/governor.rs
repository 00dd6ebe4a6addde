//! Frame-rate governor that trims pool capacity under load

/// Watches frame throughput and shrinks pool capacity when it drops.
///
/// Capacity only ever goes down; nothing here raises it back.
#[derive(Clone, Debug)]
pub struct PerformanceGovernor {
    /// Below this FPS the governor steps capacity down
    pub min_fps: u32,
    /// Capacity is never reduced below this
    pub floor: usize,
    /// Capacity removed per low-FPS window
    pub step: usize,
    /// Sampling window in seconds
    pub window: f64,
    frames: u32,
    window_start: Option<f64>,
    fps: u32,
}

impl Default for PerformanceGovernor {
    fn default() -> Self {
        Self {
            min_fps: 30,
            floor: 500,
            step: 200,
            window: 1.0,
            frames: 0,
            window_start: None,
            fps: 60,
        }
    }
}

impl PerformanceGovernor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Governor that never reduces capacity below `floor`
    pub fn with_floor(floor: usize) -> Self {
        Self {
            floor,
            ..Self::default()
        }
    }

    /// FPS measured over the last complete window (60 before the first)
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Count one frame at wall time `now` (seconds).
    ///
    /// When a window completes, recomputes FPS and returns the reduced
    /// capacity if a reduction is due.
    pub fn record_frame(&mut self, now: f64, capacity: usize) -> Option<usize> {
        // The first frame only opens the window
        let Some(start) = self.window_start else {
            self.window_start = Some(now);
            return None;
        };
        self.frames += 1;
        let elapsed = now - start;
        if elapsed < self.window {
            return None;
        }

        self.fps = (self.frames as f64 / elapsed).round() as u32;
        self.frames = 0;
        self.window_start = Some(now);
        self.evaluate(self.fps, capacity)
    }

    /// Reduced capacity for a measured `fps`, or `None` to keep the current one
    pub fn evaluate(&self, fps: u32, capacity: usize) -> Option<usize> {
        if fps >= self.min_fps || capacity <= self.floor {
            return None;
        }
        let reduced = capacity.saturating_sub(self.step).max(self.floor);
        tracing::warn!(
            fps,
            from = capacity,
            to = reduced,
            "low FPS, reducing flower capacity"
        );
        Some(reduced)
    }
}
