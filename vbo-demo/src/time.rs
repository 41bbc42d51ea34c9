use std::time::{Duration, Instant};

/// Running clock for the animation.  Every rendered frame adds its delta to
/// `elapsed_seconds`; nothing ever resets it, not even a suspend.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed_seconds: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            elapsed_seconds: 0.0,
        }
    }

    /// Measure the time since the previous tick and fold it in.  Returns that delta.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.advance(dt);
        dt
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed_seconds += dt.as_secs_f64();
    }

    /// Pick up again after a pause.  The time spent paused is not counted.
    pub fn resume(&mut self) {
        self.last = Instant::now();
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
