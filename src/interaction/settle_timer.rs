/// Delay between pointer release and clearing the highlighted selection.
pub const SETTLE_DELAY_SECS: f64 = 1.0;

/// A single pending deadline. `schedule` replaces it and `cancel` drops it,
/// so at most one clear is ever armed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettleTimer {
    fire_at: Option<f64>,
}

impl SettleTimer {
    /// Arm the timer to fire `delay` seconds after `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: f64, delay: f64) {
        self.fire_at = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.fire_at = None;
    }

    pub fn deadline(&self) -> Option<f64> {
        self.fire_at
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.fire_at {
            Some(at) if now >= at => {
                self.fire_at = None;
                true
            }
            _ => false,
        }
    }
}
