//! One-shot deadlines checked against the frame clock.
//!
//! Every pending delay in the overlay (respawn, squash removal, celebration, score
//! feedback) is one of these, owned by the encounter. Arming replaces any pending
//! deadline; teardown clears them all, so no stale callback can fire afterwards.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Timer {
    due_ms: Option<f64>,
}

impl Timer {
    pub const fn idle() -> Self {
        Self { due_ms: None }
    }

    /// Clear-and-replace.
    pub fn arm(&mut self, now: f64, delay_ms: f64) {
        self.due_ms = Some(now + delay_ms.max(0.0));
    }

    pub fn clear(&mut self) {
        self.due_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_ms.is_some()
    }

    pub fn due_ms(&self) -> Option<f64> {
        self.due_ms
    }

    /// Returns true exactly once, on the first check at or after the deadline.
    pub fn fire_if_due(&mut self, now: f64) -> bool {
        match self.due_ms {
            Some(due) if now >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}
