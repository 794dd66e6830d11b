//! Suppression window for self-write feedback.
//!
//! After the session writes to its element programmatically, the host may
//! emit input notifications for a short while. The window marks that
//! interval explicitly so the input listener can disregard them. It is a
//! plain value object over caller-supplied instants, so it tests
//! deterministically without sleeping.

use std::time::{Duration, Instant};

/// A time interval during which input notifications on the bound element
/// are disregarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct SuppressionWindow {
    armed_until: Option<Instant>,
}

impl SuppressionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the window to cover `duration` starting at `now`. Re-arming
    /// replaces any previous deadline.
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.armed_until = Some(now + duration);
    }

    /// Returns whether `now` falls inside the armed window.
    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.armed_until.is_some_and(|until| now < until)
    }

    /// Disarm the window.
    pub fn clear(&mut self) {
        self.armed_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_window_suppresses_nothing() {
        let window = SuppressionWindow::new();
        assert!(!window.is_suppressed(Instant::now()));
    }

    #[test]
    fn test_armed_window_covers_interval() {
        let now = Instant::now();
        let mut window = SuppressionWindow::new();
        window.arm(now, Duration::from_millis(150));

        assert!(window.is_suppressed(now));
        assert!(window.is_suppressed(now + Duration::from_millis(149)));
        assert!(!window.is_suppressed(now + Duration::from_millis(150)));
        assert!(!window.is_suppressed(now + Duration::from_millis(500)));
    }

    #[test]
    fn test_rearming_extends_window() {
        let now = Instant::now();
        let mut window = SuppressionWindow::new();
        window.arm(now, Duration::from_millis(150));
        window.arm(now + Duration::from_millis(100), Duration::from_millis(150));

        assert!(window.is_suppressed(now + Duration::from_millis(200)));
        assert!(!window.is_suppressed(now + Duration::from_millis(250)));
    }

    #[test]
    fn test_clear_disarms() {
        let now = Instant::now();
        let mut window = SuppressionWindow::new();
        window.arm(now, Duration::from_millis(150));
        window.clear();
        assert!(!window.is_suppressed(now));
    }
}
