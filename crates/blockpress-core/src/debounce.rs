//! Save debouncing
//!
//! Edits call [`Debouncer::touch`]; the owner polls [`Debouncer::is_due`] and
//! saves once the quiet period has passed since the latest edit. Time is
//! passed in by the caller so the schedule is deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending_since: None,
        }
    }

    /// Records an edit at `now`, restarting the quiet period
    pub fn touch(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True once `quiet` has elapsed since the latest edit
    pub fn is_due(&self, now: Instant) -> bool {
        self.pending_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.quiet)
    }

    /// Forgets the pending edit
    pub fn clear(&mut self) {
        self.pending_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_never_due() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.is_due(Instant::now()));
    }

    #[test]
    fn test_due_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.touch(start);

        assert!(!debouncer.is_due(start + Duration::from_millis(499)));
        assert!(debouncer.is_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_touch_restarts_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.touch(start);
        debouncer.touch(start + Duration::from_millis(400));

        assert!(!debouncer.is_due(start + Duration::from_millis(800)));
        assert!(debouncer.is_due(start + Duration::from_millis(900)));

        debouncer.clear();
        assert!(!debouncer.is_due(start + Duration::from_secs(5)));
    }
}
