/// Collapses a burst of resize events into a single re-seed.
///
/// Every event restarts the quiet period; [`ResizeDebouncer::poll`] fires once
/// the period has elapsed with no further events.
#[derive(Clone, Copy, Debug)]
pub struct ResizeDebouncer {
    quiet_period: f32,
    pending_since: Option<f32>,
}

impl ResizeDebouncer {
    pub fn new(quiet_period: f32) -> Self {
        Self {
            quiet_period,
            pending_since: None,
        }
    }

    /// Record a resize at time `now` (seconds)
    pub fn note(&mut self, now: f32) {
        self.pending_since = Some(now);
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True exactly once per quiet gesture
    pub fn poll(&mut self, now: f32) -> bool {
        match self.pending_since {
            Some(since) if now - since >= self.quiet_period => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_quiet_period() {
        let mut debouncer = ResizeDebouncer::new(0.25);
        debouncer.note(1.0);
        assert!(!debouncer.poll(1.1));
        assert!(debouncer.poll(1.25));
        assert!(!debouncer.poll(2.0));
    }

    #[test]
    fn test_gesture_restarts_period() {
        let mut debouncer = ResizeDebouncer::new(0.25);
        let mut fired = 0;
        let mut now = 0.0;
        for _ in 0..10 {
            debouncer.note(now);
            now += 0.1;
            if debouncer.poll(now) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        assert!(debouncer.poll(now + 0.3));
    }

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = ResizeDebouncer::new(0.25);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(100.0));
    }
}
