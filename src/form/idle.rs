//! Debounced "user stopped typing" detection.
//!
//! The detector owns at most one pending deadline. Every keystroke replaces
//! it, so only the last keystroke of a burst can ever fire. Time is passed in
//! by the caller, which keeps the state machine deterministic.

use std::time::{Duration, Instant};

/// Delay after the last keystroke before the user is considered idle.
pub const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(2000);

/// Single-timer debounce state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleDetector {
    delay: Duration,
    deadline: Option<Instant>,
    user_stopped: bool,
}

impl Default for IdleDetector {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_DELAY)
    }
}

impl IdleDetector {
    /// Creates a detector that fires `delay` after the last keystroke.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            user_stopped: false,
        }
    }

    /// Records a keystroke at `now`, replacing any pending deadline.
    pub fn on_keystroke(&mut self, now: Instant) {
        self.user_stopped = false;
        self.deadline = Some(now + self.delay);
    }

    /// Fires the pending deadline if it has elapsed by `now`.
    ///
    /// On firing, the deadline is cleared, `stopped()` becomes `true` and
    /// `on_idle` runs before this returns `true`. Otherwise nothing changes.
    pub fn poll(&mut self, now: Instant, on_idle: impl FnOnce()) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.user_stopped = true;
                tracing::debug!("user stopped typing");
                on_idle();
                true
            }
            _ => false,
        }
    }

    /// Drops the pending deadline without firing and resets `stopped()`.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.user_stopped = false;
    }

    /// Time left until the pending deadline fires, or `None` if nothing is pending.
    pub fn time_until_idle(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` once the user has been idle for the full delay.
    pub fn stopped(&self) -> bool {
        self.user_stopped
    }

    /// Returns `true` while a deadline is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The configured debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use quickcheck_macros::quickcheck;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn new_detector_is_not_stopped_or_pending() {
        let detector = IdleDetector::default();
        assert!(!detector.stopped());
        assert!(!detector.is_pending());
        assert_eq!(detector.delay(), ms(2000));
    }

    #[test]
    fn keystroke_schedules_deadline() {
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        detector.on_keystroke(t0);
        assert!(detector.is_pending());
        assert_eq!(detector.time_until_idle(t0), Some(ms(2000)));
        assert_eq!(detector.time_until_idle(t0 + ms(500)), Some(ms(1500)));
    }

    #[test]
    fn does_not_fire_before_delay() {
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        detector.on_keystroke(t0);
        let fired = Cell::new(0);
        assert!(!detector.poll(t0 + ms(1999), || fired.set(fired.get() + 1)));
        assert_eq!(fired.get(), 0);
        assert!(!detector.stopped());
        assert!(detector.is_pending());
    }

    #[test]
    fn fires_at_delay_and_clears_deadline() {
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        detector.on_keystroke(t0);
        let fired = Cell::new(0);
        assert!(detector.poll(t0 + ms(2000), || fired.set(fired.get() + 1)));
        assert_eq!(fired.get(), 1);
        assert!(detector.stopped());
        assert!(!detector.is_pending());
        assert_eq!(detector.time_until_idle(t0 + ms(2000)), None);
    }

    #[test]
    fn fires_only_once() {
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        detector.on_keystroke(t0);
        let fired = Cell::new(0);
        detector.poll(t0 + ms(2000), || fired.set(fired.get() + 1));
        detector.poll(t0 + ms(5000), || fired.set(fired.get() + 1));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn keystroke_after_idle_resets_stopped() {
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        detector.on_keystroke(t0);
        detector.poll(t0 + ms(2000), || {});
        assert!(detector.stopped());
        detector.on_keystroke(t0 + ms(2500));
        assert!(!detector.stopped());
        assert!(detector.is_pending());
    }

    #[test]
    fn second_keystroke_supersedes_first() {
        // Type, wait 1000, type again, wait 2000: exactly one firing, 2000 after the second.
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        let fired = Cell::new(0);

        detector.on_keystroke(t0);
        assert!(!detector.poll(t0 + ms(1000), || fired.set(fired.get() + 1)));
        detector.on_keystroke(t0 + ms(1000));

        assert!(!detector.poll(t0 + ms(2000), || fired.set(fired.get() + 1)));
        assert!(!detector.poll(t0 + ms(2999), || fired.set(fired.get() + 1)));
        assert_eq!(fired.get(), 0);

        assert!(detector.poll(t0 + ms(3000), || fired.set(fired.get() + 1)));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn cancel_drops_pending_deadline() {
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        detector.on_keystroke(t0);
        detector.cancel();
        assert!(!detector.is_pending());
        assert!(!detector.poll(t0 + ms(10_000), || {}));
        assert!(!detector.stopped());
    }

    #[test]
    fn custom_delay_is_honoured() {
        let t0 = Instant::now();
        let mut detector = IdleDetector::new(ms(300));
        detector.on_keystroke(t0);
        assert!(!detector.poll(t0 + ms(299), || {}));
        assert!(detector.poll(t0 + ms(300), || {}));
    }

    #[test]
    fn poll_without_keystroke_is_noop() {
        let mut detector = IdleDetector::default();
        assert!(!detector.poll(Instant::now() + ms(10_000), || {}));
        assert!(!detector.stopped());
    }

    #[quickcheck]
    fn burst_of_keystrokes_fires_once_after_last(gaps: Vec<u16>) -> bool {
        let t0 = Instant::now();
        let mut detector = IdleDetector::default();
        let fired = Cell::new(0_u32);

        // Every gap is shorter than the delay, so no deadline may elapse mid-burst.
        let mut now = t0;
        detector.on_keystroke(now);
        for gap in gaps {
            now += ms(u64::from(gap % 2000));
            detector.poll(now, || fired.set(fired.get() + 1));
            detector.on_keystroke(now);
        }
        let last = now;

        let early = detector.poll(last + ms(1999), || fired.set(fired.get() + 1));
        let on_time = detector.poll(last + ms(2000), || fired.set(fired.get() + 1));
        let late = detector.poll(last + ms(4000), || fired.set(fired.get() + 1));

        !early && on_time && !late && fired.get() == 1
    }
}
