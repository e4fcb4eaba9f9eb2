//! Debounced change notification.
//!
//! Every structural mutation calls [`ChangeNotifier::schedule`], which cancels
//! whatever notification was pending and arms a new one `delay` later. The
//! owner's event loop calls `poll` with the current time; once the deadline
//! has passed the notification is taken exactly once. A burst of mutations
//! therefore yields a single notification carrying the final state.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of "now" for the transport and the debounce timer.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Cancel-and-reschedule timer state.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    delay: Duration,
    deadline: Option<Duration>,
}

impl ChangeNotifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending notification and arm a new one.
    pub fn schedule(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending notification if its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending notification regardless of its deadline.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_fires_once_after_delay() {
        let mut notifier = ChangeNotifier::new(MS);
        notifier.schedule(Duration::ZERO);

        assert!(!notifier.poll(Duration::ZERO));
        assert!(notifier.poll(MS));
        assert!(!notifier.poll(MS * 5));
    }

    #[test]
    fn test_reschedule_cancels_previous() {
        let mut notifier = ChangeNotifier::new(MS * 10);
        notifier.schedule(Duration::ZERO);
        notifier.schedule(MS * 8);

        // first deadline (10ms) has passed but was replaced by 18ms
        assert!(!notifier.poll(MS * 12));
        assert!(notifier.poll(MS * 18));
    }

    #[test]
    fn test_take_ignores_deadline() {
        let mut notifier = ChangeNotifier::new(Duration::from_secs(60));
        assert!(!notifier.take());
        notifier.schedule(Duration::ZERO);
        assert!(notifier.take());
        assert!(!notifier.is_pending());
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(MS * 3);
        assert_eq!(other.now(), MS * 3);
        other.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }
}
