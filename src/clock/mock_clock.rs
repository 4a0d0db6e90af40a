//! `MockClock` implementation for virtual time control.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::Clock;

/// A manually advanced clock for deterministic time-bound verification.
///
/// Record timestamps and time-bound checks read the session clock. Building
/// a session on a `MockClock` lets a test place calls at exact virtual
/// times instead of relying on how fast the test runs.
///
/// # Thread Safety
///
/// All clones share the same underlying time state.
///
/// # Example
///
/// ```rust
/// use stubkit::clock::{Clock, MockClock};
/// use std::time::Duration;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now(), Duration::ZERO);
///
/// clock.advance(Duration::from_millis(150));
/// assert_eq!(clock.now(), Duration::from_millis(150));
///
/// // Clones share the same time
/// let clock2 = clock.clone();
/// clock2.advance(Duration::from_millis(50));
/// assert_eq!(clock.now(), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    state: Arc<Mutex<ClockState>>,
}

#[derive(Debug)]
struct ClockState {
    /// Current time as duration since clock creation
    current_time: Duration,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Creates a new `MockClock` starting at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::with_start_time(Duration::ZERO)
    }

    /// Creates a new `MockClock` starting at the specified time.
    ///
    /// ```rust
    /// use stubkit::clock::{Clock, MockClock};
    /// use std::time::Duration;
    ///
    /// let clock = MockClock::with_start_time(Duration::from_secs(100));
    /// assert_eq!(clock.now(), Duration::from_secs(100));
    /// ```
    #[must_use]
    pub fn with_start_time(start: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(ClockState {
                current_time: start,
            })),
        }
    }

    /// Advances the clock by the specified duration.
    pub fn advance(&self, duration: Duration) {
        self.state.lock().current_time += duration;
    }

    /// Advances the clock to a specific time.
    ///
    /// Only moves time forward: a target at or before the current time is
    /// a no-op, so record timestamps never go backwards.
    pub fn advance_to(&self, time: Duration) {
        let mut state = self.state.lock();
        if time > state.current_time {
            state.current_time = time;
        }
    }

}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        self.state.lock().current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_starts_at_zero() {
        let clock = MockClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_with_start_time() {
        let clock = MockClock::with_start_time(Duration::from_secs(100));
        assert_eq!(clock.now(), Duration::from_secs(100));
    }

    #[test]
    fn test_advance() {
        let clock = MockClock::new();
        clock.advance(Duration::from_millis(10));
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(15));
    }

    #[test]
    fn test_advance_to_never_goes_backwards() {
        let clock = MockClock::new();
        clock.advance_to(Duration::from_secs(10));
        clock.advance_to(Duration::from_secs(5));
        assert_eq!(clock.now(), Duration::from_secs(10));
    }

    #[test]
    fn test_clone_shares_state() {
        let clock1 = MockClock::new();
        let clock2 = clock1.clone();

        clock1.advance(Duration::from_secs(10));
        assert_eq!(clock2.now(), Duration::from_secs(10));
    }
}
