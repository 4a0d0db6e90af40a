//! Time sources for invocation timestamps.
//!
//! Every recorded invocation is stamped with a reading from the session's
//! [`Clock`], and time-bound verification compares those stamps with the
//! clock reading at verification time.
//!
//! - [`SystemClock`] reads the monotonic system clock. This is the default.
//! - [`MockClock`] is advanced by hand for deterministic tests.
//!
//! ```rust
//! use stubkit::clock::{Clock, MockClock};
//! use std::time::Duration;
//!
//! let clock = MockClock::new();
//! clock.advance(Duration::from_millis(10));
//! assert_eq!(clock.now(), Duration::from_millis(10));
//! ```

mod mock_clock;

use std::fmt::Debug;
use std::time::{Duration, Instant};

pub use mock_clock::MockClock;

/// A monotonic time source.
///
/// Readings are durations since an arbitrary fixed origin and must never
/// decrease.
pub trait Clock: Debug + Send + Sync {
    /// The current reading.
    fn now(&self) -> Duration;
}

/// The monotonic system clock, measured from when it was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is now.
    #[must_use]
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
