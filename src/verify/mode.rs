// Mode constructors are plain values meant to be passed straight to verify.
#![allow(clippy::must_use_candidate)]

//! Cardinalities and verification modes.

use std::fmt;
use std::time::Duration;

/// The expected number of matching invocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly `n` matching calls.
    Exactly(usize),
    /// `n` or more matching calls.
    AtLeast(usize),
    /// `n` or fewer matching calls.
    AtMost(usize),
    /// No matching calls.
    Never,
}

impl Cardinality {
    /// Whether `count` satisfies this cardinality.
    ///
    /// ```rust
    /// use stubkit::verify::Cardinality;
    ///
    /// assert!(Cardinality::Exactly(1).matches(1));
    /// assert!(!Cardinality::Exactly(1).matches(2));
    /// assert!(Cardinality::AtLeast(1).matches(5));
    /// assert!(Cardinality::AtMost(3).matches(0));
    /// assert!(Cardinality::Never.matches(0));
    /// ```
    #[must_use]
    pub fn matches(self, count: usize) -> bool {
        match self {
            Cardinality::Exactly(n) => count == n,
            Cardinality::AtLeast(n) => count >= n,
            Cardinality::AtMost(n) => count <= n,
            Cardinality::Never => count == 0,
        }
    }
}

fn times_word(n: usize) -> &'static str {
    if n == 1 {
        "time"
    } else {
        "times"
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Cardinality::Exactly(n) => write!(f, "exactly {n} {}", times_word(n)),
            Cardinality::AtLeast(n) => write!(f, "at least {n} {}", times_word(n)),
            Cardinality::AtMost(n) => write!(f, "at most {n} {}", times_word(n)),
            Cardinality::Never => write!(f, "never"),
        }
    }
}

/// A cardinality plus an optional time bound.
///
/// With a time bound, a matching call must also have happened recently
/// enough; see [`VerificationEngine`](super::VerificationEngine) for the
/// exact rule.
///
/// # Example
///
/// ```rust
/// use stubkit::verify::{timeout, times, Cardinality};
/// use std::time::Duration;
///
/// let mode = timeout(Duration::from_millis(100)).times(1);
/// assert_eq!(mode.cardinality(), Cardinality::Exactly(1));
/// assert_eq!(mode.time_bound(), Some(Duration::from_millis(100)));
///
/// assert_eq!(times(2).to_string(), "exactly 2 times");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VerificationMode {
    cardinality: Cardinality,
    time_bound: Option<Duration>,
}

impl VerificationMode {
    /// A mode with the given cardinality and no time bound.
    pub const fn new(cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            time_bound: None,
        }
    }

    /// The expected cardinality.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// The time bound, if any.
    pub fn time_bound(&self) -> Option<Duration> {
        self.time_bound
    }

    /// Add or replace the time bound.
    #[must_use]
    pub const fn within(mut self, bound: Duration) -> Self {
        self.time_bound = Some(bound);
        self
    }

    /// Keep the time bound, expect exactly `n` calls.
    #[must_use]
    pub fn times(self, n: usize) -> Self {
        self.with_cardinality(Cardinality::Exactly(n))
    }

    /// Keep the time bound, expect no calls.
    #[must_use]
    pub fn never(self) -> Self {
        self.with_cardinality(Cardinality::Never)
    }

    /// Keep the time bound, expect at least `n` calls.
    #[must_use]
    pub fn at_least(self, n: usize) -> Self {
        self.with_cardinality(Cardinality::AtLeast(n))
    }

    /// Keep the time bound, expect at least one call.
    #[must_use]
    pub fn at_least_once(self) -> Self {
        self.at_least(1)
    }

    /// Keep the time bound, expect at most `n` calls.
    #[must_use]
    pub fn at_most(self, n: usize) -> Self {
        self.with_cardinality(Cardinality::AtMost(n))
    }

    fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }
}

impl Default for VerificationMode {
    /// One call, no time bound.
    fn default() -> Self {
        times(1)
    }
}

impl From<Cardinality> for VerificationMode {
    fn from(cardinality: Cardinality) -> Self {
        Self::new(cardinality)
    }
}

impl fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cardinality)?;
        if let Some(bound) = self.time_bound {
            write!(f, " within {bound:?}")?;
        }
        Ok(())
    }
}

/// Exactly `n` calls.
pub const fn times(n: usize) -> VerificationMode {
    VerificationMode::new(Cardinality::Exactly(n))
}

/// No calls.
pub const fn never() -> VerificationMode {
    VerificationMode::new(Cardinality::Never)
}

/// At least `n` calls.
pub const fn at_least(n: usize) -> VerificationMode {
    VerificationMode::new(Cardinality::AtLeast(n))
}

/// At least one call.
pub const fn at_least_once() -> VerificationMode {
    at_least(1)
}

/// At most `n` calls.
pub const fn at_most(n: usize) -> VerificationMode {
    VerificationMode::new(Cardinality::AtMost(n))
}

/// Exactly one call, made within `bound` of verification.
///
/// Chain a cardinality to change the expected count:
/// `timeout(bound).times(2)`.
pub const fn timeout(bound: Duration) -> VerificationMode {
    times(1).within(bound)
}
