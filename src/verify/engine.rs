//! Checking recorded invocations against verification modes.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use super::mode::VerificationMode;
use crate::record::{Checkpoint, InvocationRecorder};
use crate::signature::CallSignature;

/// Why a verification failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The number of matching calls did not satisfy the cardinality.
    CardinalityMismatch,
    /// Enough calls matched, but not within the time bound.
    Timeout,
}

/// A failed verification.
///
/// Returned as a value so the caller decides whether to fail the test; the
/// engine itself never panics on a mismatch.
#[derive(Clone, Debug, PartialEq, Error)]
pub struct VerificationFailure {
    /// What went wrong.
    pub kind: FailureKind,
    /// The expectation that was checked.
    pub expected: VerificationMode,
    /// The number of matching calls found.
    pub actual: usize,
    /// The call that was verified.
    pub signature: CallSignature,
    /// For timeouts, how long before the bound's reference point the
    /// relevant call happened.
    pub elapsed: Option<Duration>,
}

impl VerificationFailure {
    fn new(
        kind: FailureKind,
        signature: &CallSignature,
        expected: VerificationMode,
        actual: usize,
        elapsed: Option<Duration>,
    ) -> Self {
        let failure = Self {
            kind,
            expected,
            actual,
            signature: signature.clone(),
            elapsed,
        };
        tracing::debug!(%failure, "verification failed");
        failure
    }
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::CardinalityMismatch => write!(
                f,
                "wanted {} {} but was called {} {}",
                self.signature,
                self.expected.cardinality(),
                self.actual,
                if self.actual == 1 { "time" } else { "times" },
            ),
            FailureKind::Timeout => {
                write!(f, "wanted {} {}", self.signature, self.expected)?;
                if let Some(elapsed) = self.elapsed {
                    write!(f, " but the matching call was {elapsed:?} away")?;
                }
                Ok(())
            }
        }
    }
}

/// Read-only verification over an invocation log.
///
/// The engine borrows the recorder and a clock reading taken at
/// verification time. It never changes the log, so repeating a
/// verification gives the same answer until another call is recorded.
///
/// Rules, for a signature `S` and a mode:
///
/// 1. Count the records matching `S`. If the count does not satisfy the
///    cardinality, fail with [`FailureKind::CardinalityMismatch`].
/// 2. If the mode has a time bound and at least one record matched, the
///    most recent matching record must be no older than the bound at
///    verification time. Otherwise fail with [`FailureKind::Timeout`].
///
/// [`verify_since`](Self::verify_since) counts only records made after a
/// [`Checkpoint`] and measures the bound from the checkpoint to the first
/// such record.
///
/// # Example
///
/// ```rust
/// use stubkit::record::InvocationRecorder;
/// use stubkit::verify::{never, times, FailureKind, VerificationEngine};
/// use stubkit::{args, MockSession};
/// use std::time::Duration;
///
/// let session = MockSession::new();
/// let calc = session.mock("calcService");
///
/// let mut recorder = InvocationRecorder::new();
/// recorder.record(calc.call("add", args![20.0, 10.0]), Duration::ZERO);
///
/// let engine = VerificationEngine::new(&recorder, Duration::ZERO);
/// assert!(engine.verify(&calc.call("add", args![20.0, 10.0]), times(1)).is_ok());
/// assert!(engine.verify(&calc.call("multiply", args![10.0, 20.0]), never()).is_ok());
///
/// let failure = engine
///     .verify(&calc.call("add", args![20.0, 10.0]), times(2))
///     .unwrap_err();
/// assert_eq!(failure.kind, FailureKind::CardinalityMismatch);
/// assert_eq!(failure.actual, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct VerificationEngine<'a> {
    recorder: &'a InvocationRecorder,
    now: Duration,
}

impl<'a> VerificationEngine<'a> {
    /// Create an engine over `recorder`, with `now` as the verification
    /// time.
    #[must_use]
    pub fn new(recorder: &'a InvocationRecorder, now: Duration) -> Self {
        Self { recorder, now }
    }

    /// Verify calls to `signature` over the whole log.
    ///
    /// # Errors
    ///
    /// Returns a [`VerificationFailure`] if the count or timing does not
    /// satisfy `mode`.
    pub fn verify(
        &self,
        signature: &CallSignature,
        mode: VerificationMode,
    ) -> Result<(), VerificationFailure> {
        let actual = self.recorder.count_matching(signature);
        check_count(signature, mode, actual)?;

        if let Some(bound) = mode.time_bound() {
            if let Some(last) = self.recorder.last_match(signature) {
                let elapsed = self.now.saturating_sub(last.timestamp);
                if elapsed > bound {
                    return Err(VerificationFailure::new(
                        FailureKind::Timeout,
                        signature,
                        mode,
                        actual,
                        Some(elapsed),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Verify calls to `signature` made at or after `checkpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`VerificationFailure`] if the count of calls since the
    /// checkpoint does not satisfy `mode`, or the first of them came later
    /// than the time bound after the checkpoint.
    pub fn verify_since(
        &self,
        checkpoint: Checkpoint,
        signature: &CallSignature,
        mode: VerificationMode,
    ) -> Result<(), VerificationFailure> {
        let actual = self
            .recorder
            .count_matching_since(signature, checkpoint.seq);
        check_count(signature, mode, actual)?;

        if let Some(bound) = mode.time_bound() {
            if let Some(first) = self.recorder.first_match_after(signature, checkpoint.seq) {
                let elapsed = first.timestamp.saturating_sub(checkpoint.at);
                if elapsed > bound {
                    return Err(VerificationFailure::new(
                        FailureKind::Timeout,
                        signature,
                        mode,
                        actual,
                        Some(elapsed),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn check_count(
    signature: &CallSignature,
    mode: VerificationMode,
    actual: usize,
) -> Result<(), VerificationFailure> {
    if mode.cardinality().matches(actual) {
        Ok(())
    } else {
        Err(VerificationFailure::new(
            FailureKind::CardinalityMismatch,
            signature,
            mode,
            actual,
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::signature::ReceiverId;
    use crate::verify::{at_least, at_least_once, at_most, never, timeout, times};

    struct Fixture {
        add: CallSignature,
        subtract: CallSignature,
        multiply: CallSignature,
        recorder: InvocationRecorder,
    }

    fn fixture() -> Fixture {
        let calc = ReceiverId::new("calc");
        Fixture {
            add: CallSignature::new(calc.clone(), "add", args![20.0, 10.0]),
            subtract: CallSignature::new(calc.clone(), "subtract", args![20.0, 10.0]),
            multiply: CallSignature::new(calc, "multiply", args![10.0, 20.0]),
            recorder: InvocationRecorder::new(),
        }
    }

    #[test]
    fn test_exactly_once() {
        let mut fx = fixture();
        let engine = VerificationEngine::new(&fx.recorder, Duration::ZERO);
        let failure = engine.verify(&fx.add, times(1)).unwrap_err();
        assert_eq!(failure.actual, 0);

        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        let engine = VerificationEngine::new(&fx.recorder, Duration::ZERO);
        assert!(engine.verify(&fx.add, times(1)).is_ok());

        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        let engine = VerificationEngine::new(&fx.recorder, Duration::ZERO);
        let failure = engine.verify(&fx.add, times(1)).unwrap_err();
        assert_eq!(failure.kind, FailureKind::CardinalityMismatch);
        assert_eq!(failure.actual, 2);
    }

    #[test]
    fn test_never() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        let engine = VerificationEngine::new(&fx.recorder, Duration::ZERO);

        assert!(engine.verify(&fx.multiply, never()).is_ok());
        assert!(engine.verify(&fx.add, never()).is_err());
    }

    #[test]
    fn test_at_least_and_at_most() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        let engine = VerificationEngine::new(&fx.recorder, Duration::ZERO);

        assert!(engine.verify(&fx.add, at_least_once()).is_ok());
        assert!(engine.verify(&fx.add, at_least(2)).is_ok());
        assert!(engine.verify(&fx.add, at_least(3)).is_err());
        assert!(engine.verify(&fx.add, at_most(3)).is_ok());
        assert!(engine.verify(&fx.add, at_most(1)).is_err());

        let failure = engine.verify(&fx.subtract, at_least_once()).unwrap_err();
        assert_eq!(failure.actual, 0);
        assert_eq!(failure.signature, fx.subtract);
    }

    #[test]
    fn test_verification_is_repeatable() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        let engine = VerificationEngine::new(&fx.recorder, Duration::ZERO);

        let first = engine.verify(&fx.add, times(3));
        let second = engine.verify(&fx.add, times(3));
        assert_eq!(first, second);
        assert_eq!(fx.recorder.len(), 1);
    }

    #[test]
    fn test_timeout_passes_for_recent_call() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::from_millis(40));
        let engine = VerificationEngine::new(&fx.recorder, Duration::from_millis(140));

        assert!(engine.verify(&fx.add, timeout(Duration::from_millis(100))).is_ok());
    }

    #[test]
    fn test_timeout_fails_for_stale_call() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::from_millis(10));
        let engine = VerificationEngine::new(&fx.recorder, Duration::from_millis(250));

        let failure = engine
            .verify(&fx.add, timeout(Duration::from_millis(100)))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.elapsed, Some(Duration::from_millis(240)));
        assert_eq!(failure.actual, 1);
    }

    #[test]
    fn test_cardinality_mismatch_takes_precedence_over_timeout() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        fx.recorder.record(fx.add.clone(), Duration::ZERO);
        let engine = VerificationEngine::new(&fx.recorder, Duration::from_secs(10));

        let failure = engine
            .verify(&fx.add, timeout(Duration::from_millis(100)).times(1))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::CardinalityMismatch);
    }

    #[test]
    fn test_within_applies_to_at_least() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::from_millis(10));
        fx.recorder.record(fx.add.clone(), Duration::from_millis(90));
        let engine = VerificationEngine::new(&fx.recorder, Duration::from_millis(120));

        assert!(engine
            .verify(&fx.add, at_least(2).within(Duration::from_millis(50)))
            .is_ok());
        let failure = engine
            .verify(&fx.add, at_least(2).within(Duration::from_millis(20)))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.elapsed, Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_timeout_with_never_and_no_calls_passes() {
        let fx = fixture();
        let engine = VerificationEngine::new(&fx.recorder, Duration::from_secs(10));
        assert!(engine
            .verify(&fx.add, timeout(Duration::from_millis(100)).never())
            .is_ok());
    }

    #[test]
    fn test_verify_since_checkpoint() {
        let mut fx = fixture();
        fx.recorder.record(fx.add.clone(), Duration::from_millis(0));
        let cp = fx.recorder.checkpoint(Duration::from_millis(100));
        fx.recorder.record(fx.add.clone(), Duration::from_millis(150));

        let engine = VerificationEngine::new(&fx.recorder, Duration::from_millis(1000));
        assert!(engine.verify_since(cp, &fx.add, times(1)).is_ok());
        assert!(engine
            .verify_since(cp, &fx.add, timeout(Duration::from_millis(60)))
            .is_ok());

        let failure = engine
            .verify_since(cp, &fx.add, timeout(Duration::from_millis(20)))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.elapsed, Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_failure_display() {
        let fx = fixture();
        let engine = VerificationEngine::new(&fx.recorder, Duration::ZERO);
        let failure = engine.verify(&fx.subtract, at_least_once()).unwrap_err();
        assert_eq!(
            failure.to_string(),
            "wanted calc.subtract(20.0, 10.0) at least 1 time but was called 0 times"
        );
    }
}
