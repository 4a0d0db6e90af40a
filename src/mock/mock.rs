//! The recording handle used inside hand-written test doubles.

use std::fmt;

use super::session::{MockSession, WeakSession};
use super::stubbing::OngoingStubbing;
use crate::record::InvocationRecord;
use crate::signature::{Arg, CallSignature, ReceiverId};
use crate::stub::Fault;
use crate::verify::{VerificationFailure, VerificationMode};

/// One mock object, bound to a [`MockSession`].
///
/// A test double for a trait holds a `Mock` and routes each method through
/// [`invoke`](Self::invoke), which records the call and returns the stubbed
/// outcome. Clones refer to the same mock.
///
/// A mock does not keep its session alive. Using it after every
/// [`MockSession`] handle has been dropped panics.
///
/// # Example
///
/// ```rust
/// use stubkit::{args, Mock, MockSession};
/// use stubkit::verify::times;
///
/// trait CalculatorService {
///     fn add(&self, a: f64, b: f64) -> f64;
/// }
///
/// struct MockCalculator(Mock);
///
/// impl CalculatorService for MockCalculator {
///     fn add(&self, a: f64, b: f64) -> f64 {
///         self.0.invoke_or_raise("add", args![a, b])
///     }
/// }
///
/// let session = MockSession::new();
/// let mock = session.mock("calcService");
/// session.when(mock.call("add", args![20.0, 10.0])).then_return(30.0);
///
/// let calc = MockCalculator(mock.clone());
/// assert_eq!(calc.add(20.0, 10.0), 30.0);
/// assert!(mock.verify("add", args![20.0, 10.0], times(1)).is_ok());
/// ```
#[derive(Clone)]
pub struct Mock {
    session: WeakSession,
    id: ReceiverId,
}

impl Mock {
    pub(crate) fn new(session: WeakSession, name: &str) -> Self {
        Self {
            session,
            id: ReceiverId::new(name),
        }
    }

    /// This mock's identity.
    #[must_use]
    pub fn id(&self) -> &ReceiverId {
        &self.id
    }

    /// The name given to the mock.
    #[must_use]
    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// The session this mock records into.
    ///
    /// # Panics
    ///
    /// Panics if the session has already been dropped.
    #[must_use]
    pub fn session(&self) -> MockSession {
        match self.session.upgrade() {
            Some(session) => session,
            None => panic!("mock {} outlived its session", self.id),
        }
    }

    /// Build the signature of a call to `method` on this mock.
    #[must_use]
    pub fn call(&self, method: &'static str, args: Vec<Arg>) -> CallSignature {
        CallSignature::new(self.id.clone(), method, args)
    }

    /// Record a call to `method` and return its stubbed outcome.
    ///
    /// Unstubbed calls follow the session's
    /// [`DefaultAnswer`](crate::DefaultAnswer).
    ///
    /// # Errors
    ///
    /// Returns the fault of a raise stub, or an unstubbed fault under a
    /// strict session.
    ///
    /// # Panics
    ///
    /// Panics if the matching stub was registered with a return type other
    /// than `R`.
    pub fn invoke<R>(&self, method: &'static str, args: Vec<Arg>) -> Result<R, Fault>
    where
        R: Clone + Default + 'static,
    {
        self.session().invoke(self.call(method, args))
    }

    /// Like [`invoke`](Self::invoke), for methods that cannot return an
    /// error: a raised fault becomes a panic carrying the fault's text.
    ///
    /// # Panics
    ///
    /// Panics if the stub raises, or on a return type mismatch.
    pub fn invoke_or_raise<R>(&self, method: &'static str, args: Vec<Arg>) -> R
    where
        R: Clone + Default + 'static,
    {
        match self.invoke(method, args) {
            Ok(value) => value,
            Err(fault) => panic!("{fault}"),
        }
    }

    /// Start stubbing `method` with `args` on this mock.
    #[must_use = "a stub is only registered once a then_* method is called"]
    pub fn when<R>(&self, method: &'static str, args: Vec<Arg>) -> OngoingStubbing<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        self.session().when(self.call(method, args))
    }

    /// Verify calls to `method` with `args` on this mock.
    ///
    /// # Errors
    ///
    /// Returns a [`VerificationFailure`] if the recorded calls do not
    /// satisfy `mode`.
    pub fn verify(
        &self,
        method: &'static str,
        args: Vec<Arg>,
        mode: VerificationMode,
    ) -> Result<(), VerificationFailure> {
        self.session().verify(&self.call(method, args), mode)
    }

    /// Calls made on this mock, in order.
    #[must_use]
    pub fn invocations(&self) -> Vec<InvocationRecord> {
        self.session()
            .with_recorder(|recorder| recorder.records_for(&self.id).cloned().collect())
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let invocations = self.session.upgrade().map(|session| {
            session.with_recorder(|recorder| recorder.records_for(&self.id).count())
        });
        f.debug_struct("Mock")
            .field("id", &self.id)
            .field("invocations", &invocations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::verify::{never, times};

    #[test]
    fn test_mocks_have_distinct_identities() {
        let session = MockSession::new();
        let a = session.mock("calc");
        let b = session.mock("calc");
        session.when(a.call("add", args![1.0, 1.0])).then_return(2.0);

        assert_eq!(a.invoke::<f64>("add", args![1.0, 1.0]), Ok(2.0));
        assert_eq!(b.invoke::<f64>("add", args![1.0, 1.0]), Ok(0.0));
        assert!(a.verify("add", args![1.0, 1.0], times(1)).is_ok());
        assert!(b.verify("add", args![1.0, 1.0], times(1)).is_ok());
    }

    #[test]
    fn test_when_shortcut() {
        let session = MockSession::new();
        let repo = session.mock("repo");
        repo.when("count", args![]).then_return(3_u64);

        assert_eq!(repo.invoke::<u64>("count", args![]), Ok(3));
    }

    #[test]
    fn test_invocations_are_per_mock() {
        let session = MockSession::new();
        let calc = session.mock("calc");
        let repo = session.mock("repo");
        let _ = calc.invoke::<f64>("add", args![1.0, 2.0]);
        let _ = repo.invoke::<Option<String>>("find_by_name", args!["a"]);
        let _ = calc.invoke::<f64>("subtract", args![1.0, 2.0]);

        let methods: Vec<_> = calc
            .invocations()
            .iter()
            .map(|r| r.signature.method())
            .collect();
        assert_eq!(methods, vec!["add", "subtract"]);
        assert_eq!(repo.invocations().len(), 1);
        assert!(repo.verify("find_by_name", args!["b"], never()).is_ok());
    }

    #[test]
    #[should_panic(expected = "outlived its session")]
    fn test_mock_used_after_session_dropped_panics() {
        let calc = MockSession::new().mock("calc");
        let _ = calc.invoke::<f64>("add", args![1.0, 1.0]);
    }

    #[test]
    fn test_debug_after_session_dropped() {
        let calc = MockSession::new().mock("calc");
        assert!(format!("{calc:?}").contains("None"));
    }

    #[test]
    #[should_panic(expected = "RuntimeException: Add operation not implemented")]
    fn test_invoke_or_raise_panics_with_fault() {
        let session = MockSession::new();
        let calc = session.mock("calc");
        session
            .when::<f64>(calc.call("add", args![10.0, 20.0]))
            .then_raise(Fault::runtime("Add operation not implemented"));

        let _: f64 = calc.invoke_or_raise("add", args![10.0, 20.0]);
    }
}
