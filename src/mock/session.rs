//! Per-test-case mock sessions.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use super::mock::Mock;
use super::stubbing::{OngoingStubbing, RaiseStubbing};
use crate::clock::{Clock, SystemClock};
use crate::record::{Checkpoint, InvocationRecord, InvocationRecorder};
use crate::signature::CallSignature;
use crate::stub::{Fault, Resolved, Stub, StubRegistry};
use crate::verify::{VerificationEngine, VerificationFailure, VerificationMode};

/// What an unstubbed call returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefaultAnswer {
    /// Return `R::default()`: zero, empty or `None`.
    #[default]
    ReturnDefault,
    /// Raise a fault of kind [`Fault::UNSTUBBED`].
    Raise,
}

/// The state shared by one test case's mocks: a stub registry, an
/// invocation recorder and a clock.
///
/// Create one session per test case. Mocks created from a session record
/// into it and resolve against its stubs; two sessions never see each
/// other's state. Clones share the same state.
///
/// # Example
///
/// ```rust
/// use stubkit::verify::times;
/// use stubkit::{args, MockSession};
///
/// let session = MockSession::new();
/// let calc = session.mock("calcService");
///
/// session.when(calc.call("add", args![20.0, 10.0])).then_return(30.0);
///
/// assert_eq!(calc.invoke::<f64>("add", args![20.0, 10.0]), Ok(30.0));
/// // Unstubbed calls return the default value
/// assert_eq!(calc.invoke::<f64>("add", args![10.0, 20.0]), Ok(0.0));
///
/// assert!(session.verify(&calc.call("add", args![20.0, 10.0]), times(1)).is_ok());
/// ```
#[derive(Clone)]
pub struct MockSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    registry: Mutex<StubRegistry>,
    recorder: Mutex<InvocationRecorder>,
    clock: Arc<dyn Clock>,
    default_answer: DefaultAnswer,
}

impl MockSession {
    /// Create a session on the system clock that returns default values
    /// for unstubbed calls.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Create a mock recording into this session.
    #[must_use]
    pub fn mock(&self, name: &str) -> Mock {
        Mock::new(self.downgrade(), name)
    }

    /// Start stubbing `signature`.
    #[must_use = "a stub is only registered once a then_* method is called"]
    pub fn when<R>(&self, signature: CallSignature) -> OngoingStubbing<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        OngoingStubbing::new(self.clone(), signature)
    }

    /// Behaviour-driven alias for [`when`](Self::when).
    #[must_use = "a stub is only registered once a will_* method is called"]
    pub fn given<R>(&self, signature: CallSignature) -> OngoingStubbing<R>
    where
        R: Clone + Send + Sync + 'static,
    {
        self.when(signature)
    }

    /// Start a raise stub, naming the fault before the call:
    /// `session.do_raise(fault).when::<f64>(signature)`.
    #[must_use = "a stub is only registered once when is called"]
    pub fn do_raise(&self, fault: Fault) -> RaiseStubbing {
        RaiseStubbing::new(self.clone(), fault)
    }

    /// Bind `stub` to `signature`, replacing any earlier binding.
    pub fn stub<R>(&self, signature: CallSignature, stub: Stub<R>)
    where
        R: Clone + Send + Sync + 'static,
    {
        self.inner.registry.lock().register(signature, stub);
    }

    /// Record a call to `signature` and resolve its behaviour.
    ///
    /// The call is recorded before the stub is consulted, whatever the
    /// outcome. Answer functions run without any session lock held, so
    /// they may call back into mocks of the same session.
    pub(crate) fn invoke<R>(&self, signature: CallSignature) -> Result<R, Fault>
    where
        R: Clone + Default + 'static,
    {
        let now = self.inner.clock.now();
        self.inner.recorder.lock().record(signature.clone(), now);

        let binding = self.inner.registry.lock().binding(&signature);
        let resolved = match binding {
            Some(binding) => binding.resolve(&signature),
            None => Resolved::Unstubbed,
        };

        match resolved {
            Resolved::Value(value) => Ok(value),
            Resolved::Raise(fault) => {
                tracing::debug!(call = %signature, %fault, "stub raised");
                Err(fault)
            }
            Resolved::Unstubbed => match self.inner.default_answer {
                DefaultAnswer::ReturnDefault => Ok(R::default()),
                DefaultAnswer::Raise => Err(Fault::unstubbed(&signature)),
            },
        }
    }

    /// Verify calls to `signature` over the whole test case.
    ///
    /// # Errors
    ///
    /// Returns a [`VerificationFailure`] if the recorded calls do not
    /// satisfy `mode`.
    pub fn verify(
        &self,
        signature: &CallSignature,
        mode: VerificationMode,
    ) -> Result<(), VerificationFailure> {
        let now = self.inner.clock.now();
        let recorder = self.inner.recorder.lock();
        let engine = VerificationEngine::new(&recorder, now);
        engine.verify(signature, mode)
    }

    /// Verify calls to `signature` made since `checkpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`VerificationFailure`] if the calls recorded since the
    /// checkpoint do not satisfy `mode`.
    pub fn verify_since(
        &self,
        checkpoint: Checkpoint,
        signature: &CallSignature,
        mode: VerificationMode,
    ) -> Result<(), VerificationFailure> {
        let now = self.inner.clock.now();
        let recorder = self.inner.recorder.lock();
        let engine = VerificationEngine::new(&recorder, now);
        engine.verify_since(checkpoint, signature, mode)
    }

    /// Mark the current end of the invocation log.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        let now = self.inner.clock.now();
        self.inner.recorder.lock().checkpoint(now)
    }

    /// Number of recorded calls matching `signature`.
    #[must_use]
    pub fn count_matching(&self, signature: &CallSignature) -> usize {
        self.inner.recorder.lock().count_matching(signature)
    }

    /// All recorded calls, in order.
    #[must_use]
    pub fn invocations(&self) -> Vec<InvocationRecord> {
        self.inner.recorder.lock().records().to_vec()
    }

    pub(crate) fn downgrade(&self) -> WeakSession {
        WeakSession(Arc::downgrade(&self.inner))
    }

    pub(crate) fn with_recorder<T>(&self, f: impl FnOnce(&InvocationRecorder) -> T) -> T {
        f(&*self.inner.recorder.lock())
    }

    /// Number of bound stubs.
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.inner.registry.lock().len()
    }

    /// The current reading of the session clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.clock.now()
    }

    /// How unstubbed calls are answered.
    #[must_use]
    pub fn default_answer(&self) -> DefaultAnswer {
        self.inner.default_answer
    }

    /// Discard every stub and every recorded call.
    pub fn reset(&self) {
        let mut registry = self.inner.registry.lock();
        let mut recorder = self.inner.recorder.lock();
        tracing::debug!(
            stubs = registry.len(),
            invocations = recorder.len(),
            "resetting mock session"
        );
        registry.clear();
        recorder.clear();
    }

    /// Borrow the session for one test case; it is reset when the guard
    /// drops, even if the test panics.
    ///
    /// ```rust
    /// use stubkit::{args, MockSession};
    ///
    /// let session = MockSession::new();
    /// let calc = session.mock("calcService");
    /// let add = calc.call("add", args![20.0, 10.0]);
    ///
    /// {
    ///     let scope = session.scoped();
    ///     let _ = calc.invoke::<f64>("add", args![20.0, 10.0]);
    ///     assert_eq!(scope.count_matching(&add), 1);
    /// }
    ///
    /// assert_eq!(session.count_matching(&add), 0);
    /// ```
    #[must_use = "the session is reset as soon as the scope is dropped"]
    pub fn scoped(&self) -> SessionScope<'_> {
        SessionScope { session: self }
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSession")
            .field("stubs", &self.inner.registry.lock().len())
            .field("invocations", &self.inner.recorder.lock().len())
            .field("clock", &self.inner.clock)
            .field("default_answer", &self.inner.default_answer)
            .finish()
    }
}

/// A session reference that does not keep the session alive. Mocks hold
/// one, so an answer that captures a mock is freed with its session.
#[derive(Clone)]
pub(crate) struct WeakSession(Weak<SessionInner>);

impl WeakSession {
    pub(crate) fn upgrade(&self) -> Option<MockSession> {
        self.0.upgrade().map(|inner| MockSession { inner })
    }
}

/// A borrowed session that resets on drop.
#[derive(Debug)]
pub struct SessionScope<'a> {
    session: &'a MockSession,
}

impl Deref for SessionScope<'_> {
    type Target = MockSession;

    fn deref(&self) -> &Self::Target {
        self.session
    }
}

impl Drop for SessionScope<'_> {
    fn drop(&mut self) {
        self.session.reset();
    }
}

/// Builder for [`MockSession`].
///
/// ```rust
/// use stubkit::clock::MockClock;
/// use stubkit::{args, DefaultAnswer, MockSession};
///
/// let session = MockSession::builder()
///     .default_answer(DefaultAnswer::Raise)
///     .clock(MockClock::new())
///     .build();
///
/// let calc = session.mock("calcService");
/// let fault = calc.invoke::<f64>("add", args![1.0, 2.0]).unwrap_err();
/// assert!(fault.is_unstubbed());
/// ```
#[derive(Debug, Default)]
pub struct SessionBuilder {
    default_answer: DefaultAnswer,
    clock: Option<Arc<dyn Clock>>,
}

impl SessionBuilder {
    /// Set how unstubbed calls are answered.
    #[must_use]
    pub fn default_answer(mut self, answer: DefaultAnswer) -> Self {
        self.default_answer = answer;
        self
    }

    /// Use `clock` for invocation timestamps and time-bound checks.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Build the session.
    #[must_use]
    pub fn build(self) -> MockSession {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));
        MockSession {
            inner: Arc::new(SessionInner {
                registry: Mutex::new(StubRegistry::new()),
                recorder: Mutex::new(InvocationRecorder::new()),
                clock,
                default_answer: self.default_answer,
            }),
        }
    }
}
