//! Fluent stubbing builders.

use std::marker::PhantomData;

use super::session::MockSession;
use crate::signature::CallSignature;
use crate::stub::{Fault, Stub};

/// A stub waiting for its behaviour.
///
/// Returned by [`MockSession::when`] and [`MockSession::given`]. Nothing is
/// registered until one of the `then_*` (or `will_*`) methods is called.
pub struct OngoingStubbing<R> {
    session: MockSession,
    signature: CallSignature,
    _returns: PhantomData<fn() -> R>,
}

impl<R> OngoingStubbing<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(session: MockSession, signature: CallSignature) -> Self {
        Self {
            session,
            signature,
            _returns: PhantomData,
        }
    }

    /// Return a copy of `value` on every matching call.
    pub fn then_return(self, value: R) {
        self.session.stub(self.signature, Stub::Return(value));
    }

    /// Compute the return value from the matching call.
    ///
    /// The answer may capture mocks. It must not capture the
    /// [`MockSession`] itself, or the session is never freed.
    ///
    /// ```rust
    /// use stubkit::{args, MockSession};
    ///
    /// let session = MockSession::new();
    /// let calc = session.mock("calcService");
    /// session
    ///     .when(calc.call("add", args![20.0, 10.0]))
    ///     .then_answer(|call| {
    ///         call.arg::<f64>(0).unwrap_or(0.0) + call.arg::<f64>(1).unwrap_or(0.0)
    ///     });
    ///
    /// assert_eq!(calc.invoke::<f64>("add", args![20.0, 10.0]), Ok(30.0));
    /// ```
    pub fn then_answer<F>(self, answer: F)
    where
        F: Fn(&CallSignature) -> R + Send + Sync + 'static,
    {
        self.session.stub(self.signature, Stub::answer(answer));
    }

    /// Raise `fault` on every matching call.
    pub fn then_raise(self, fault: Fault) {
        self.session.stub::<R>(self.signature, Stub::Raise(fault));
    }

    /// Alias of [`then_return`](Self::then_return).
    pub fn will_return(self, value: R) {
        self.then_return(value);
    }

    /// Alias of [`then_answer`](Self::then_answer).
    pub fn will_answer<F>(self, answer: F)
    where
        F: Fn(&CallSignature) -> R + Send + Sync + 'static,
    {
        self.then_answer(answer);
    }

    /// Alias of [`then_raise`](Self::then_raise).
    pub fn will_raise(self, fault: Fault) {
        self.then_raise(fault);
    }
}

/// A raise stub waiting for its call. Returned by [`MockSession::do_raise`].
pub struct RaiseStubbing {
    session: MockSession,
    fault: Fault,
}

impl RaiseStubbing {
    pub(crate) fn new(session: MockSession, fault: Fault) -> Self {
        Self { session, fault }
    }

    /// Bind the fault to `signature` for a method returning `R`.
    ///
    /// ```rust
    /// use stubkit::{args, Fault, MockSession};
    ///
    /// let session = MockSession::new();
    /// let calc = session.mock("calcService");
    /// session
    ///     .do_raise(Fault::runtime("Add operation not implemented"))
    ///     .when::<f64>(calc.call("add", args![10.0, 20.0]));
    ///
    /// let fault = calc.invoke::<f64>("add", args![10.0, 20.0]).unwrap_err();
    /// assert_eq!(fault.message(), "Add operation not implemented");
    /// ```
    pub fn when<R>(self, signature: CallSignature)
    where
        R: Clone + Send + Sync + 'static,
    {
        self.session.stub::<R>(signature, Stub::Raise(self.fault));
    }
}

#[cfg(test)]
mod tests {
    use crate::{args, Fault, MockSession};

    #[test]
    fn test_then_return() {
        let session = MockSession::new();
        let calc = session.mock("calc");
        session.when(calc.call("subtract", args![20.0, 10.0])).then_return(10.0);

        assert_eq!(calc.invoke::<f64>("subtract", args![20.0, 10.0]), Ok(10.0));
        assert_eq!(session.stub_count(), 1);
    }

    #[test]
    fn test_given_will_return() {
        let session = MockSession::new();
        let calc = session.mock("calc");
        session.given(calc.call("add", args![20.0, 10.0])).will_return(30.0);

        assert_eq!(calc.invoke::<f64>("add", args![20.0, 10.0]), Ok(30.0));
    }

    #[test]
    fn test_will_raise() {
        let session = MockSession::new();
        let calc = session.mock("calc");
        session
            .given::<f64>(calc.call("divide", args![1.0, 0.0]))
            .will_raise(Fault::new("ArithmeticException", "divide by zero"));

        let fault = calc.invoke::<f64>("divide", args![1.0, 0.0]).unwrap_err();
        assert_eq!(fault.kind(), "ArithmeticException");
    }

    #[test]
    fn test_will_answer_sees_receiver() {
        let session = MockSession::new();
        let calc = session.mock("calcService");
        session
            .given(calc.call("name", args![]))
            .will_answer(|call| call.receiver().name().to_string());

        assert_eq!(
            calc.invoke::<String>("name", args![]),
            Ok("calcService".to_string())
        );
    }

    #[test]
    fn test_restub_overrides() {
        let session = MockSession::new();
        let calc = session.mock("calc");
        session.when(calc.call("add", args![20.0, 10.0])).then_return(1.0);
        session.when(calc.call("add", args![20.0, 10.0])).then_return(30.0);

        assert_eq!(calc.invoke::<f64>("add", args![20.0, 10.0]), Ok(30.0));
        assert_eq!(session.stub_count(), 1);
    }
}
