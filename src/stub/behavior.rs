//! Stub behaviours and the faults they raise.

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::signature::CallSignature;

/// A failure raised by a stubbed call.
///
/// Faults play the role exceptions play in other mocking libraries: a stub
/// bound with [`Stub::Raise`] hands its fault back to the caller of the
/// tracked method, which propagates it with `?` or panics with it.
///
/// # Example
///
/// ```rust
/// use stubkit::Fault;
///
/// let fault = Fault::runtime("Add operation not implemented");
/// assert_eq!(fault.kind(), "RuntimeException");
/// assert_eq!(fault.to_string(), "RuntimeException: Add operation not implemented");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Fault {
    kind: Cow<'static, str>,
    message: String,
}

impl Fault {
    /// Kind used by [`Fault::runtime`].
    pub const RUNTIME: &'static str = "RuntimeException";
    /// Kind used for calls that match no stub under a strict session.
    pub const UNSTUBBED: &'static str = "Unstubbed";

    /// Create a fault of an arbitrary kind.
    #[must_use]
    pub fn new(kind: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a generic runtime fault.
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(Self::RUNTIME, message)
    }

    /// Create the fault returned for a call with no matching stub.
    #[must_use]
    pub fn unstubbed(signature: &CallSignature) -> Self {
        Self::new(Self::UNSTUBBED, format!("no stub matches {signature}"))
    }

    /// The fault kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The fault message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this fault reports a call with no matching stub.
    #[must_use]
    pub fn is_unstubbed(&self) -> bool {
        self.kind == Self::UNSTUBBED
    }
}

/// A function computing a stub's return value from the call it answers.
pub type AnswerFn<R> = Arc<dyn Fn(&CallSignature) -> R + Send + Sync>;

/// What a stubbed call does.
pub enum Stub<R> {
    /// Return a copy of a fixed value on every call.
    Return(R),
    /// Compute the value from the call.
    Answer(AnswerFn<R>),
    /// Raise a fault.
    Raise(Fault),
}

impl<R> Stub<R> {
    /// Create an answer stub from a closure.
    pub fn answer<F>(f: F) -> Self
    where
        F: Fn(&CallSignature) -> R + Send + Sync + 'static,
    {
        Stub::Answer(Arc::new(f))
    }
}

impl<R: fmt::Debug> fmt::Debug for Stub<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stub::Return(value) => f.debug_tuple("Return").field(value).finish(),
            Stub::Answer(_) => f.write_str("Answer(..)"),
            Stub::Raise(fault) => f.debug_tuple("Raise").field(fault).finish(),
        }
    }
}

/// Outcome of resolving a call against the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<R> {
    /// A value produced by a return or answer stub.
    Value(R),
    /// A fault produced by a raise stub.
    Raise(Fault),
    /// No stub is bound to the signature.
    Unstubbed,
}

/// A type-erased stub as stored in the registry.
#[derive(Clone)]
pub(crate) enum Binding {
    Value {
        value: Arc<dyn Any + Send + Sync>,
        type_name: &'static str,
    },
    Answer {
        answer: Arc<dyn Any + Send + Sync>,
        type_name: &'static str,
    },
    Raise(Fault),
}

impl Binding {
    pub(crate) fn from_stub<R>(stub: Stub<R>) -> Self
    where
        R: Clone + Send + Sync + 'static,
    {
        match stub {
            Stub::Return(value) => Binding::Value {
                value: Arc::new(value),
                type_name: type_name::<R>(),
            },
            Stub::Answer(answer) => Binding::Answer {
                answer: Arc::new(answer),
                type_name: type_name::<R>(),
            },
            Stub::Raise(fault) => Binding::Raise(fault),
        }
    }

    /// Produce the outcome of this binding for `signature`.
    ///
    /// # Panics
    ///
    /// Panics if the binding was registered with a return type other
    /// than `R`.
    pub(crate) fn resolve<R>(&self, signature: &CallSignature) -> Resolved<R>
    where
        R: Clone + 'static,
    {
        match self {
            Binding::Value { value, type_name } => match value.downcast_ref::<R>() {
                Some(value) => Resolved::Value(value.clone()),
                None => type_mismatch::<R>(signature, type_name),
            },
            Binding::Answer { answer, type_name } => match answer.downcast_ref::<AnswerFn<R>>() {
                Some(answer) => Resolved::Value(answer(signature)),
                None => type_mismatch::<R>(signature, type_name),
            },
            Binding::Raise(fault) => Resolved::Raise(fault.clone()),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value { type_name, .. } => write!(f, "Value<{type_name}>"),
            Binding::Answer { type_name, .. } => write!(f, "Answer<{type_name}>"),
            Binding::Raise(fault) => f.debug_tuple("Raise").field(fault).finish(),
        }
    }
}

fn type_mismatch<R>(signature: &CallSignature, stored: &str) -> ! {
    panic!(
        "stub for {signature} returns {stored}, but the caller expected {}",
        type_name::<R>()
    )
}
