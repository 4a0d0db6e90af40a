//! Verifying invocation patterns.
//!
//! - [`Cardinality`] - exactly, at least, at most, never
//! - [`VerificationMode`] - a cardinality with an optional time bound,
//!   built with [`times`], [`never`], [`at_least`], [`at_least_once`],
//!   [`at_most`] and [`timeout`]
//! - [`VerificationEngine`] - checks a mode against the invocation log
//! - [`VerificationFailure`] - the structured outcome of a failed check
//!
//! ```rust
//! use stubkit::verify::{at_least_once, never, times};
//! use stubkit::{args, MockSession};
//!
//! let session = MockSession::new();
//! let calc = session.mock("calcService");
//! session.when(calc.call("add", args![20.0, 10.0])).then_return(30.0);
//!
//! let _ = calc.invoke::<f64>("add", args![20.0, 10.0]);
//!
//! assert!(session.verify(&calc.call("add", args![20.0, 10.0]), times(1)).is_ok());
//! assert!(session.verify(&calc.call("multiply", args![10.0, 20.0]), never()).is_ok());
//! assert!(session
//!     .verify(&calc.call("subtract", args![20.0, 10.0]), at_least_once())
//!     .is_err());
//! ```

mod engine;
mod mode;

pub use engine::{FailureKind, VerificationEngine, VerificationFailure};
pub use mode::{
    at_least, at_least_once, at_most, never, timeout, times, Cardinality, VerificationMode,
};
