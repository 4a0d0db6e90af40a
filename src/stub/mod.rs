//! Stubbing: binding call signatures to canned behaviour.
//!
//! - [`StubRegistry`] - signature to behaviour map, last registration wins
//! - [`Stub`] - return a value, compute an answer, or raise a [`Fault`]
//! - [`Resolved`] - the outcome of looking a call up
//!
//! Most tests stub through [`MockSession::when`](crate::MockSession::when)
//! rather than touching the registry directly.
//!
//! ```rust
//! use stubkit::{args, Fault, MockSession};
//!
//! let session = MockSession::new();
//! let calc = session.mock("calcService");
//!
//! session.when(calc.call("add", args![20.0, 10.0])).then_return(30.0);
//! session
//!     .when::<f64>(calc.call("add", args![10.0, 20.0]))
//!     .then_raise(Fault::runtime("Add operation not implemented"));
//!
//! assert_eq!(calc.invoke::<f64>("add", args![20.0, 10.0]), Ok(30.0));
//! assert!(calc.invoke::<f64>("add", args![10.0, 20.0]).is_err());
//! ```

mod behavior;
mod registry;

pub use behavior::{AnswerFn, Fault, Resolved, Stub};
pub use registry::StubRegistry;
