//! # stubkit
//!
//! > Call stubbing and invocation verification for Rust tests
//!
//! **stubkit** lets hand-written test doubles stub return values, answers
//! and faults per call signature, records every call they receive, and
//! verifies call counts and timing afterwards.
//!
//! ## Quick Start
//!
//! ```rust
//! use stubkit::prelude::*;
//!
//! trait CalculatorService {
//!     fn add(&self, a: f64, b: f64) -> f64;
//!     fn subtract(&self, a: f64, b: f64) -> f64;
//! }
//!
//! struct MockCalculator(Mock);
//!
//! impl CalculatorService for MockCalculator {
//!     fn add(&self, a: f64, b: f64) -> f64 {
//!         self.0.invoke_or_raise("add", args![a, b])
//!     }
//!     fn subtract(&self, a: f64, b: f64) -> f64 {
//!         self.0.invoke_or_raise("subtract", args![a, b])
//!     }
//! }
//!
//! let session = MockSession::new();
//! let mock = session.mock("calcService");
//! session.when(mock.call("add", args![20.0, 10.0])).then_return(30.0);
//!
//! let calc = MockCalculator(mock.clone());
//! assert_eq!(calc.add(20.0, 10.0), 30.0);
//!
//! assert!(session.verify(&mock.call("add", args![20.0, 10.0]), times(1)).is_ok());
//! assert!(session.verify(&mock.call("subtract", args![20.0, 10.0]), never()).is_ok());
//! ```
//!
//! ## Features
//!
//! - **Stubs** - return a value, compute an answer, or raise a [`Fault`]
//! - **Recording** - every call is logged with a sequence number and timestamp
//! - **Verification** - exactly, at least, at most, never, with time bounds
//! - **Per-test sessions** - isolated state with scoped reset and `#[stubkit::test]`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod error;
pub mod mock;
pub mod record;
pub mod signature;
pub mod stub;
pub mod verify;

/// Prelude for convenient imports
///
/// ```rust
/// use stubkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::args;
    pub use crate::clock::{Clock, MockClock};
    pub use crate::error::{Error, Result};
    pub use crate::mock::{DefaultAnswer, Mock, MockSession};
    pub use crate::signature::{Arg, CallSignature};
    pub use crate::stub::{Fault, Stub};
    pub use crate::verify::{
        at_least, at_least_once, at_most, never, timeout, times, Cardinality, FailureKind,
        VerificationFailure, VerificationMode,
    };
}

// Re-exports
pub use error::{Error, Result};
pub use mock::{DefaultAnswer, Mock, MockSession};
pub use stub::Fault;

// Re-export the test macro when macros feature is enabled
#[cfg(feature = "macros")]
pub use stubkit_macros::test;
