//! Call signatures and argument values.
//!
//! A [`CallSignature`] names one call on one mock: the receiver, the method
//! and the ordered [`Arg`] values. Stubs are bound to signatures and
//! recorded invocations are matched against them by equality.
//!
//! ```rust
//! use stubkit::{args, MockSession};
//!
//! let session = MockSession::new();
//! let repo = session.mock("employeeRepository");
//! let sig = repo.call("find_by_name", args!["manisha"]);
//!
//! assert_eq!(sig.method(), "find_by_name");
//! assert_eq!(sig.arg::<String>(0).as_deref(), Some("manisha"));
//! ```

mod arg;
mod call;

pub use arg::{Arg, FromArg};
pub use call::{CallSignature, ReceiverId};
