//! Mock sessions and mock handles.
//!
//! - [`MockSession`] - one test case's stubs, invocation log and clock
//! - [`Mock`] - a handle used inside a hand-written test double
//! - [`OngoingStubbing`] / [`RaiseStubbing`] - fluent stub registration
//! - [`SessionScope`] - a guard that resets the session on drop
//!
//! # Test doubles
//!
//! Write the trait your code depends on, then a double that holds a
//! [`Mock`] and forwards each method to it:
//!
//! ```rust
//! use stubkit::{args, Fault, Mock, MockSession};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Employee {
//!     name: String,
//! }
//!
//! trait EmployeeRepository {
//!     fn find_by_name(&self, name: &str) -> Result<Option<Employee>, Fault>;
//! }
//!
//! struct MockEmployeeRepository(Mock);
//!
//! impl EmployeeRepository for MockEmployeeRepository {
//!     fn find_by_name(&self, name: &str) -> Result<Option<Employee>, Fault> {
//!         self.0.invoke("find_by_name", args![name])
//!     }
//! }
//!
//! let session = MockSession::new();
//! let mock = session.mock("employeeRepository");
//! let alex = Employee { name: "alex".into() };
//! mock.when("find_by_name", args!["alex"]).then_return(Some(alex.clone()));
//!
//! let repo = MockEmployeeRepository(mock);
//! assert_eq!(repo.find_by_name("alex"), Ok(Some(alex)));
//! assert_eq!(repo.find_by_name("nobody"), Ok(None));
//! ```

#[allow(clippy::module_inception)]
mod mock;
mod session;
mod stubbing;

pub use mock::Mock;
pub use session::{DefaultAnswer, MockSession, SessionBuilder, SessionScope};
pub use stubbing::{OngoingStubbing, RaiseStubbing};
