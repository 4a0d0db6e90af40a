//! Receiver identities and call signatures.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::arg::{Arg, FromArg};

/// Identity of a mock object.
///
/// Two mocks created with the same name still have distinct identities.
/// Only the numeric id takes part in equality and hashing; the name is
/// kept for diagnostics.
#[derive(Clone, Debug)]
pub struct ReceiverId {
    id: u64,
    name: Arc<str>,
}

impl ReceiverId {
    /// Creates a new unique receiver identity.
    pub(crate) fn new(name: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name),
        }
    }

    /// Returns the raw id value.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.id
    }

    /// Returns the name given to the mock.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ReceiverId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ReceiverId {}

impl Hash for ReceiverId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// Identifies one call: the receiving mock, the method name and the
/// ordered argument values.
///
/// Equality is structural. A signature built for verification matches a
/// recorded call only if the receiver, method and every argument are equal,
/// in the same order.
///
/// # Example
///
/// ```rust
/// use stubkit::{args, MockSession};
///
/// let session = MockSession::new();
/// let calc = session.mock("calcService");
///
/// let a = calc.call("add", args![20.0, 10.0]);
/// let b = calc.call("add", args![20.0, 10.0]);
/// let swapped = calc.call("add", args![10.0, 20.0]);
///
/// assert_eq!(a, b);
/// assert_ne!(a, swapped);
/// assert_eq!(a.to_string(), "calcService.add(20.0, 10.0)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSignature {
    receiver: ReceiverId,
    method: &'static str,
    args: Vec<Arg>,
}

impl CallSignature {
    /// Creates a signature for a call on `receiver`.
    #[must_use]
    pub fn new(receiver: ReceiverId, method: &'static str, args: Vec<Arg>) -> Self {
        Self {
            receiver,
            method,
            args,
        }
    }

    /// The mock receiving the call.
    #[must_use]
    pub fn receiver(&self) -> &ReceiverId {
        &self.receiver
    }

    /// The method name.
    #[must_use]
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// All argument values, in call order.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Reads argument `index` as `T`.
    ///
    /// Returns `None` if the index is out of range or the value does not
    /// convert.
    #[must_use]
    pub fn arg<T: FromArg>(&self, index: usize) -> Option<T> {
        self.args.get(index).and_then(T::from_arg)
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.receiver.name(), self.method)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}
