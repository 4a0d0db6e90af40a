//! Invocation recording.
//!
//! Every call routed through a [`Mock`](crate::Mock) is appended to the
//! session's [`InvocationRecorder`] on entry, before its stub is resolved,
//! so calls that raise are counted too.

mod recorder;

pub use recorder::{Checkpoint, InvocationRecord, InvocationRecorder};
