//! The stub registry.

use std::collections::HashMap;

use super::behavior::{Binding, Resolved, Stub};
use crate::signature::CallSignature;

/// Maps call signatures to stub behaviours.
///
/// At most one behaviour is bound per distinct signature; registering again
/// replaces the previous binding. Lookup is by exact signature equality, so
/// a call whose arguments differ in any way (including order) misses.
///
/// # Example
///
/// ```rust
/// use stubkit::stub::{Resolved, Stub, StubRegistry};
/// use stubkit::{args, MockSession};
///
/// let session = MockSession::new();
/// let calc = session.mock("calcService");
///
/// let mut registry = StubRegistry::new();
/// registry.register(calc.call("add", args![20.0, 10.0]), Stub::Return(30.0));
///
/// assert_eq!(
///     registry.resolve::<f64>(&calc.call("add", args![20.0, 10.0])),
///     Resolved::Value(30.0)
/// );
/// assert_eq!(
///     registry.resolve::<f64>(&calc.call("add", args![10.0, 20.0])),
///     Resolved::Unstubbed
/// );
/// ```
#[derive(Debug, Default)]
pub struct StubRegistry {
    bindings: HashMap<CallSignature, Binding>,
}

impl StubRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `stub` to `signature`, replacing any earlier binding.
    pub fn register<R>(&mut self, signature: CallSignature, stub: Stub<R>)
    where
        R: Clone + Send + Sync + 'static,
    {
        let binding = Binding::from_stub(stub);
        tracing::debug!(call = %signature, stub = ?binding, "registering stub");
        if let Some(previous) = self.bindings.insert(signature, binding) {
            tracing::debug!(previous = ?previous, "replaced earlier stub");
        }
    }

    /// Resolve `signature` to the outcome of its stub.
    ///
    /// Returns [`Resolved::Unstubbed`] if nothing is bound. Resolution never
    /// changes the registry.
    ///
    /// # Panics
    ///
    /// Panics if the stub was registered with a return type other than `R`.
    #[must_use]
    pub fn resolve<R>(&self, signature: &CallSignature) -> Resolved<R>
    where
        R: Clone + 'static,
    {
        match self.bindings.get(signature) {
            Some(binding) => binding.resolve(signature),
            None => Resolved::Unstubbed,
        }
    }

    /// Clone out the binding for `signature`, so it can be evaluated
    /// without holding a lock on the registry.
    pub(crate) fn binding(&self, signature: &CallSignature) -> Option<Binding> {
        self.bindings.get(signature).cloned()
    }

    /// Whether a stub is bound to `signature`.
    #[must_use]
    pub fn contains(&self, signature: &CallSignature) -> bool {
        self.bindings.contains_key(signature)
    }

    /// Number of bound signatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no stubs are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::signature::ReceiverId;
    use crate::stub::Fault;

    fn sig(receiver: &ReceiverId, method: &'static str, a: f64, b: f64) -> CallSignature {
        CallSignature::new(receiver.clone(), method, args![a, b])
    }

    #[test]
    fn test_unregistered_signature_is_unstubbed() {
        let calc = ReceiverId::new("calc");
        let registry = StubRegistry::new();
        assert_eq!(
            registry.resolve::<f64>(&sig(&calc, "add", 1.0, 2.0)),
            Resolved::Unstubbed
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let calc = ReceiverId::new("calc");
        let mut registry = StubRegistry::new();
        registry.register(sig(&calc, "add", 20.0, 10.0), Stub::Return(1.0_f64));
        registry.register(sig(&calc, "add", 20.0, 10.0), Stub::Return(30.0_f64));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.resolve::<f64>(&sig(&calc, "add", 20.0, 10.0)),
            Resolved::Value(30.0)
        );
    }

    #[test]
    fn test_replacing_value_with_fault() {
        let calc = ReceiverId::new("calc");
        let mut registry = StubRegistry::new();
        registry.register(sig(&calc, "add", 10.0, 20.0), Stub::Return(30.0_f64));
        registry.register(
            sig(&calc, "add", 10.0, 20.0),
            Stub::<f64>::Raise(Fault::runtime("Add operation not implemented")),
        );

        assert_eq!(
            registry.resolve::<f64>(&sig(&calc, "add", 10.0, 20.0)),
            Resolved::Raise(Fault::runtime("Add operation not implemented"))
        );
    }

    #[test]
    fn test_swapped_arguments_miss() {
        let calc = ReceiverId::new("calc");
        let mut registry = StubRegistry::new();
        registry.register(sig(&calc, "add", 20.0, 10.0), Stub::Return(30.0_f64));

        assert!(registry.contains(&sig(&calc, "add", 20.0, 10.0)));
        assert!(!registry.contains(&sig(&calc, "add", 10.0, 20.0)));
    }

    #[test]
    fn test_resolve_has_no_side_effects() {
        let calc = ReceiverId::new("calc");
        let mut registry = StubRegistry::new();
        registry.register(sig(&calc, "add", 20.0, 10.0), Stub::Return(30.0_f64));

        for _ in 0..3 {
            assert_eq!(
                registry.resolve::<f64>(&sig(&calc, "add", 20.0, 10.0)),
                Resolved::Value(30.0)
            );
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear() {
        let calc = ReceiverId::new("calc");
        let mut registry = StubRegistry::new();
        registry.register(sig(&calc, "add", 20.0, 10.0), Stub::Return(30.0_f64));
        registry.clear();
        assert!(registry.is_empty());
    }
}
