//! Per-node binding registry.
//!
//! Each node owns a registry mapping binding keys to [`Binding`]s. The
//! registry lives as long as the node, independent of tree membership:
//! detaching a node leaves its registry untouched, ready to re-execute on
//! re-attachment.
//!
//! Execution order is the order bindings were most recently (re)installed:
//! re-declaring an existing key replaces it and moves it to the end.

use indexmap::IndexMap;

use super::pair::Binding;

#[derive(Default)]
pub(crate) struct BindingRegistry {
    bindings: IndexMap<String, Binding>,
}

impl BindingRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Install a binding under `key`, replacing any previous binding with
    /// that key and moving the key to the end of the execution order.
    pub(crate) fn install(&mut self, key: String, binding: Binding) {
        self.bindings.shift_remove(&key);
        self.bindings.insert(key, binding);
    }

    /// Remove the binding under `key`, preserving the relative order of the
    /// remainder. Returns whether a binding was present.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.bindings.shift_remove(key).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// A point-in-time copy of the bindings in execution order.
    ///
    /// Execution runs over this snapshot with no registry lock held, so a
    /// binding may freely re-declare or unbind keys on its own node.
    pub(crate) fn snapshot(&self) -> Vec<Binding> {
        self.bindings.values().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }
}
