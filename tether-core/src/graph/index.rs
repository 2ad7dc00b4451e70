//! Per-root index of live bound nodes.
//!
//! Every root owns a [`RootIndex`] mapping node ids to weak node handles.
//! The index holds exactly the attached, auto-mode nodes under that root
//! that carry at least one installed binding; the attachment hooks keep it
//! consistent as the tree mutates.
//!
//! Entries are weak so the index never keeps a node alive: ownership of
//! tree membership belongs to parent child-lists alone. The compute pass
//! upgrades entries from a snapshot and skips any that have gone stale.

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::node::{Node, NodeId, WeakNode};

#[derive(Default)]
pub(crate) struct RootIndex {
    entries: RwLock<IndexMap<NodeId, WeakNode>>,
}

impl RootIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a node. Re-registering an already-indexed node is a no-op
    /// (the entry keeps its position).
    pub(crate) fn register(&self, node: &Node) {
        self.entries
            .write()
            .entry(node.id())
            .or_insert_with(|| node.downgrade());
    }

    pub(crate) fn unregister(&self, id: NodeId) {
        self.entries.write().shift_remove(&id);
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// A point-in-time copy of the index entries, in registration order.
    ///
    /// The pass iterates this snapshot so bindings may attach and detach
    /// nodes mid-pass without corrupting iteration.
    pub(crate) fn snapshot(&self) -> Vec<(NodeId, WeakNode)> {
        self.entries
            .read()
            .iter()
            .map(|(id, weak)| (*id, weak.clone()))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
