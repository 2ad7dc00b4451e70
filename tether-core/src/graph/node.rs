//! Scene-graph nodes and attachment hooks.
//!
//! A [`Node`] is a cheaply clonable handle to shared node state: clones
//! share the same identity, parent, children, properties, and bindings.
//! Membership in a tree is owned exclusively by parent child-lists (strong
//! handles); the upward parent reference is weak, as is every root-index
//! entry, so a subtree is dropped as soon as its last external handle and
//! its parent's strong reference are gone.
//!
//! The structural mutations [`Node::add`] and [`Node::remove`] are the
//! attachment hooks: besides reparenting, they flush deferred binding
//! declarations and keep the owning root's index of live bound nodes
//! consistent. Everything a binding needs for its whole lifetime — the
//! registry, the mode flag, the property table — lives on the node and
//! survives detachment untouched.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::index::RootIndex;
use crate::binding::{Binding, BindingRegistry, DetectMode, ModeCell, ModeError};
use crate::value::Value;

/// Unique identifier for a node. Stable for the node's lifetime and unique
/// across all nodes of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by invalid attach requests.
///
/// The chainable [`Node::add`] reports these and degrades to a no-op;
/// [`Node::try_add`] returns them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AttachError {
    #[error("node {node} cannot be attached to itself")]
    SelfAttach { node: NodeId },

    #[error("root node {child} cannot be attached under {parent}")]
    RootChild { parent: NodeId, child: NodeId },

    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// A binding declared before the node's first attachment, waiting to be
/// installed.
struct DeferredDecl {
    key: String,
    binding: Binding,
}

struct NodeInner {
    id: NodeId,
    root: bool,
    parent: RwLock<Weak<NodeInner>>,
    children: RwLock<SmallVec<[Node; 4]>>,
    props: RwLock<HashMap<String, Value>>,
    registry: RwLock<BindingRegistry>,
    mode: ModeCell,
    deferred: RwLock<SmallVec<[DeferredDecl; 2]>>,
    /// Present iff this node was constructed as a root.
    bound: Option<RootIndex>,
}

/// A handle to a scene-graph node. Clones share state.
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    /// Create a detached, non-root node.
    pub fn new() -> Self {
        Self::construct(false)
    }

    /// Create a root node. Roots anchor a displayed tree, own the index of
    /// live bound nodes under them, and may carry bindings themselves.
    pub fn new_root() -> Self {
        Self::construct(true)
    }

    fn construct(root: bool) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                id: NodeId::new(),
                root,
                parent: RwLock::new(Weak::new()),
                children: RwLock::new(SmallVec::new()),
                props: RwLock::new(HashMap::new()),
                registry: RwLock::new(BindingRegistry::new()),
                mode: ModeCell::new(),
                deferred: RwLock::new(SmallVec::new()),
                bound: root.then(RootIndex::new),
            }),
        }
    }

    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    pub fn is_root(&self) -> bool {
        self.inner.root
    }

    /// The current parent, if attached.
    pub fn parent(&self) -> Option<Node> {
        self.inner.parent.read().upgrade().map(|inner| Node { inner })
    }

    /// A snapshot of the current children, in attachment order.
    pub fn children(&self) -> Vec<Node> {
        self.inner.children.read().iter().cloned().collect()
    }

    pub fn child_count(&self) -> usize {
        self.inner.children.read().len()
    }

    /// Walk parent references up to the owning root, if any. A root is its
    /// own root.
    pub fn root(&self) -> Option<Node> {
        let mut cursor = self.clone();
        loop {
            if cursor.is_root() {
                return Some(cursor);
            }
            match cursor.parent() {
                Some(parent) => cursor = parent,
                None => return None,
            }
        }
    }

    /// Whether the node is currently part of a displayed tree.
    pub fn is_attached(&self) -> bool {
        self.root().is_some()
    }

    /// Create a non-owning reference to this node.
    pub fn downgrade(&self) -> WeakNode {
        WeakNode {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Read a named slot. Composite values come back as handles sharing the
    /// slot's storage.
    pub fn prop(&self, key: &str) -> Option<Value> {
        self.inner.props.read().get(key).cloned()
    }

    /// Write a named slot directly, replacing its content.
    pub fn set_prop(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.inner.props.write().insert(key.into(), value.into());
        self
    }

    /// Apply a produced value to a slot: copy in place when the slot holds
    /// a composite of the same kind (identity preserved), replace otherwise.
    pub(crate) fn apply_produced(&self, slot: &str, value: Value) {
        let existing = self.inner.props.read().get(slot).cloned();
        match existing {
            Some(current) if current.copy_from(&value) => {}
            _ => {
                self.inner.props.write().insert(slot.to_owned(), value);
            }
        }
    }

    // ------------------------------------------------------------------
    // Change-detection mode
    // ------------------------------------------------------------------

    pub fn detect_changes_mode(&self) -> DetectMode {
        self.inner.mode.get()
    }

    /// First-write-wins mode assignment.
    ///
    /// A successful write of [`DetectMode::Manual`] also removes the node
    /// from its root's index, keeping the index manual-free.
    pub fn try_set_detect_changes_mode(&self, mode: DetectMode) -> Result<(), ModeError> {
        self.inner.mode.set(mode)?;
        if mode == DetectMode::Manual {
            self.unindex();
        }
        Ok(())
    }

    /// Chainable mode assignment; a repeated attempt is reported and the
    /// effective mode is unchanged.
    pub fn set_detect_changes_mode(&self, mode: DetectMode) -> &Self {
        if let Err(err) = self.try_set_detect_changes_mode(mode) {
            error!(node = %self.id(), error = %err, "cannot change detect-changes mode");
        }
        self
    }

    // ------------------------------------------------------------------
    // Binding declaration
    // ------------------------------------------------------------------

    /// Declare a property binding: every recomputation writes the
    /// producer's value into the named slot. Installation is deferred until
    /// first attachment when the node is detached and not a root.
    pub fn bind_property<F, V>(&self, key: impl Into<String>, producer: F) -> &Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.bind_property_with(key, producer, true)
    }

    /// [`Node::bind_property`] with explicit control over deferral.
    pub fn bind_property_with<F, V>(
        &self,
        key: impl Into<String>,
        producer: F,
        defer_until_attached: bool,
    ) -> &Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        let key = key.into();
        let binding = Binding::property(key.clone(), move || producer().into());
        self.declare(key, binding, defer_until_attached);
        self
    }

    /// Declare a callback binding: the producer runs for its side effects
    /// on every recomputation.
    pub fn bind_callback<F>(&self, key: impl Into<String>, producer: F) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.bind_callback_with(key, producer, true)
    }

    /// [`Node::bind_callback`] with explicit control over deferral.
    pub fn bind_callback_with<F>(
        &self,
        key: impl Into<String>,
        producer: F,
        defer_until_attached: bool,
    ) -> &Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = key.into();
        let binding = Binding::callback(producer);
        self.declare(key, binding, defer_until_attached);
        self
    }

    /// Remove the binding under `key`. Unknown keys are ignored. Index
    /// membership is re-evaluated only at attach/detach time, not here.
    pub fn unbind_by_key(&self, key: &str) -> &Self {
        self.inner.registry.write().remove(key);
        self
    }

    /// Execute every binding in the registry immediately, in installation
    /// order, regardless of mode and of index membership. This is the only
    /// recomputation path for manual-mode nodes.
    pub fn detect_changes(&self) {
        self.run_bindings();
    }

    pub fn binding_count(&self) -> usize {
        self.inner.registry.read().len()
    }

    fn declare(&self, key: String, binding: Binding, defer_until_attached: bool) {
        if defer_until_attached && self.parent().is_none() && !self.is_root() {
            self.inner
                .deferred
                .write()
                .push(DeferredDecl { key, binding });
        } else {
            self.install_now(key, binding);
        }
    }

    /// Insert into the registry, execute once to establish the initial
    /// value, then register with a reachable root's index if eligible.
    fn install_now(&self, key: String, binding: Binding) {
        self.inner.registry.write().install(key, binding.clone());
        binding.execute(self);
        self.index_if_eligible();
    }

    fn index_if_eligible(&self) {
        if self.detect_changes_mode() != DetectMode::Auto || !self.has_bindings() {
            return;
        }
        if let Some(root) = self.root() {
            if let Some(index) = root.bound_index() {
                index.register(self);
            }
        }
    }

    fn unindex(&self) {
        if let Some(root) = self.root() {
            if let Some(index) = root.bound_index() {
                index.unregister(self.id());
            }
        }
    }

    /// Install and execute the declarations queued before first attachment,
    /// in declaration order.
    fn flush_deferred(&self) {
        let pending: SmallVec<[DeferredDecl; 2]> =
            std::mem::take(&mut *self.inner.deferred.write());
        if pending.is_empty() {
            return;
        }
        debug!(node = %self.id(), count = pending.len(), "installing deferred bindings");
        for decl in pending {
            self.install_now(decl.key, decl.binding);
        }
    }

    pub(crate) fn run_bindings(&self) {
        let snapshot = self.inner.registry.read().snapshot();
        for binding in snapshot {
            binding.execute(self);
        }
    }

    pub(crate) fn has_bindings(&self) -> bool {
        !self.inner.registry.read().is_empty()
    }

    pub(crate) fn bound_index(&self) -> Option<&RootIndex> {
        self.inner.bound.as_ref()
    }

    // ------------------------------------------------------------------
    // Attachment hooks
    // ------------------------------------------------------------------

    /// Attach `child` under this node; chainable. Invalid requests are
    /// reported and degrade to no-ops.
    pub fn add(&self, child: &Node) -> &Self {
        if let Err(err) = self.try_add(child) {
            error!(parent = %self.id(), child = %child.id(), error = %err, "attach rejected");
        }
        self
    }

    /// Attach `child` under this node.
    ///
    /// A child attached elsewhere is first removed from its previous parent
    /// (a node has at most one parent). After the structural attach, the
    /// child's deferred declarations are installed and executed, and — when
    /// a root is reachable — the child plus its *direct* children are
    /// registered with the root's index if they are auto-mode and carry
    /// bindings. The re-index is intentionally one level deep; grandchildren
    /// are picked up through their own attach events.
    pub fn try_add(&self, child: &Node) -> Result<(), AttachError> {
        if Arc::ptr_eq(&self.inner, &child.inner) {
            return Err(AttachError::SelfAttach { node: self.id() });
        }
        if child.is_root() {
            return Err(AttachError::RootChild {
                parent: self.id(),
                child: child.id(),
            });
        }
        let mut cursor = self.parent();
        while let Some(ancestor) = cursor {
            if Arc::ptr_eq(&ancestor.inner, &child.inner) {
                return Err(AttachError::Cycle {
                    parent: self.id(),
                    child: child.id(),
                });
            }
            cursor = ancestor.parent();
        }

        if let Some(previous) = child.parent() {
            previous.remove(child);
        }

        self.inner.children.write().push(child.clone());
        *child.inner.parent.write() = Arc::downgrade(&self.inner);

        child.flush_deferred();

        if let Some(root) = self.root() {
            if let Some(index) = root.bound_index() {
                if child.detect_changes_mode() == DetectMode::Auto && child.has_bindings() {
                    index.register(child);
                }
                for grandchild in child.children() {
                    if grandchild.detect_changes_mode() == DetectMode::Auto
                        && grandchild.has_bindings()
                    {
                        index.register(&grandchild);
                    }
                }
            }
        }

        Ok(())
    }

    /// Detach `child` from this node; chainable.
    ///
    /// The child (and its direct auto-mode children, same one-level policy
    /// as attach) leaves the root's index before the structural detach. The
    /// child's registry, mode, and properties are untouched; its bindings
    /// re-execute on re-attachment without redeclaration.
    pub fn remove(&self, child: &Node) -> &Self {
        let is_child = self
            .inner
            .children
            .read()
            .iter()
            .any(|c| Arc::ptr_eq(&c.inner, &child.inner));
        if !is_child {
            warn!(parent = %self.id(), child = %child.id(), "remove called for a node that is not a child");
            return self;
        }

        if let Some(root) = self.root() {
            if let Some(index) = root.bound_index() {
                index.unregister(child.id());
                for grandchild in child.children() {
                    if grandchild.detect_changes_mode() == DetectMode::Auto {
                        index.unregister(grandchild.id());
                    }
                }
            }
        }

        {
            let mut children = self.inner.children.write();
            if let Some(pos) = children
                .iter()
                .position(|c| Arc::ptr_eq(&c.inner, &child.inner))
            {
                children.remove(pos);
            }
        }
        *child.inner.parent.write() = Weak::new();
        self
    }

    /// Detach this node from its current parent, if any; chainable.
    pub fn remove_from_parent(&self) -> &Self {
        if let Some(parent) = self.parent() {
            parent.remove(self);
        }
        self
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("root", &self.is_root())
            .field("mode", &self.detect_changes_mode())
            .field("bindings", &self.binding_count())
            .field("children", &self.child_count())
            .finish()
    }
}

/// A non-owning node reference, for long-lived producers that must not keep
/// their targets alive.
#[derive(Clone)]
pub struct WeakNode {
    inner: Weak<NodeInner>,
}

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.inner.upgrade().map(|inner| Node { inner })
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "WeakNode({})", node.id()),
            None => write!(f, "WeakNode(<dropped>)"),
        }
    }
}
