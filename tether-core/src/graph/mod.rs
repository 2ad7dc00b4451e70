//! Scene Graph
//!
//! This module implements the retained tree that bindings live on: nodes
//! with stable identities, parent/child structure, named property slots,
//! and the per-root index of live bound nodes.
//!
//! # Overview
//!
//! - A [`Node`] is a clonable handle to shared node state. Parent
//!   child-lists hold the strong references; parent pointers and index
//!   entries are weak.
//! - A root (created with [`Node::new_root`]) anchors a displayed tree and
//!   owns the index the compute pass iterates.
//! - The attachment hooks ([`Node::add`] / [`Node::remove`]) are the only
//!   writers of that index: they flush deferred binding declarations,
//!   register and unregister nodes, and apply the one-level re-index policy
//!   for pre-built subtrees.
//!
//! # Design Decisions
//!
//! 1. Binding state is owned by the node itself (registry, mode flag,
//!    property table) rather than kept in a side table, so it trivially
//!    survives detachment and travels with the node between trees.
//!
//! 2. The index maps ids to weak handles: the compute pass never keeps a
//!    node alive, and a stale entry degrades to a skipped iteration rather
//!    than a dangling access.

mod index;
mod node;

pub use node::{AttachError, Node, NodeId, WeakNode};

pub(crate) use index::RootIndex;
