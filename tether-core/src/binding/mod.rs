//! Reactive Bindings
//!
//! This module implements the binding layer: keyed producer/consumer pairs
//! declared on scene-graph nodes, the per-node registry that owns them, the
//! write-once change-detection mode, and the per-frame compute pass.
//!
//! # Concepts
//!
//! ## Property bindings
//!
//! A property binding declares "this slot's value is always `f(state)`".
//! On every recomputation the producer runs and its value is written into
//! the named slot — in place when the slot holds a composite of the same
//! kind, preserving the slot's storage identity for everyone else holding
//! it.
//!
//! ## Callback bindings
//!
//! A callback binding declares "run this side-effecting function every
//! frame". The produced value is discarded; only the producer's effects
//! matter.
//!
//! ## Recomputation
//!
//! Auto-mode nodes are recomputed by [`compute_auto_binding`] once per
//! displayed frame while attached to a root. Manual-mode nodes are
//! recomputed only by an explicit `detect_changes` call. In both cases a
//! node's bindings execute in the order they were most recently
//! (re)installed.

mod compute;
mod mode;
mod pair;
mod registry;

pub use compute::{compute_auto_binding, compute_auto_binding_all};
pub use mode::{DetectMode, ModeError};

pub(crate) use mode::ModeCell;
pub(crate) use pair::Binding;
pub(crate) use registry::BindingRegistry;
