//! Tether Core
//!
//! This crate provides the core binding runtime for the Tether reactive
//! scene-graph framework. It implements:
//!
//! - Keyed reactive bindings (property and callback) on tree nodes
//! - Deferred installation for bindings declared before first attachment
//! - Per-root tracking of live, auto-mode bound nodes
//! - A per-frame compute pass that re-executes every live binding
//!
//! Rendering, geometry, input handling, and asset loading are out of scope:
//! demos supply arbitrary producers and drive the pass once per frame.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `binding`: bindings, the per-node registry, change-detection mode, and
//!   the compute pass
//! - `graph`: nodes, attachment hooks, and the per-root index
//! - `value`: slot values, including composites with identity-preserving
//!   in-place updates
//!
//! # Example
//!
//! ```rust
//! use tether_core::{compute_auto_binding, Node};
//!
//! // Build a scene.
//! let scene = Node::new_root();
//! scene.set_prop("time", 0.0);
//!
//! // Declare a binding before the node has a parent; it installs and
//! // executes at first attachment.
//! let box_node = Node::new();
//! {
//!     let scene = scene.clone();
//!     let handle = box_node.clone();
//!     box_node.bind_property("spin", move || {
//!         let time = scene.prop("time").and_then(|v| v.as_f64()).unwrap_or(0.0);
//!         let speed = handle.prop("speed").and_then(|v| v.as_f64()).unwrap_or(1.0);
//!         time * speed
//!     });
//! }
//! box_node.set_prop("speed", 2.0);
//! scene.add(&box_node);
//!
//! // The frame driver updates inputs, then runs one compute pass.
//! scene.set_prop("time", 0.5);
//! compute_auto_binding(&scene);
//! assert_eq!(box_node.prop("spin").and_then(|v| v.as_f64()), Some(1.0));
//! ```

pub mod binding;
pub mod graph;
pub mod value;

pub use binding::{compute_auto_binding, compute_auto_binding_all, DetectMode, ModeError};
pub use graph::{AttachError, Node, NodeId, WeakNode};
pub use value::{Euler, Quat, Value, ValueKind, Vec2, Vec3};
