//! The per-frame compute pass.
//!
//! The external driver loop calls [`compute_auto_binding`] once per
//! rendered frame per scene (after updating the time/state inputs that
//! producers read, before rendering the frame). The pass walks the root's
//! index of live bound nodes and re-executes every installed binding of
//! every indexed node.
//!
//! # Reentrancy
//!
//! A binding's producer may itself attach or detach nodes — including
//! detaching the very node being executed. The pass therefore iterates a
//! point-in-time snapshot of the index taken at pass start and re-checks
//! each entry against the live index before executing it: a node detached
//! mid-pass is skipped, a node attached mid-pass is picked up on the next
//! pass, and every indexed node executes at most once per pass.

use tracing::{debug, trace, warn};

use crate::graph::Node;

/// Run one compute pass over a single root.
///
/// Calling this on a non-root node is reported and does nothing.
pub fn compute_auto_binding(root: &Node) {
    compute_root(root);
}

/// Run one compute pass over each of the given roots, in order.
pub fn compute_auto_binding_all<'a, I>(roots: I)
where
    I: IntoIterator<Item = &'a Node>,
{
    for root in roots {
        compute_root(root);
    }
}

fn compute_root(root: &Node) {
    let Some(index) = root.bound_index() else {
        warn!(node = %root.id(), "compute pass invoked on a non-root node");
        return;
    };

    let snapshot = index.snapshot();
    trace!(root = %root.id(), nodes = snapshot.len(), "compute pass");

    for (id, weak) in snapshot {
        // Entries that left the index mid-pass are skipped; entries whose
        // node is gone are stale and dropped from the index.
        if !index.contains(id) {
            continue;
        }
        match weak.upgrade() {
            Some(node) => node.run_bindings(),
            None => {
                debug!(node = %id, "dropping stale index entry");
                index.unregister(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::binding::DetectMode;
    use crate::graph::Node;

    fn counter_node(count: &Arc<AtomicI32>) -> Node {
        let count = count.clone();
        let node = Node::new();
        node.bind_callback("tick", move || {
            count.fetch_add(1, Ordering::SeqCst);
        });
        node
    }

    #[test]
    fn pass_executes_every_indexed_node_once() {
        let count = Arc::new(AtomicI32::new(0));
        let root = Node::new_root();
        let a = counter_node(&count);
        let b = counter_node(&count);
        root.add(&a).add(&b);
        assert_eq!(count.load(Ordering::SeqCst), 2); // install executions

        compute_auto_binding(&root);
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn pass_over_a_non_root_is_a_no_op() {
        let count = Arc::new(AtomicI32::new(0));
        let parent = Node::new();
        let node = counter_node(&count);
        parent.add(&node);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        compute_auto_binding(&parent);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn manual_nodes_are_excluded_from_the_pass() {
        let count = Arc::new(AtomicI32::new(0));
        let root = Node::new_root();

        let manual = Node::new();
        manual.set_detect_changes_mode(DetectMode::Manual);
        let count_clone = count.clone();
        manual.bind_callback("tick", move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        root.add(&manual);
        assert_eq!(count.load(Ordering::SeqCst), 1); // install execution

        compute_auto_binding(&root);
        compute_auto_binding(&root);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        manual.detect_changes();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn multiple_roots_compute_in_order() {
        let count = Arc::new(AtomicI32::new(0));
        let first = Node::new_root();
        let second = Node::new_root();
        first.add(&counter_node(&count));
        second.add(&counter_node(&count));
        assert_eq!(count.load(Ordering::SeqCst), 2);

        compute_auto_binding_all([&first, &second]);
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn node_detaching_itself_mid_pass_is_not_visited_again() {
        let count = Arc::new(AtomicI32::new(0));
        let root = Node::new_root();

        // A fading node removes itself once its opacity decays, the way
        // short-lived effect nodes do.
        let fading = Node::new();
        fading.set_prop("opacity", 0.2);
        {
            let handle = fading.clone();
            let count = count.clone();
            fading.bind_callback("fade", move || {
                count.fetch_add(1, Ordering::SeqCst);
                let opacity = handle
                    .prop("opacity")
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0)
                    - 0.1;
                handle.set_prop("opacity", opacity);
                if opacity <= 0.0 {
                    handle.remove_from_parent();
                }
            });
        }
        root.add(&fading);
        assert_eq!(count.load(Ordering::SeqCst), 1); // install: 0.2 -> 0.1

        compute_auto_binding(&root); // 0.1 -> 0.0, detaches itself
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(fading.parent().is_none());

        compute_auto_binding(&root); // no longer indexed
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn node_detached_by_a_sibling_mid_pass_is_skipped() {
        let count = Arc::new(AtomicI32::new(0));
        let root = Node::new_root();

        let victim = counter_node(&count);
        let killer = Node::new();
        {
            let root = root.clone();
            let victim = victim.clone();
            killer.bind_callback("kill", move || {
                if victim.parent().is_some() {
                    root.remove(&victim);
                }
            });
        }

        // The killer registers ahead of the victim, so the pass reaches it
        // first and the victim's snapshot entry is already dead.
        root.add(&killer);
        root.add(&victim);
        assert_eq!(count.load(Ordering::SeqCst), 1); // victim's install

        compute_auto_binding(&root);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(victim.parent().is_none());
    }

    #[test]
    fn nodes_attached_mid_pass_run_on_the_next_pass() {
        let count = Arc::new(AtomicI32::new(0));
        let root = Node::new_root();

        let spawned = counter_node(&count);
        // Deferred install: nothing executes until the spawner attaches it.
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // The spawner attaches `spawned` on its second execution, i.e.
        // during the first compute pass rather than at install time.
        let spawner = Node::new();
        {
            let root = root.clone();
            let spawner_handle = spawner.clone();
            let spawned = spawned.clone();
            spawner.bind_callback("spawn", move || {
                let runs = spawner_handle
                    .prop("runs")
                    .and_then(|v| v.as_i64())
                    .unwrap_or(0)
                    + 1;
                spawner_handle.set_prop("runs", runs);
                if runs >= 2 && spawned.parent().is_none() {
                    root.add(&spawned);
                }
            });
        }
        root.add(&spawner);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // First pass: the spawner attaches `spawned`, whose deferred
        // install executes once — but `spawned` is not in this pass's
        // snapshot, so it is not computed again within the same pass.
        compute_auto_binding(&root);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Next pass picks it up.
        compute_auto_binding(&root);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn consecutive_passes_without_state_change_produce_identical_values() {
        let root = Node::new_root();
        root.set_prop("time", 4.0);

        let node = Node::new();
        {
            let node_handle = node.clone();
            node.bind_property("phase", move || {
                let time = node_handle
                    .parent()
                    .and_then(|p| p.prop("time"))
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0);
                time * 0.5
            });
        }
        root.add(&node);
        assert_eq!(node.prop("phase").and_then(|v| v.as_f64()), Some(2.0));

        compute_auto_binding(&root);
        compute_auto_binding(&root);
        assert_eq!(node.prop("phase").and_then(|v| v.as_f64()), Some(2.0));

        // The value tracks its input once the input moves.
        root.set_prop("time", 10.0);
        compute_auto_binding(&root);
        assert_eq!(node.prop("phase").and_then(|v| v.as_f64()), Some(5.0));
    }
}
