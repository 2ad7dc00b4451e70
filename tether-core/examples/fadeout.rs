//! Self-detaching effect nodes.
//!
//! A spawner adds a short-lived "impact" node every few frames; each impact
//! fades its opacity per frame and removes itself from the scene when fully
//! faded. Attach and detach both happen from inside bindings, mid-pass —
//! the runtime's snapshot iteration keeps the pass well-defined.

use tether_core::{compute_auto_binding, Node};

fn make_impact(spawned_at: i64) -> Node {
    let node = Node::new();
    node.set_prop("spawned_at", spawned_at);
    node.set_prop("opacity", 1.0);

    let handle = node.clone();
    node.bind_callback("fade", move || {
        let opacity = handle
            .prop("opacity")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
            - 0.25;
        handle.set_prop("opacity", opacity);
        if opacity <= 0.0 {
            handle.remove_from_parent();
        }
    });
    node
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let scene = Node::new_root();
    // -1 so the spawner's install execution does not spawn before frame 0.
    scene.set_prop("frame", -1i64);

    // Scene-level binding: spawn an impact every third frame.
    {
        let scene_handle = scene.clone();
        scene.bind_callback("spawner", move || {
            let frame = scene_handle
                .prop("frame")
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            if frame % 3 == 0 {
                scene_handle.add(&make_impact(frame));
            }
        });
    }

    for frame in 0..12i64 {
        scene.set_prop("frame", frame);
        compute_auto_binding(&scene);
        println!("frame {frame}: {} live impacts", scene.child_count());
    }
}
