//! Hover/active boxes without a renderer.
//!
//! Mirrors the minimal demo shape: a scene holding a few boxes, each
//! deriving highlight state from scene-level input and advancing its own
//! rotation every frame. The "driver loop" here is a plain for-loop that
//! updates inputs, runs one compute pass, and prints instead of rendering.

use tether_core::{compute_auto_binding, Euler, Node};

fn make_box(index: i64, spin_speed: f64) -> Node {
    let node = Node::new();
    node.set_prop("index", index);
    node.set_prop("rotation", Euler::new(0.0, 0.0, 0.0));

    // Derived: is the scene pointer over this box?
    {
        let handle = node.clone();
        node.bind_property("is_hovered", move || {
            let hovered = handle
                .parent()
                .and_then(|scene| scene.prop("hovered_index"))
                .and_then(|v| v.as_i64())
                .unwrap_or(-1);
            hovered == index
        });
    }

    // Derived: highlight color name from hover state.
    {
        let handle = node.clone();
        node.bind_property("color", move || {
            if handle
                .prop("is_hovered")
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
            {
                "highlight"
            } else {
                "plain"
            }
        });
    }

    // Side effect: keep spinning.
    {
        let handle = node.clone();
        node.bind_callback("spin", move || {
            if let Some(rotation) = handle.prop("rotation").and_then(|v| v.euler()) {
                rotation.set(rotation.x(), rotation.y() + spin_speed, rotation.z());
            }
        });
    }

    node
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let scene = Node::new_root();
    scene.set_prop("hovered_index", -1i64);

    let boxes: Vec<Node> = (0..3).map(|i| make_box(i, 0.01 * (i + 1) as f64)).collect();
    for node in &boxes {
        scene.add(node);
    }

    for frame in 0..5i64 {
        // The driver updates inputs first, then runs the pass.
        scene.set_prop("hovered_index", frame % 3);
        compute_auto_binding(&scene);

        for node in &boxes {
            let color = node
                .prop("color")
                .and_then(|v| v.as_str().map(String::from))
                .unwrap_or_default();
            let spin = node
                .prop("rotation")
                .and_then(|v| v.euler())
                .map(|r| r.y())
                .unwrap_or(0.0);
            println!(
                "frame {frame} box {} color={color} spin={spin:.3}",
                node.prop("index").and_then(|v| v.as_i64()).unwrap_or(-1)
            );
        }
    }
}
