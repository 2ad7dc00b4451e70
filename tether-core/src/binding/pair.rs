//! Producer/consumer pairs.
//!
//! A [`Binding`] is one declared reactive relationship on a node: a
//! producer (a no-argument computation) paired with a consumer (what to do
//! with the produced value).
//!
//! Property bindings produce a [`Value`] and write it into a named slot on
//! the owning node. Callback bindings produce only side effects; their
//! consumer is the no-op sink.
//!
//! Producers are `Send + Sync + 'static` closures behind an `Arc`, so a
//! binding is cheap to clone into an execution snapshot.

use std::sync::Arc;

use crate::graph::Node;
use crate::value::Value;

pub(crate) enum Producer {
    /// Computes the next value of a bound slot.
    Value(Arc<dyn Fn() -> Value + Send + Sync>),
    /// Runs for its side effects only.
    Effect(Arc<dyn Fn() + Send + Sync>),
}

impl Clone for Producer {
    fn clone(&self) -> Self {
        match self {
            Producer::Value(f) => Producer::Value(Arc::clone(f)),
            Producer::Effect(f) => Producer::Effect(Arc::clone(f)),
        }
    }
}

#[derive(Clone)]
pub(crate) enum Consumer {
    /// Write the produced value into the named slot on the owning node.
    Slot(String),
    /// Discard the produced value.
    Sink,
}

#[derive(Clone)]
pub(crate) struct Binding {
    producer: Producer,
    consumer: Consumer,
}

impl Binding {
    pub(crate) fn property<F>(slot: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            producer: Producer::Value(Arc::new(producer)),
            consumer: Consumer::Slot(slot.into()),
        }
    }

    pub(crate) fn callback<F>(producer: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            producer: Producer::Effect(Arc::new(producer)),
            consumer: Consumer::Sink,
        }
    }

    /// Invoke the producer, then hand the produced value to the consumer.
    ///
    /// No node lock is held while the producer runs; the producer may
    /// attach or detach nodes, redeclare bindings, or read and write
    /// properties on any node it captured.
    pub(crate) fn execute(&self, node: &Node) {
        match &self.producer {
            Producer::Effect(run) => run(),
            Producer::Value(produce) => {
                let value = produce();
                match &self.consumer {
                    Consumer::Slot(slot) => node.apply_produced(slot, value),
                    Consumer::Sink => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::graph::Node;

    #[test]
    fn callback_runs_producer_only() {
        let count = Arc::new(AtomicI32::new(0));
        let count_clone = count.clone();

        let node = Node::new();
        let binding = Binding::callback(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        binding.execute(&node);
        binding.execute(&node);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(node.prop("anything").is_none());
    }

    #[test]
    fn property_writes_produced_value_into_slot() {
        let node = Node::new();
        let binding = Binding::property("answer", || Value::Int(42));

        binding.execute(&node);
        assert_eq!(node.prop("answer").and_then(|v| v.as_i64()), Some(42));
    }
}
