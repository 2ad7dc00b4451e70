//! Change-detection mode.
//!
//! Every node carries a [`DetectMode`] deciding whether the per-frame
//! compute pass recomputes its bindings (`Auto`, the default) or whether
//! only an explicit `detect_changes` call does (`Manual`).
//!
//! The mode is write-once: it defaults to `Auto`, the first explicit
//! assignment is permanent, and any later assignment is rejected with the
//! value unchanged. The cell is a `OnceLock`, the same write-once primitive
//! the rest of the runtime uses for set-exactly-once state.

use std::sync::OnceLock;

use thiserror::Error;

/// Whether a node participates in the automatic per-frame compute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectMode {
    /// Recomputed by every compute pass while attached. The default.
    Auto,
    /// Excluded from every compute pass; only `detect_changes` recomputes.
    Manual,
}

/// Error raised by a repeated mode assignment.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    #[error("detect-changes mode is already set to {current:?}")]
    AlreadySet { current: DetectMode },
}

/// First-write-wins storage for a node's [`DetectMode`].
#[derive(Debug, Default)]
pub(crate) struct ModeCell {
    cell: OnceLock<DetectMode>,
}

impl ModeCell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The effective mode: the first written value, or `Auto`.
    pub(crate) fn get(&self) -> DetectMode {
        self.cell.get().copied().unwrap_or(DetectMode::Auto)
    }

    /// Attempt the one permitted write.
    pub(crate) fn set(&self, mode: DetectMode) -> Result<(), ModeError> {
        self.cell
            .set(mode)
            .map_err(|_| ModeError::AlreadySet { current: self.get() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_auto() {
        let cell = ModeCell::new();
        assert_eq!(cell.get(), DetectMode::Auto);
    }

    #[test]
    fn first_write_wins() {
        let cell = ModeCell::new();
        assert!(cell.set(DetectMode::Manual).is_ok());
        assert_eq!(cell.get(), DetectMode::Manual);

        // The second write is rejected and the value is unchanged.
        assert_eq!(
            cell.set(DetectMode::Auto),
            Err(ModeError::AlreadySet {
                current: DetectMode::Manual
            })
        );
        assert_eq!(cell.get(), DetectMode::Manual);
    }

    #[test]
    fn rewriting_the_same_value_is_still_rejected() {
        let cell = ModeCell::new();
        cell.set(DetectMode::Auto).unwrap();
        assert!(cell.set(DetectMode::Auto).is_err());
        assert_eq!(cell.get(), DetectMode::Auto);
    }
}
