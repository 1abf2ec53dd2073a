//! Error types

use std::fmt;

use thiserror::Error;

/// Boxed error produced by a step hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which step hook failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Enter,
    Exit,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Enter => f.write_str("on_enter"),
            HookPhase::Exit => f.write_str("on_exit"),
        }
    }
}

/// Errors reported by the tutorial engine.
///
/// Navigation edge cases (unknown step id, out-of-range index, unresolved
/// target) are not errors; those operations are silent no-ops.
#[derive(Debug, Error)]
pub enum TourError {
    /// The configuration cannot be started
    #[error("invalid tutorial config: {0}")]
    InvalidConfig(String),

    /// A step's `on_enter` / `on_exit` hook failed
    #[error("{phase} hook of step `{step_id}` failed: {source}")]
    Hook {
        step_id: String,
        phase: HookPhase,
        #[source]
        source: HookError,
    },

    /// The completion store could not be read or written
    #[error("completion store failure: {0}")]
    Storage(String),

    /// Configuration or settings JSON could not be parsed
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
}
