//! Keyed one-shot timers
//!
//! Provides lifecycle management for delayed callbacks with support for:
//! - Automatic cancellation when scheduling with the same key
//! - Manual cancellation of a single key or everything
//! - Cancellation of every pending timer when the set is dropped
//!
//! # Example
//!
//! ```ignore
//! use walkthrough_core::timers::{TimerKey, TimerSet};
//! use std::time::Duration;
//!
//! let mut timers = TimerSet::new();
//!
//! // Re-measure the target once the smooth scroll has settled
//! timers.schedule("target-settle", Duration::from_millis(350), move || {
//!     engine.update_target_rect();
//! });
//!
//! // A new step supersedes the pending gate timeout
//! timers.cancel(&TimerKey::new("gate-timeout"));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Identifies a timer for cancellation and replacement.
///
/// Timers with the same key are mutually exclusive - scheduling a new timer
/// with a key that is still pending cancels the existing one.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimerKey(String);

impl TimerKey {
    /// Create a new timer key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TimerKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TimerKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Manages pending timers with automatic cancellation.
///
/// Each timer is a tokio task racing `sleep(delay)` against its
/// cancellation token. A cancelled timer never runs its callback.
#[derive(Debug, Default)]
pub struct TimerSet {
    timers: HashMap<TimerKey, CancellationToken>,
}

impl TimerSet {
    /// Create an empty timer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `f` to run after `delay`, cancelling any timer with the same key.
    ///
    /// Requires a tokio runtime; without one the timer is skipped with a
    /// warning and `false` is returned.
    pub fn schedule<F>(&mut self, key: impl Into<TimerKey>, delay: Duration, f: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let Ok(runtime) = Handle::try_current() else {
            warn!(timer = key.name(), "no tokio runtime, timer not scheduled");
            return false;
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !cancelled.is_cancelled() {
                        f();
                    }
                }
            }
        });

        self.timers.insert(key, token);
        true
    }

    /// Cancel a timer by key.
    ///
    /// If no timer exists with the given key, this is a no-op.
    pub fn cancel(&mut self, key: &TimerKey) {
        if let Some(token) = self.timers.remove(key) {
            token.cancel();
        }
    }

    /// Cancel all pending timers.
    pub fn cancel_all(&mut self) {
        for (_, token) in self.timers.drain() {
            token.cancel();
        }
    }

    /// Check if a timer with the given key has been scheduled and not cancelled.
    ///
    /// A timer that already fired still counts until it is cancelled or
    /// replaced.
    pub fn is_scheduled(&self, key: &TimerKey) -> bool {
        self.timers
            .get(key)
            .map(|token| !token.is_cancelled())
            .unwrap_or(false)
    }

    /// Get the number of tracked timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Check if there are no tracked timers.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
