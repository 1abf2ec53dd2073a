//! Core types for walkthrough
//!
//! This crate provides the tutorial engine behind a guided product tour: the
//! step state machine, the wait-for-action gate, target tracking and the
//! event bus used to synchronize with host code. Rendering the overlay and
//! popover is left to a presentation layer that reads the engine's state.
//!
//! # Core Concepts
//!
//! - **TutorialConfig**: Ordered steps plus tour-level options
//! - **Engine**: Owns the active tour and exposes navigation
//! - **EventBus**: Pub/sub for lifecycle events and host actions
//! - **Gate**: A step blocking forward navigation until an action fires
//! - **ScrollCoordinator**: Keeps the target and popover on screen
//!
//! # Basic Example
//!
//! ```ignore
//! use walkthrough_core::prelude::*;
//!
//! let engine = Engine::new();
//! engine
//!     .start(TutorialConfig::new(
//!         "t",
//!         vec![
//!             TutorialStep::new("a", "A", "First"),
//!             TutorialStep::new("b", "B", "Second")
//!                 .target("#save")
//!                 .wait_for(WaitForAction::new("saved")),
//!         ],
//!     ))
//!     .await?;
//!
//! engine.next().await?;
//! assert!(!engine.can_go_next());
//!
//! engine.trigger_action("saved", None);
//! engine.complete()?;
//! assert!(engine.is_completed("t"));
//! ```
//!
//! # Scheduling
//!
//! The engine is meant for a single cooperative UI thread. Timers (gate
//! timeouts, scroll settling) run on the ambient tokio runtime. Navigation
//! calls may overlap: the newest one wins and older ones stop at their next
//! await point.

pub mod bus;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod geometry;
pub mod presentation;
pub mod scroll;
pub mod step;
pub mod storage;
pub mod target;
pub mod testing;
pub mod timers;

// Core exports
pub use config::{CompletionHook, ConfigWarning, EngineSettings, TutorialConfig};
pub use engine::{Engine, EngineBuilder, PopoverMeasure, TutorialState};
pub use error::{HookError, HookPhase, TourError};
pub use step::{BoxFuture, Placement, StepHook, TutorialStep, WaitForAction};

// Event system exports
pub use bus::{handler, EventBus, Handler};
pub use event::{EventKey, TourEvent};

// Collaborator exports
pub use geometry::Rect;
pub use scroll::{
    plan_popover_scroll, plan_target_scroll, FixedViewport, ScrollBehavior, ScrollCoordinator,
    Viewport,
};
pub use storage::{completion_key, CompletionStore, JsonFileStore, MemoryStore};
pub use target::{FramePacer, NoTargets, TargetResolver, YieldFrame};
pub use timers::{TimerKey, TimerSet};

// Presentation exports
pub use presentation::{
    Intent, NavFlags, OverlayProps, OverlayRenderer, PopoverProps, PopoverRenderer, SkipTarget,
};

// Testing exports
pub use testing::{EventRecorder, FakeDom, FakeViewport, ImmediateFrame};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bus::{handler, EventBus, Handler};
    pub use crate::config::{CompletionHook, EngineSettings, TutorialConfig};
    pub use crate::engine::{Engine, EngineBuilder, TutorialState};
    pub use crate::error::{HookError, TourError};
    pub use crate::event::{EventKey, TourEvent};
    pub use crate::geometry::Rect;
    pub use crate::presentation::{
        Intent, NavFlags, OverlayProps, OverlayRenderer, PopoverProps, PopoverRenderer,
    };
    pub use crate::scroll::{ScrollBehavior, Viewport};
    pub use crate::step::{Placement, StepHook, TutorialStep, WaitForAction};
    pub use crate::storage::{CompletionStore, JsonFileStore, MemoryStore};
    pub use crate::target::{FramePacer, TargetResolver};
}
