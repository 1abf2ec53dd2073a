//! Event types for the pub/sub system

use std::fmt;

use serde_json::Value;

use crate::step::TutorialStep;

pub const START: &str = "tutorial:start";
pub const STEP_CHANGE: &str = "tutorial:step-change";
pub const ACTION_COMPLETED: &str = "tutorial:action-completed";
pub const COMPLETE: &str = "tutorial:complete";
pub const CLOSE: &str = "tutorial:close";

/// Names that handlers can subscribe to
///
/// The lifecycle names are reserved; everything else is a host-defined
/// custom action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// `tutorial:start`
    Start,
    /// `tutorial:step-change`
    StepChange,
    /// `tutorial:action-completed`
    ActionCompleted,
    /// `tutorial:complete`
    Complete,
    /// `tutorial:close`
    Close,
    /// Any other name
    Custom(String),
}

impl EventKey {
    /// Wire name of the event
    pub fn as_str(&self) -> &str {
        match self {
            EventKey::Start => START,
            EventKey::StepChange => STEP_CHANGE,
            EventKey::ActionCompleted => ACTION_COMPLETED,
            EventKey::Complete => COMPLETE,
            EventKey::Close => CLOSE,
            EventKey::Custom(name) => name,
        }
    }

    /// Check if this is one of the reserved lifecycle names
    pub fn is_reserved(&self) -> bool {
        !matches!(self, EventKey::Custom(_))
    }
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        match name {
            START => EventKey::Start,
            STEP_CHANGE => EventKey::StepChange,
            ACTION_COMPLETED => EventKey::ActionCompleted,
            COMPLETE => EventKey::Complete,
            CLOSE => EventKey::Close,
            other => EventKey::Custom(other.to_string()),
        }
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        match EventKey::from(name.as_str()) {
            EventKey::Custom(_) => EventKey::Custom(name),
            reserved => reserved,
        }
    }
}

impl From<&String> for EventKey {
    fn from(name: &String) -> Self {
        EventKey::from(name.as_str())
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The actual event payload
#[derive(Debug, Clone)]
pub enum TourEvent {
    /// A tour became active
    Start { tour_id: String },
    /// A step became current
    StepChange { step: TutorialStep, index: usize },
    /// A step's wait-for-action gate was satisfied by its event
    ActionCompleted { event: String },
    /// The tour was completed
    Complete { tour_id: String },
    /// The tour was closed (also emitted on the way to completion)
    Close { tour_id: String },
    /// Host-defined action
    Custom { name: String, data: Option<Value> },
}

impl TourEvent {
    /// Create a host-defined event
    pub fn custom(name: impl Into<String>, data: Option<Value>) -> Self {
        TourEvent::Custom {
            name: name.into(),
            data,
        }
    }

    /// Key this event is published under
    pub fn key(&self) -> EventKey {
        match self {
            TourEvent::Start { .. } => EventKey::Start,
            TourEvent::StepChange { .. } => EventKey::StepChange,
            TourEvent::ActionCompleted { .. } => EventKey::ActionCompleted,
            TourEvent::Complete { .. } => EventKey::Complete,
            TourEvent::Close { .. } => EventKey::Close,
            TourEvent::Custom { name, .. } => EventKey::from(name),
        }
    }

    /// Custom payload, if any
    pub fn data(&self) -> Option<&Value> {
        match self {
            TourEvent::Custom { data, .. } => data.as_ref(),
            _ => None,
        }
    }
}
