//! Tour configuration, validation and engine settings

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TourError;
use crate::step::TutorialStep;

/// Synchronous callback fired when a tour completes or closes
#[derive(Clone)]
pub struct CompletionHook(Arc<dyn Fn() + Send + Sync>);

impl CompletionHook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for CompletionHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionHook")
    }
}

fn default_true() -> bool {
    true
}

/// One tour: an ordered list of steps plus tour-level options
///
/// # Example
///
/// ```
/// use walkthrough_core::config::TutorialConfig;
///
/// let config = TutorialConfig::from_json(r#"{
///     "id": "onboarding",
///     "steps": [
///         { "id": "a", "title": "A", "description": "first" },
///         { "id": "b", "title": "B", "description": "second" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(config.steps.len(), 2);
/// assert!(config.show_progress);
/// assert_eq!(config.step_index("b"), Some(1));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialConfig {
    /// Unique tour id, also the persistence key
    pub id: String,
    pub steps: Vec<TutorialStep>,
    #[serde(default = "default_true")]
    pub show_progress: bool,
    #[serde(default = "default_true")]
    pub allow_close: bool,
    #[serde(skip)]
    pub on_complete: Option<CompletionHook>,
    #[serde(skip)]
    pub on_close: Option<CompletionHook>,
}

impl TutorialConfig {
    pub fn new(id: impl Into<String>, steps: Vec<TutorialStep>) -> Self {
        Self {
            id: id.into(),
            steps,
            show_progress: true,
            allow_close: true,
            on_complete: None,
            on_close: None,
        }
    }

    /// Parse a config from JSON. Hooks are attached afterwards.
    pub fn from_json(json: &str) -> Result<Self, TourError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn allow_close(mut self, allow: bool) -> Self {
        self.allow_close = allow;
        self
    }

    pub fn on_complete(mut self, hook: CompletionHook) -> Self {
        self.on_complete = Some(hook);
        self
    }

    pub fn on_close(mut self, hook: CompletionHook) -> Self {
        self.on_close = Some(hook);
        self
    }

    /// Position of the step with the given id
    pub fn step_index(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    /// Check the config can be started.
    ///
    /// Hard problems are returned as [`TourError::InvalidConfig`]; soft ones
    /// are logged and returned as warnings.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, TourError> {
        if self.id.is_empty() {
            return Err(TourError::InvalidConfig("tour id is empty".into()));
        }
        if self.steps.is_empty() {
            return Err(TourError::InvalidConfig(format!(
                "tour `{}` has no steps",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(TourError::InvalidConfig(format!(
                    "tour `{}` has duplicate step id `{}`",
                    self.id, step.id
                )));
            }
        }

        let mut warnings = Vec::new();
        for step in &self.steps {
            if let Some(gate) = &step.wait_for_action {
                if step.target.is_none() && gate.timeout_ms.is_none() {
                    warnings.push(ConfigWarning::UnescapableGate {
                        step_id: step.id.clone(),
                        event: gate.event.clone(),
                    });
                }
            }
            for skip in &step.allow_skip_to {
                if !seen.contains(skip.as_str()) {
                    warnings.push(ConfigWarning::UnknownSkipTarget {
                        step_id: step.id.clone(),
                        target: skip.clone(),
                    });
                }
            }
        }

        for warning in &warnings {
            warn!(tour = %self.id, "{warning}");
        }
        Ok(warnings)
    }
}

/// Non-fatal config problems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Gate with neither a target to act on nor a timeout; only close or
    /// skip can leave the step
    UnescapableGate { step_id: String, event: String },
    /// `allowSkipTo` names a step that does not exist
    UnknownSkipTarget { step_id: String, target: String },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::UnescapableGate { step_id, event } => write!(
                f,
                "step `{step_id}` waits for `{event}` without a target or timeout"
            ),
            ConfigWarning::UnknownSkipTarget { step_id, target } => {
                write!(f, "step `{step_id}` allows skipping to unknown step `{target}`")
            }
        }
    }
}

/// Engine tuning
///
/// Every field has a default, so a partial JSON object is enough:
///
/// ```
/// use walkthrough_core::config::EngineSettings;
///
/// let settings = EngineSettings::from_json(r#"{ "targetMargin": 200 }"#).unwrap();
/// assert_eq!(settings.target_margin, 200.0);
/// assert_eq!(settings.popover_margin, 20.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// Gap kept between a top/bottom placed target and the viewport edge
    pub target_margin: f64,
    /// Gap kept between the popover and the viewport edge
    pub popover_margin: f64,
    /// Allowed distance of a left/right placed target from the viewport center
    pub center_tolerance: f64,
    /// Delay before re-measuring the target after a smooth scroll
    pub scroll_settle_ms: u64,
    /// Delay before checking the popover after the target rect changed
    pub popover_settle_ms: u64,
    /// Spotlight cut-out padding around the target
    pub spotlight_padding: f64,
    /// Spotlight corner radius
    pub spotlight_radius: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            target_margin: 150.0,
            popover_margin: 20.0,
            center_tolerance: 100.0,
            scroll_settle_ms: 350,
            popover_settle_ms: 400,
            spotlight_padding: 8.0,
            spotlight_radius: 8.0,
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> Result<Self, TourError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn popover_settle(&self) -> Duration {
        Duration::from_millis(self.popover_settle_ms)
    }
}
