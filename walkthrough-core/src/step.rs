//! Tutorial steps

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HookError;

/// Boxed future returned by hooks and frame pacers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Side of the target the popover should sit on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    Center,
}

/// Gate on forward navigation until an event fires or the timeout elapses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitForAction {
    /// Bus event that satisfies the gate
    pub event: String,
    /// Milliseconds after which the gate clears by itself
    #[serde(default, rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl WaitForAction {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            timeout_ms: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Async callback run when a step is entered or left.
///
/// The engine awaits it before proceeding with the transition.
#[derive(Clone)]
pub struct StepHook(Arc<dyn Fn() -> BoxFuture<'static, Result<(), HookError>> + Send + Sync>);

impl StepHook {
    /// Wrap an async closure
    ///
    /// ```ignore
    /// let hook = StepHook::new(|| async {
    ///     open_sidebar().await;
    ///     Ok(())
    /// });
    /// ```
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        Self(Arc::new(move || -> BoxFuture<'static, Result<(), HookError>> {
            Box::pin(f())
        }))
    }

    /// Wrap a synchronous closure
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn() -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self(Arc::new(move || -> BoxFuture<'static, Result<(), HookError>> {
            let result = f();
            Box::pin(async move { result })
        }))
    }

    pub fn call(&self) -> BoxFuture<'static, Result<(), HookError>> {
        (self.0)()
    }
}

impl fmt::Debug for StepHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StepHook")
    }
}

/// One screen of a tour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialStep {
    /// Unique within its config
    pub id: String,
    /// Selector of the element to highlight; none means a centered step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub title: String,
    /// May contain markup; the presentation layer renders it unescaped, so
    /// it must never carry untrusted content.
    pub description: String,
    #[serde(default)]
    pub placement: Placement,
    /// Overlay captures all pointer input except on the target
    #[serde(default)]
    pub block_interactions: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_action: Option<WaitForAction>,
    /// Step ids offered as direct jump targets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow_skip_to: Vec<String>,
    #[serde(skip)]
    pub on_enter: Option<StepHook>,
    #[serde(skip)]
    pub on_exit: Option<StepHook>,
    /// Styling hook for the popover, opaque to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popover_class: Option<String>,
}

impl TutorialStep {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn target(mut self, selector: impl Into<String>) -> Self {
        self.target = Some(selector.into());
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn block_interactions(mut self, block: bool) -> Self {
        self.block_interactions = block;
        self
    }

    pub fn wait_for(mut self, gate: WaitForAction) -> Self {
        self.wait_for_action = Some(gate);
        self
    }

    pub fn allow_skip_to<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_skip_to = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_enter(mut self, hook: StepHook) -> Self {
        self.on_enter = Some(hook);
        self
    }

    pub fn on_exit(mut self, hook: StepHook) -> Self {
        self.on_exit = Some(hook);
        self
    }

    pub fn popover_class(mut self, class: impl Into<String>) -> Self {
        self.popover_class = Some(class.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_defaults_from_json() {
        let step: TutorialStep = serde_json::from_str(
            r#"{ "id": "intro", "title": "Welcome", "description": "<b>hi</b>" }"#,
        )
        .unwrap();

        assert_eq!(step.id, "intro");
        assert_eq!(step.placement, Placement::Bottom);
        assert!(step.target.is_none());
        assert!(!step.block_interactions);
        assert!(step.wait_for_action.is_none());
        assert!(step.allow_skip_to.is_empty());
    }

    #[test]
    fn test_step_full_json() {
        let step: TutorialStep = serde_json::from_str(
            r##"{
                "id": "create",
                "target": "#new-project",
                "title": "Create",
                "description": "Click the button",
                "placement": "right",
                "blockInteractions": true,
                "waitForAction": { "event": "project:created", "timeout": 5000 },
                "allowSkipTo": ["finish"],
                "popoverClass": "wide"
            }"##,
        )
        .unwrap();

        assert_eq!(step.target.as_deref(), Some("#new-project"));
        assert_eq!(step.placement, Placement::Right);
        assert!(step.block_interactions);
        let gate = step.wait_for_action.unwrap();
        assert_eq!(gate.event, "project:created");
        assert_eq!(gate.timeout(), Some(Duration::from_millis(5000)));
        assert_eq!(step.allow_skip_to, vec!["finish".to_string()]);
        assert_eq!(step.popover_class.as_deref(), Some("wide"));
    }

    #[test]
    fn test_builder() {
        let step = TutorialStep::new("a", "A", "d")
            .target(".toolbar")
            .placement(Placement::Top)
            .wait_for(WaitForAction::new("clicked").with_timeout(Duration::from_secs(2)));

        assert_eq!(step.target.as_deref(), Some(".toolbar"));
        assert_eq!(step.placement, Placement::Top);
        assert_eq!(step.wait_for_action.unwrap().timeout_ms, Some(2000));
    }

    #[tokio::test]
    async fn test_hooks_are_awaitable() {
        let ok = StepHook::new(|| async { Ok(()) });
        assert!(ok.call().await.is_ok());

        let failing = StepHook::sync(|| Err("nope".into()));
        let err = failing.call().await.unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
