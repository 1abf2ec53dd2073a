//! Interface to the presentation layer
//!
//! The overlay and popover are rendered elsewhere. This module turns engine
//! state into the props they render from, and names the intents they send
//! back. Popover positioning (flips, clamping) stays with the renderer.

use bitflags::bitflags;

use crate::config::{EngineSettings, TutorialConfig};
use crate::engine::TutorialState;
use crate::geometry::Rect;
use crate::step::Placement;

bitflags! {
    /// What the popover may offer for the current step
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NavFlags: u8 {
        const NEXT = 1 << 0;
        const PREVIOUS = 1 << 1;
        const CLOSE = 1 << 2;
        /// Last step, ready to finish
        const COMPLETE = 1 << 3;
        const PROGRESS = 1 << 4;
        /// Overlay swallows pointer input outside the target
        const BLOCKING = 1 << 5;
    }
}

/// User intent forwarded by the overlay or popover
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Next,
    Previous,
    SkipTo(String),
    Close,
    Complete,
    /// Click on the dimmed area outside the spotlight
    BackgroundClicked,
}

/// Props for the full-viewport dimming layer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayProps {
    pub active: bool,
    /// Cut-out: the target rect grown by the spotlight padding
    pub spotlight: Option<Rect>,
    pub radius: f64,
    pub blocking: bool,
}

/// A step the popover offers to jump to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipTarget {
    pub id: String,
    pub title: String,
}

/// Props for the popover of the current step
#[derive(Debug, Clone, PartialEq)]
pub struct PopoverProps {
    pub step_id: String,
    pub title: String,
    /// Rendered unescaped
    pub description: String,
    /// `Center` whenever there is no target rect to anchor to
    pub placement: Placement,
    pub target_rect: Option<Rect>,
    pub flags: NavFlags,
    pub progress: f64,
    /// e.g. "2 / 4"
    pub position_label: String,
    pub skip_targets: Vec<SkipTarget>,
    pub popover_class: Option<String>,
}

pub trait OverlayRenderer {
    fn render_overlay(&mut self, props: &OverlayProps);
}

pub trait PopoverRenderer {
    /// `None` hides the popover
    fn render_popover(&mut self, props: Option<&PopoverProps>);
}

pub fn build_overlay_props(state: &TutorialState, settings: &EngineSettings) -> OverlayProps {
    OverlayProps {
        active: state.is_active,
        spotlight: state
            .target_rect
            .map(|rect| rect.inflate(settings.spotlight_padding)),
        radius: settings.spotlight_radius,
        blocking: state
            .current_step
            .as_ref()
            .is_some_and(|step| step.block_interactions),
    }
}

pub fn build_popover_props(config: &TutorialConfig, state: &TutorialState) -> Option<PopoverProps> {
    let step = state.current_step.as_ref()?;
    let index = state.current_step_index?;

    let mut flags = NavFlags::empty();
    flags.set(NavFlags::NEXT, state.can_go_next());
    flags.set(NavFlags::PREVIOUS, state.can_go_previous());
    flags.set(NavFlags::CLOSE, config.allow_close);
    flags.set(
        NavFlags::COMPLETE,
        state.is_last_step() && !state.is_waiting_for_action,
    );
    flags.set(NavFlags::PROGRESS, config.show_progress);
    flags.set(NavFlags::BLOCKING, step.block_interactions);

    let skip_targets = step
        .allow_skip_to
        .iter()
        .filter_map(|id| {
            config.steps.iter().find(|s| &s.id == id).map(|s| SkipTarget {
                id: s.id.clone(),
                title: s.title.clone(),
            })
        })
        .collect();

    Some(PopoverProps {
        step_id: step.id.clone(),
        title: step.title.clone(),
        description: step.description.clone(),
        placement: if state.target_rect.is_some() {
            step.placement
        } else {
            Placement::Center
        },
        target_rect: state.target_rect,
        flags,
        progress: state.progress(),
        position_label: format!("{} / {}", index + 1, state.total_steps),
        skip_targets,
        popover_class: step.popover_class.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{TutorialStep, WaitForAction};

    fn config() -> TutorialConfig {
        TutorialConfig::new(
            "t",
            vec![
                TutorialStep::new("a", "Intro", "d")
                    .target("#a")
                    .placement(Placement::Right)
                    .allow_skip_to(["c", "missing"]),
                TutorialStep::new("b", "Middle", "d").block_interactions(true),
                TutorialStep::new("c", "Finish", "d").wait_for(WaitForAction::new("done")),
            ],
        )
    }

    fn state_at(config: &TutorialConfig, index: usize) -> TutorialState {
        TutorialState {
            is_active: true,
            current_step_index: Some(index),
            current_step: Some(config.steps[index].clone()),
            total_steps: config.steps.len(),
            is_waiting_for_action: false,
            target_rect: None,
        }
    }

    #[test]
    fn test_overlay_inactive() {
        let props = build_overlay_props(&TutorialState::default(), &EngineSettings::default());
        assert!(!props.active);
        assert!(props.spotlight.is_none());
        assert!(!props.blocking);
    }

    #[test]
    fn test_overlay_spotlight_is_padded() {
        let config = config();
        let mut state = state_at(&config, 1);
        state.target_rect = Some(Rect::new(100.0, 100.0, 50.0, 20.0));

        let props = build_overlay_props(&state, &EngineSettings::default());
        assert_eq!(props.spotlight, Some(Rect::new(92.0, 92.0, 66.0, 36.0)));
        assert_eq!(props.radius, 8.0);
        assert!(props.blocking);
    }

    #[test]
    fn test_popover_first_step() {
        let config = config();
        let mut state = state_at(&config, 0);
        state.target_rect = Some(Rect::new(0.0, 0.0, 10.0, 10.0));

        let props = build_popover_props(&config, &state).unwrap();
        assert_eq!(props.placement, Placement::Right);
        assert_eq!(props.position_label, "1 / 3");
        assert_eq!(
            props.flags,
            NavFlags::NEXT | NavFlags::CLOSE | NavFlags::PROGRESS
        );
        assert_eq!(
            props.skip_targets,
            vec![SkipTarget {
                id: "c".into(),
                title: "Finish".into()
            }]
        );
    }

    #[test]
    fn test_popover_unresolved_target_is_centered() {
        let config = config();
        let props = build_popover_props(&config, &state_at(&config, 0)).unwrap();
        assert_eq!(props.placement, Placement::Center);
    }

    #[test]
    fn test_popover_last_step_gated() {
        let config = config().show_progress(false).allow_close(false);
        let mut state = state_at(&config, 2);
        state.is_waiting_for_action = true;

        let props = build_popover_props(&config, &state).unwrap();
        assert_eq!(props.flags, NavFlags::PREVIOUS);

        state.is_waiting_for_action = false;
        let props = build_popover_props(&config, &state).unwrap();
        assert_eq!(props.flags, NavFlags::PREVIOUS | NavFlags::COMPLETE);
        assert_eq!(props.progress, 100.0);
    }

    #[test]
    fn test_popover_none_when_inactive() {
        assert!(build_popover_props(&config(), &TutorialState::default()).is_none());
    }
}
