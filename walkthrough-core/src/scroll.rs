//! Scroll coordination
//!
//! Decides whether the viewport has to move so that a step's target, and
//! later the popover describing it, stay visible with some breathing room.
//! The policy lives in two pure functions; [`ScrollCoordinator`] applies it
//! to a [`Viewport`].

use std::sync::Arc;

use tracing::debug;

use crate::config::EngineSettings;
use crate::geometry::Rect;
use crate::step::Placement;

/// How a scroll request should move the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// The scrollable viewport of the host page
pub trait Viewport: Send + Sync {
    /// Visible height in pixels
    fn height(&self) -> f64;
    /// Current vertical scroll offset
    fn scroll_y(&self) -> f64;
    /// Request a scroll to the absolute offset `y`
    fn scroll_to(&self, y: f64, behavior: ScrollBehavior);
}

/// Viewport that never scrolls, for hosts without one
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport {
    pub height: f64,
}

impl Viewport for FixedViewport {
    fn height(&self) -> f64 {
        self.height
    }

    fn scroll_y(&self) -> f64 {
        0.0
    }

    fn scroll_to(&self, _y: f64, _behavior: ScrollBehavior) {}
}

/// Scroll offset needed to keep a target visible, if any.
///
/// - `Top`: keep at least `target_margin` above the target
/// - `Bottom`: keep at least `target_margin` below the target
/// - `Left` / `Right`: re-center once the target drifts more than
///   `center_tolerance` from the viewport's vertical center
/// - `Center`: never scroll
pub fn plan_target_scroll(
    rect: Rect,
    placement: Placement,
    viewport_height: f64,
    scroll_y: f64,
    settings: &EngineSettings,
) -> Option<f64> {
    let margin = settings.target_margin;
    let delta = match placement {
        Placement::Top if rect.top() < margin => rect.top() - margin,
        Placement::Bottom if rect.bottom() > viewport_height - margin => {
            rect.bottom() - (viewport_height - margin)
        }
        Placement::Left | Placement::Right => {
            let offset = rect.center_y() - viewport_height / 2.0;
            if offset.abs() > settings.center_tolerance {
                offset
            } else {
                return None;
            }
        }
        _ => return None,
    };
    Some((scroll_y + delta).max(0.0))
}

/// Scroll offset needed to keep a rendered popover inside the viewport.
///
/// A popover taller than the viewport is aligned to its top edge.
pub fn plan_popover_scroll(
    rect: Rect,
    viewport_height: f64,
    scroll_y: f64,
    margin: f64,
) -> Option<f64> {
    let delta = if rect.top() < margin {
        rect.top() - margin
    } else if rect.bottom() > viewport_height - margin {
        (rect.bottom() - (viewport_height - margin)).min(rect.top() - margin)
    } else {
        return None;
    };
    Some((scroll_y + delta).max(0.0))
}

/// Issues smooth scroll requests according to the placement policy
#[derive(Clone)]
pub struct ScrollCoordinator {
    viewport: Arc<dyn Viewport>,
    settings: EngineSettings,
}

impl std::fmt::Debug for ScrollCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollCoordinator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ScrollCoordinator {
    pub fn new(viewport: Arc<dyn Viewport>, settings: EngineSettings) -> Self {
        Self { viewport, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Scroll so the target stays clear of the viewport edge.
    ///
    /// Returns `true` if a scroll was requested; the caller is expected to
    /// re-measure the target once the motion settles.
    pub fn scroll_target_into_view(&self, rect: Rect, placement: Placement) -> bool {
        let height = self.viewport.height();
        let current = self.viewport.scroll_y();
        match plan_target_scroll(rect, placement, height, current, &self.settings) {
            Some(y) if (y - current).abs() > f64::EPSILON => {
                debug!(?placement, from = current, to = y, "scrolling target into view");
                self.viewport.scroll_to(y, ScrollBehavior::Smooth);
                true
            }
            _ => false,
        }
    }

    /// Scroll so the rendered popover stays inside the viewport.
    pub fn scroll_popover_into_view(&self, popover: Rect) -> bool {
        let height = self.viewport.height();
        let current = self.viewport.scroll_y();
        match plan_popover_scroll(popover, height, current, self.settings.popover_margin) {
            Some(y) if (y - current).abs() > f64::EPSILON => {
                debug!(from = current, to = y, "scrolling popover into view");
                self.viewport.scroll_to(y, ScrollBehavior::Smooth);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeViewport;

    const VH: f64 = 800.0;

    fn plan(rect: Rect, placement: Placement, scroll_y: f64) -> Option<f64> {
        plan_target_scroll(rect, placement, VH, scroll_y, &EngineSettings::default())
    }

    #[test]
    fn test_top_placement() {
        // 100px from the top: needs 50px more room
        assert_eq!(plan(Rect::new(0.0, 100.0, 50.0, 40.0), Placement::Top, 500.0), Some(450.0));
        // Already 150px clear
        assert_eq!(plan(Rect::new(0.0, 150.0, 50.0, 40.0), Placement::Top, 500.0), None);
        // Never scrolls above the page
        assert_eq!(plan(Rect::new(0.0, 10.0, 50.0, 40.0), Placement::Top, 20.0), Some(0.0));
    }

    #[test]
    fn test_bottom_placement() {
        // Bottom edge at 700, limit is 650
        assert_eq!(plan(Rect::new(0.0, 660.0, 50.0, 40.0), Placement::Bottom, 0.0), Some(50.0));
        assert_eq!(plan(Rect::new(0.0, 600.0, 50.0, 50.0), Placement::Bottom, 0.0), None);
    }

    #[test]
    fn test_side_placement_recenters() {
        // Center at 620, viewport center at 400
        assert_eq!(plan(Rect::new(0.0, 600.0, 50.0, 40.0), Placement::Left, 100.0), Some(320.0));
        // Within tolerance
        assert_eq!(plan(Rect::new(0.0, 450.0, 50.0, 40.0), Placement::Right, 100.0), None);
        // Above center
        assert_eq!(plan(Rect::new(0.0, 0.0, 50.0, 40.0), Placement::Right, 1000.0), Some(620.0));
    }

    #[test]
    fn test_center_placement_never_scrolls() {
        assert_eq!(plan(Rect::new(0.0, -500.0, 50.0, 40.0), Placement::Center, 900.0), None);
    }

    #[test]
    fn test_popover_plan() {
        let popover = |y: f64, height: f64, scroll_y: f64| {
            plan_popover_scroll(Rect::new(0.0, y, 200.0, height), VH, scroll_y, 20.0)
        };

        assert_eq!(popover(5.0, 100.0, 300.0), Some(285.0));
        assert_eq!(popover(750.0, 100.0, 0.0), Some(70.0));
        assert_eq!(popover(300.0, 100.0, 0.0), None);
        // Taller than the viewport: align the top
        assert_eq!(popover(100.0, 1000.0, 0.0), Some(80.0));
    }

    #[test]
    fn test_coordinator_issues_smooth_scroll() {
        let viewport = Arc::new(FakeViewport::new(VH));
        viewport.set_scroll_y(500.0);
        let scroll = ScrollCoordinator::new(viewport.clone(), EngineSettings::default());

        assert!(scroll.scroll_target_into_view(Rect::new(0.0, 100.0, 10.0, 10.0), Placement::Top));
        assert_eq!(viewport.requests(), vec![(450.0, ScrollBehavior::Smooth)]);

        assert!(!scroll.scroll_target_into_view(Rect::new(0.0, 300.0, 10.0, 10.0), Placement::Top));
        assert_eq!(viewport.requests().len(), 1);
    }

    #[test]
    fn test_coordinator_popover() {
        let viewport = Arc::new(FakeViewport::new(VH));
        viewport.set_scroll_y(100.0);
        let scroll = ScrollCoordinator::new(viewport.clone(), EngineSettings::default());

        assert!(scroll.scroll_popover_into_view(Rect::new(0.0, 790.0, 100.0, 60.0)));
        assert_eq!(viewport.requests(), vec![(170.0, ScrollBehavior::Smooth)]);
    }
}
