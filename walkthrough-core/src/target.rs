//! Target lookup and render pacing

use crate::geometry::Rect;
use crate::step::BoxFuture;

/// Resolves step selectors against the live document.
///
/// Implementations must not cache across calls: the document may have
/// changed between two lookups.
pub trait TargetResolver: Send + Sync {
    /// Current viewport-relative bounding box of the element matching
    /// `selector`, or `None` if nothing matches.
    fn resolve_rect(&self, selector: &str) -> Option<Rect>;
}

impl<F> TargetResolver for F
where
    F: Fn(&str) -> Option<Rect> + Send + Sync,
{
    fn resolve_rect(&self, selector: &str) -> Option<Rect> {
        self(selector)
    }
}

/// Resolver for hosts without a document; every target is unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTargets;

impl TargetResolver for NoTargets {
    fn resolve_rect(&self, _selector: &str) -> Option<Rect> {
        None
    }
}

/// Yield point awaited once per step transition so the UI reflects the new
/// step before its target is measured.
pub trait FramePacer: Send + Sync {
    fn next_frame(&self) -> BoxFuture<'static, ()>;
}

/// Pacer that yields once to the tokio scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldFrame;

impl FramePacer for YieldFrame {
    fn next_frame(&self) -> BoxFuture<'static, ()> {
        Box::pin(tokio::task::yield_now())
    }
}
