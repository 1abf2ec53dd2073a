//! Test utilities for walkthrough hosts
//!
//! This module provides stand-ins for the browser-side collaborators so a
//! tour can be driven without a document:
//!
//! - [`FakeDom`]: selector -> rectangle table implementing [`TargetResolver`]
//! - [`FakeViewport`]: records scroll requests and applies them instantly
//! - [`ImmediateFrame`]: frame pacer that never waits
//! - [`EventRecorder`]: captures bus events for assertions
//!
//! # Example
//!
//! ```ignore
//! use walkthrough::testing::{EventRecorder, FakeDom, ImmediateFrame};
//!
//! let dom = Arc::new(FakeDom::new());
//! dom.insert("#save", Rect::new(10.0, 10.0, 80.0, 24.0));
//!
//! let engine = Engine::builder()
//!     .resolver(dom.clone())
//!     .pacer(Arc::new(ImmediateFrame))
//!     .build();
//! let recorder = EventRecorder::attach(engine.bus(), [EventKey::StepChange]);
//!
//! engine.start(config).await?;
//! assert_eq!(recorder.keys(), vec!["tutorial:step-change"]);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::bus::{handler, EventBus, Handler};
use crate::event::{EventKey, TourEvent};
use crate::geometry::Rect;
use crate::scroll::{ScrollBehavior, Viewport};
use crate::step::BoxFuture;
use crate::target::{FramePacer, TargetResolver};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory document: selectors map straight to rectangles.
#[derive(Debug, Default)]
pub struct FakeDom {
    elements: Mutex<HashMap<String, Rect>>,
    lookups: AtomicUsize,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or move an element
    pub fn insert(&self, selector: impl Into<String>, rect: Rect) {
        lock(&self.elements).insert(selector.into(), rect);
    }

    /// Remove an element
    pub fn remove(&self, selector: &str) {
        lock(&self.elements).remove(selector);
    }

    /// Number of `resolve_rect` calls so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl TargetResolver for FakeDom {
    fn resolve_rect(&self, selector: &str) -> Option<Rect> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        lock(&self.elements).get(selector).copied()
    }
}

/// Viewport that records every scroll request and jumps to it instantly.
#[derive(Debug)]
pub struct FakeViewport {
    height: f64,
    scroll_y: Mutex<f64>,
    requests: Mutex<Vec<(f64, ScrollBehavior)>>,
}

impl FakeViewport {
    pub fn new(height: f64) -> Self {
        Self {
            height,
            scroll_y: Mutex::new(0.0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn set_scroll_y(&self, y: f64) {
        *lock(&self.scroll_y) = y;
    }

    /// All scroll requests, oldest first
    pub fn requests(&self) -> Vec<(f64, ScrollBehavior)> {
        lock(&self.requests).clone()
    }

    /// Offset of the most recent scroll request
    pub fn last_request(&self) -> Option<f64> {
        lock(&self.requests).last().map(|(y, _)| *y)
    }
}

impl Viewport for FakeViewport {
    fn height(&self) -> f64 {
        self.height
    }

    fn scroll_y(&self) -> f64 {
        *lock(&self.scroll_y)
    }

    fn scroll_to(&self, y: f64, behavior: ScrollBehavior) {
        lock(&self.requests).push((y, behavior));
        *lock(&self.scroll_y) = y;
    }
}

/// Frame pacer that resolves immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateFrame;

impl FramePacer for ImmediateFrame {
    fn next_frame(&self) -> BoxFuture<'static, ()> {
        Box::pin(std::future::ready(()))
    }
}

/// Records events published on a bus.
///
/// Subscriptions are removed when the recorder is dropped.
pub struct EventRecorder {
    bus: Arc<EventBus>,
    keys: Vec<EventKey>,
    handler: Handler,
    events: Arc<Mutex<Vec<TourEvent>>>,
}

impl EventRecorder {
    /// Subscribe to `keys` on `bus`
    pub fn attach<I, K>(bus: &Arc<EventBus>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<EventKey>,
    {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let record = handler(move |event| lock(&sink).push(event.clone()));

        let keys: Vec<EventKey> = keys.into_iter().map(Into::into).collect();
        for key in &keys {
            bus.subscribe(key.clone(), record.clone());
        }

        Self {
            bus: bus.clone(),
            keys,
            handler: record,
            events,
        }
    }

    /// Recorded events, oldest first
    pub fn events(&self) -> Vec<TourEvent> {
        lock(&self.events).clone()
    }

    /// Wire names of the recorded events
    pub fn keys(&self) -> Vec<String> {
        lock(&self.events)
            .iter()
            .map(|event| event.key().to_string())
            .collect()
    }

    /// Drain recorded events
    pub fn take(&self) -> Vec<TourEvent> {
        std::mem::take(&mut *lock(&self.events))
    }
}

impl Drop for EventRecorder {
    fn drop(&mut self) {
        for key in &self.keys {
            self.bus.unsubscribe(key.clone(), &self.handler);
        }
    }
}
