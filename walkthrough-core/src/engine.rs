//! Tutorial engine
//!
//! Owns the active tour, the current step, the wait-for-action gate and the
//! cached target rectangle. Navigation operations are async because step
//! hooks and the frame pacer are awaited; everything else is synchronous.
//!
//! # Example
//!
//! ```ignore
//! use walkthrough_core::prelude::*;
//!
//! let engine = Engine::builder()
//!     .resolver(dom.clone())
//!     .viewport(viewport.clone())
//!     .store(Arc::new(MemoryStore::new()))
//!     .build();
//!
//! engine.start(TutorialConfig::from_json(TOUR)?).await?;
//! engine.next().await?;
//!
//! // Host code satisfies a gated step
//! engine.trigger_action("project:created", None);
//! ```
//!
//! # Concurrency
//!
//! Every transition takes a ticket. After each await point it checks the
//! ticket is still current; a `close`, a new `start` or a newer navigation
//! call invalidates it and the stale transition stops without touching
//! state. The latest navigation wins.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::bus::{handler, EventBus, Handler};
use crate::config::{CompletionHook, EngineSettings, TutorialConfig};
use crate::error::{HookPhase, TourError};
use crate::event::{EventKey, TourEvent};
use crate::geometry::Rect;
use crate::presentation::{
    build_overlay_props, build_popover_props, Intent, OverlayProps, OverlayRenderer,
    PopoverProps, PopoverRenderer,
};
use crate::scroll::{ScrollCoordinator, Viewport};
use crate::step::{TutorialStep, WaitForAction};
use crate::storage::{CompletionStore, MemoryStore};
use crate::target::{FramePacer, NoTargets, TargetResolver, YieldFrame};
use crate::timers::{TimerKey, TimerSet};

const GATE_TIMEOUT: &str = "gate-timeout";
const TARGET_SETTLE: &str = "target-settle";
const POPOVER_SCROLL: &str = "popover-scroll";

/// Measures the rendered popover, supplied by the presentation layer
pub type PopoverMeasure = Arc<dyn Fn() -> Option<Rect> + Send + Sync>;

/// Read-only snapshot of the engine
///
/// `current_step` is `steps[current_step_index]` when an index is set;
/// an inactive engine has neither.
#[derive(Debug, Clone, Default)]
pub struct TutorialState {
    pub is_active: bool,
    pub current_step_index: Option<usize>,
    pub current_step: Option<TutorialStep>,
    pub total_steps: usize,
    pub is_waiting_for_action: bool,
    pub target_rect: Option<Rect>,
}

impl TutorialState {
    /// Percentage of the tour reached, counting the current step
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        let reached = self.current_step_index.map(|i| i + 1).unwrap_or(0);
        reached as f64 / self.total_steps as f64 * 100.0
    }

    pub fn can_go_next(&self) -> bool {
        !self.is_waiting_for_action
            && self
                .current_step_index
                .is_some_and(|i| i + 1 < self.total_steps)
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_step_index.is_some_and(|i| i > 0)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step_index
            .is_some_and(|i| i + 1 == self.total_steps)
    }
}

/// Identifies one transition of one tour session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    session: u64,
    transition: u64,
}

/// Outstanding wait-for-action subscription
struct Gate {
    id: u64,
    key: EventKey,
    handler: Handler,
}

#[derive(Debug, Clone, Copy)]
enum GateOutcome {
    Action,
    Timeout,
}

#[derive(Default)]
struct Inner {
    config: Option<Arc<TutorialConfig>>,
    index: Option<usize>,
    waiting: bool,
    target_rect: Option<Rect>,
    gate: Option<Gate>,
    closing: bool,
    session: u64,
    transition: u64,
    gate_seq: u64,
    timers: TimerSet,
    popover: Option<PopoverMeasure>,
}

impl Inner {
    fn ticket(&self) -> Ticket {
        Ticket {
            session: self.session,
            transition: self.transition,
        }
    }

    fn holds(&self, ticket: Ticket) -> bool {
        !self.closing && self.ticket() == ticket
    }

    fn current_step(&self) -> Option<&TutorialStep> {
        let config = self.config.as_ref()?;
        config.steps.get(self.index?)
    }

    fn snapshot(&self) -> TutorialState {
        TutorialState {
            is_active: self.config.is_some(),
            current_step_index: self.index,
            current_step: self.current_step().cloned(),
            total_steps: self.config.as_ref().map(|c| c.steps.len()).unwrap_or(0),
            is_waiting_for_action: self.waiting,
            target_rect: self.target_rect,
        }
    }

    /// Drop the wait-for-action subscription and its timeout.
    fn release_gate(&mut self, bus: &EventBus) {
        if let Some(gate) = self.gate.take() {
            bus.unsubscribe(gate.key, &gate.handler);
        }
        self.timers.cancel(&TimerKey::from(GATE_TIMEOUT));
        self.waiting = false;
    }

    fn reset(&mut self) {
        self.config = None;
        self.index = None;
        self.waiting = false;
        self.target_rect = None;
        self.closing = false;
    }
}

struct Shared {
    inner: Mutex<Inner>,
    bus: Arc<EventBus>,
    store: Arc<dyn CompletionStore>,
    resolver: Arc<dyn TargetResolver>,
    scroll: Option<ScrollCoordinator>,
    pacer: Arc<dyn FramePacer>,
    settings: EngineSettings,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(gate) = inner.gate.take() {
            self.bus.unsubscribe(gate.key, &gate.handler);
        }
        inner.timers.cancel_all();
    }
}

/// Run a tour-level hook; a panic is logged and does not abort teardown.
fn run_completion_hook(hook: &CompletionHook, tour_id: &str, name: &str) {
    if catch_unwind(AssertUnwindSafe(|| hook.call())).is_err() {
        warn!(tour = tour_id, hook = name, "tour hook panicked");
    }
}

/// Builder for [`Engine`]
///
/// Every collaborator has a default: a private bus, an in-memory store, no
/// resolvable targets, no scrolling and a tokio yield as the frame pacer.
pub struct EngineBuilder {
    bus: Option<Arc<EventBus>>,
    store: Option<Arc<dyn CompletionStore>>,
    resolver: Option<Arc<dyn TargetResolver>>,
    viewport: Option<Arc<dyn Viewport>>,
    pacer: Option<Arc<dyn FramePacer>>,
    settings: EngineSettings,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            bus: None,
            store: None,
            resolver: None,
            viewport: None,
            pacer: None,
            settings: EngineSettings::default(),
        }
    }

    /// Share a bus with host code or other engines
    pub fn bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn store(mut self, store: Arc<dyn CompletionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn TargetResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn viewport(mut self, viewport: Arc<dyn Viewport>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn pacer(mut self, pacer: Arc<dyn FramePacer>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Engine {
        let settings = self.settings;
        let scroll = self
            .viewport
            .map(|viewport| ScrollCoordinator::new(viewport, settings.clone()));
        Engine {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                bus: self.bus.unwrap_or_default(),
                store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
                resolver: self.resolver.unwrap_or_else(|| Arc::new(NoTargets)),
                scroll,
                pacer: self.pacer.unwrap_or_else(|| Arc::new(YieldFrame)),
                settings,
            }),
        }
    }
}

/// Handle to a tutorial engine
///
/// Cloning is cheap and every clone drives the same engine. The engine holds
/// at most one active tour.
///
/// Gate timeouts and scroll settling are tokio timers. Driven outside a tokio
/// runtime the engine still navigates, but a `WaitForAction` timeout never
/// fires: such a gate clears only through its event, `close` or a jump.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with default collaborators
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    fn from_weak(shared: &Weak<Shared>) -> Option<Self> {
        shared.upgrade().map(|shared| Self { shared })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn holds(&self, ticket: Ticket) -> bool {
        self.lock().holds(ticket)
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.shared.bus
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.shared.settings
    }

    // ===== Derived state =====

    pub fn state(&self) -> TutorialState {
        self.lock().snapshot()
    }

    /// The active tour, if any
    pub fn config(&self) -> Option<Arc<TutorialConfig>> {
        self.lock().config.clone()
    }

    pub fn is_active(&self) -> bool {
        self.lock().config.is_some()
    }

    pub fn progress(&self) -> f64 {
        self.state().progress()
    }

    pub fn can_go_next(&self) -> bool {
        self.state().can_go_next()
    }

    pub fn can_go_previous(&self) -> bool {
        self.state().can_go_previous()
    }

    pub fn is_last_step(&self) -> bool {
        self.state().is_last_step()
    }

    // ===== Lifecycle =====

    /// Start a tour, replacing any active one.
    ///
    /// An active tour is torn down exactly like [`Engine::close`], events and
    /// hooks included, before the new one starts.
    pub async fn start(&self, config: TutorialConfig) -> Result<(), TourError> {
        config.validate()?;

        if self.is_active() {
            debug!("replacing active tour");
            self.close();
        }

        let tour_id = config.id.clone();
        let total = config.steps.len();
        {
            let mut inner = self.lock();
            inner.release_gate(&self.shared.bus);
            inner.timers.cancel_all();
            inner.reset();
            inner.session += 1;
            inner.config = Some(Arc::new(config));
        }

        info!(tour = %tour_id, steps = total, "tutorial started");
        self.shared.bus.publish(TourEvent::Start { tour_id });
        self.go_to_step(0).await
    }

    /// Close the active tour. No-op when nothing is active.
    pub fn close(&self) {
        let (config, session) = {
            let mut inner = self.lock();
            let Some(config) = inner.config.clone() else {
                debug!("close ignored, no active tour");
                return;
            };
            if inner.closing {
                return;
            }
            inner.closing = true;
            inner.release_gate(&self.shared.bus);
            inner.timers.cancel_all();
            (config, inner.session)
        };

        info!(tour = %config.id, "tutorial closed");
        self.shared.bus.publish(TourEvent::Close {
            tour_id: config.id.clone(),
        });
        if let Some(hook) = &config.on_close {
            run_completion_hook(hook, &config.id, "on_close");
        }

        let mut inner = self.lock();
        if inner.session == session {
            inner.reset();
            inner.session += 1;
        }
    }

    /// Mark the active tour completed and close it.
    ///
    /// A failing store write is returned after the tour has been torn down.
    pub fn complete(&self) -> Result<(), TourError> {
        let config = {
            let inner = self.lock();
            match &inner.config {
                Some(config) if !inner.closing => config.clone(),
                _ => {
                    debug!("complete ignored, no active tour");
                    return Ok(());
                }
            }
        };

        let stored = self.shared.store.mark_completed(&config.id);
        if let Err(err) = &stored {
            warn!(tour = %config.id, error = %err, "failed to record completion");
        }

        info!(tour = %config.id, "tutorial completed");
        self.shared.bus.publish(TourEvent::Complete {
            tour_id: config.id.clone(),
        });
        if let Some(hook) = &config.on_complete {
            run_completion_hook(hook, &config.id, "on_complete");
        }

        self.close();
        stored
    }

    // ===== Navigation =====

    /// Make the step at `index` current.
    ///
    /// Ignored when no tour is active or the index is out of range.
    pub async fn go_to_step(&self, index: usize) -> Result<(), TourError> {
        let (config, leaving, was_waiting, ticket) = {
            let mut inner = self.lock();
            let Some(config) = inner.config.clone() else {
                debug!(index, "go_to_step ignored, no active tour");
                return Ok(());
            };
            if inner.closing {
                return Ok(());
            }
            if index >= config.steps.len() {
                debug!(index, total = config.steps.len(), "go_to_step ignored, out of range");
                return Ok(());
            }

            let was_waiting = inner.gate.is_some();
            inner.release_gate(&self.shared.bus);
            inner.timers.cancel(&TimerKey::from(TARGET_SETTLE));
            inner.timers.cancel(&TimerKey::from(POPOVER_SCROLL));
            inner.transition += 1;
            (config, inner.index, was_waiting, inner.ticket())
        };

        if let Some(step) = leaving.and_then(|i| config.steps.get(i)) {
            if let Some(hook) = &step.on_exit {
                if let Err(source) = hook.call().await {
                    // Still on the leaving step: an unsatisfied gate must hold
                    if let (true, Some(gate)) = (was_waiting, &step.wait_for_action) {
                        self.arm_gate(gate, ticket);
                    }
                    return Err(TourError::Hook {
                        step_id: step.id.clone(),
                        phase: HookPhase::Exit,
                        source,
                    });
                }
            }
        }

        {
            let mut inner = self.lock();
            if !inner.holds(ticket) {
                debug!(index, "transition superseded");
                return Ok(());
            }
            inner.index = Some(index);
            inner.waiting = false;
        }

        let step = &config.steps[index];
        debug!(tour = %config.id, step = %step.id, index, "entering step");

        self.shared.pacer.next_frame().await;
        if !self.holds(ticket) {
            debug!(index, "transition superseded");
            return Ok(());
        }
        self.update_target_rect();
        if step.target.is_some() {
            self.scroll_target_into_view(step, ticket);
        }

        let entered = match &step.on_enter {
            Some(hook) => hook.call().await.map_err(|source| TourError::Hook {
                step_id: step.id.clone(),
                phase: HookPhase::Enter,
                source,
            }),
            None => Ok(()),
        };

        if let Some(gate) = &step.wait_for_action {
            if !self.arm_gate(gate, ticket) {
                debug!(index, "transition superseded");
                return entered;
            }
        } else if !self.holds(ticket) {
            debug!(index, "transition superseded");
            return entered;
        }
        entered?;

        self.shared.bus.publish(TourEvent::StepChange {
            step: step.clone(),
            index,
        });
        Ok(())
    }

    /// Advance one step, unless gated or already on the last step.
    pub async fn next(&self) -> Result<(), TourError> {
        let state = self.state();
        match state.current_step_index {
            Some(index) if state.can_go_next() => self.go_to_step(index + 1).await,
            _ => {
                debug!(
                    index = ?state.current_step_index,
                    waiting = state.is_waiting_for_action,
                    "next ignored"
                );
                Ok(())
            }
        }
    }

    /// Go back one step. Never blocked by a gate.
    pub async fn previous(&self) -> Result<(), TourError> {
        let index = self.lock().index;
        match index {
            Some(index) if index > 0 => self.go_to_step(index - 1).await,
            _ => {
                debug!(?index, "previous ignored");
                Ok(())
            }
        }
    }

    /// Jump to the step with the given id. Unknown ids are ignored.
    ///
    /// Any step of the active tour is reachable; `allow_skip_to` only
    /// controls which jumps the popover offers.
    pub async fn skip_to(&self, step_id: &str) -> Result<(), TourError> {
        let index = self
            .lock()
            .config
            .as_ref()
            .and_then(|config| config.step_index(step_id));
        match index {
            Some(index) => self.go_to_step(index).await,
            None => {
                debug!(step = step_id, "skip_to ignored, unknown step");
                Ok(())
            }
        }
    }

    /// Apply a user intent forwarded by the presentation layer.
    ///
    /// Unlike [`Engine::skip_to`], a skip intent must name a step listed in
    /// the current step's `allow_skip_to`, and close intents respect the
    /// tour's `allow_close`.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), TourError> {
        debug!(?intent, "intent");
        let (allow_close, blocking, skip_allowed) = {
            let inner = self.lock();
            let Some(config) = inner.config.as_ref() else {
                return Ok(());
            };
            let step = inner.current_step();
            let skip_allowed = match &intent {
                Intent::SkipTo(id) => step.is_some_and(|s| s.allow_skip_to.contains(id)),
                _ => false,
            };
            (
                config.allow_close,
                step.is_some_and(|s| s.block_interactions),
                skip_allowed,
            )
        };

        match intent {
            Intent::Next => self.next().await,
            Intent::Previous => self.previous().await,
            Intent::SkipTo(id) if skip_allowed => self.skip_to(&id).await,
            Intent::SkipTo(id) => {
                debug!(step = %id, "skip intent not offered by current step");
                Ok(())
            }
            Intent::Complete => self.complete(),
            Intent::Close if allow_close => {
                self.close();
                Ok(())
            }
            Intent::BackgroundClicked if allow_close && !blocking => {
                self.close();
                Ok(())
            }
            Intent::Close | Intent::BackgroundClicked => Ok(()),
        }
    }

    // ===== Actions and events =====

    /// Publish a host action on the bus.
    ///
    /// A step waiting on `name` clears its gate through its own
    /// subscription; otherwise this is a plain publish.
    pub fn trigger_action(&self, name: &str, data: Option<Value>) {
        debug!(action = name, "trigger action");
        self.shared.bus.emit(name, data);
    }

    /// Subscribe to a lifecycle or custom event
    pub fn on(&self, key: impl Into<EventKey>, handler: Handler) -> bool {
        self.shared.bus.subscribe(key, handler)
    }

    /// Remove a subscription made with [`Engine::on`]
    pub fn off(&self, key: impl Into<EventKey>, handler: &Handler) -> bool {
        self.shared.bus.unsubscribe(key, handler)
    }

    fn arm_gate(&self, gate: &WaitForAction, ticket: Ticket) -> bool {
        let mut inner = self.lock();
        if !inner.holds(ticket) {
            return false;
        }

        inner.gate_seq += 1;
        let gate_id = inner.gate_seq;
        let key = EventKey::from(gate.event.as_str());

        let weak = Arc::downgrade(&self.shared);
        let on_action = handler(move |_| {
            if let Some(engine) = Engine::from_weak(&weak) {
                engine.resolve_gate(gate_id, GateOutcome::Action);
            }
        });
        self.shared.bus.subscribe(key.clone(), on_action.clone());

        if let Some(timeout) = gate.timeout() {
            let weak = Arc::downgrade(&self.shared);
            let scheduled = inner.timers.schedule(GATE_TIMEOUT, timeout, move || {
                if let Some(engine) = Engine::from_weak(&weak) {
                    engine.resolve_gate(gate_id, GateOutcome::Timeout);
                }
            });
            if !scheduled {
                warn!(
                    event = %key,
                    "gate timeout needs a tokio runtime; only the event can clear this gate"
                );
            }
        }

        debug!(event = %key, timeout_ms = ?gate.timeout_ms, "waiting for action");
        inner.waiting = true;
        inner.gate = Some(Gate {
            id: gate_id,
            key,
            handler: on_action,
        });
        true
    }

    fn resolve_gate(&self, gate_id: u64, outcome: GateOutcome) {
        let key = {
            let mut inner = self.lock();
            if !inner.gate.as_ref().is_some_and(|gate| gate.id == gate_id) {
                return;
            }
            let key = inner.gate.as_ref().map(|gate| gate.key.clone());
            inner.release_gate(&self.shared.bus);
            key
        };
        let Some(key) = key else {
            return;
        };

        match outcome {
            GateOutcome::Action => {
                info!(event = %key, "action completed");
                self.shared.bus.publish(TourEvent::ActionCompleted {
                    event: key.to_string(),
                });
            }
            GateOutcome::Timeout => {
                info!(event = %key, "action gate timed out");
            }
        }
    }

    // ===== Completion store =====

    /// Whether the tour with this id was completed. Store failures read as
    /// not completed.
    pub fn is_completed(&self, tour_id: &str) -> bool {
        self.shared
            .store
            .is_completed(tour_id)
            .unwrap_or_else(|err| {
                warn!(tour = tour_id, error = %err, "failed to read completion");
                false
            })
    }

    pub fn reset_completion(&self, tour_id: &str) -> Result<(), TourError> {
        self.shared.store.reset_completion(tour_id)
    }

    // ===== Target tracking =====

    /// Re-resolve the current step's target and cache its rectangle.
    ///
    /// Clears the rectangle when inactive, untargeted or unresolved.
    pub fn update_target_rect(&self) {
        let selector = self.lock().current_step().and_then(|s| s.target.clone());
        let rect = selector
            .as_deref()
            .and_then(|selector| self.shared.resolver.resolve_rect(selector));

        let mut inner = self.lock();
        let current = inner.current_step().and_then(|s| s.target.as_deref());
        if current != selector.as_deref() {
            // The step changed while resolving; its own transition measures it
            return;
        }
        if inner.target_rect == rect {
            return;
        }
        inner.target_rect = rect;
        if rect.is_some() {
            self.schedule_popover_check(&mut inner);
        }
    }

    /// Register how to measure the rendered popover.
    ///
    /// Each time the target rectangle changes, the popover is measured once
    /// it has had time to re-layout and scrolled into view if needed.
    pub fn track_popover<F>(&self, measure: F)
    where
        F: Fn() -> Option<Rect> + Send + Sync + 'static,
    {
        self.lock().popover = Some(Arc::new(measure));
    }

    fn schedule_popover_check(&self, inner: &mut Inner) {
        let Some(measure) = inner.popover.clone() else {
            return;
        };
        if self.shared.scroll.is_none() {
            return;
        }
        let ticket = inner.ticket();
        let weak = Arc::downgrade(&self.shared);
        inner
            .timers
            .schedule(POPOVER_SCROLL, self.shared.settings.popover_settle(), move || {
                let Some(engine) = Engine::from_weak(&weak) else {
                    return;
                };
                if !engine.holds(ticket) {
                    return;
                }
                if let (Some(scroll), Some(rect)) = (&engine.shared.scroll, measure()) {
                    scroll.scroll_popover_into_view(rect);
                }
            });
    }

    fn scroll_target_into_view(&self, step: &TutorialStep, ticket: Ticket) {
        let Some(scroll) = &self.shared.scroll else {
            return;
        };
        let Some(rect) = self.lock().target_rect else {
            return;
        };
        if !scroll.scroll_target_into_view(rect, step.placement) {
            return;
        }

        let weak = Arc::downgrade(&self.shared);
        let mut inner = self.lock();
        if !inner.holds(ticket) {
            return;
        }
        inner
            .timers
            .schedule(TARGET_SETTLE, self.shared.settings.scroll_settle(), move || {
                if let Some(engine) = Engine::from_weak(&weak) {
                    if engine.holds(ticket) {
                        engine.update_target_rect();
                    }
                }
            });
    }

    // ===== Presentation =====

    /// Props for the dimming overlay
    pub fn overlay_props(&self) -> OverlayProps {
        let inner = self.lock();
        build_overlay_props(&inner.snapshot(), &self.shared.settings)
    }

    /// Props for the popover, `None` when no step is current
    pub fn popover_props(&self) -> Option<PopoverProps> {
        let inner = self.lock();
        let config = inner.config.as_ref()?;
        build_popover_props(config, &inner.snapshot())
    }

    /// Render the current state through a presentation layer
    pub fn render<O, P>(&self, overlay: &mut O, popover: &mut P)
    where
        O: OverlayRenderer + ?Sized,
        P: PopoverRenderer + ?Sized,
    {
        let overlay_props = self.overlay_props();
        let popover_props = self.popover_props();
        overlay.render_overlay(&overlay_props);
        popover.render_popover(popover_props.as_ref());
    }
}
