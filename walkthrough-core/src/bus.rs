//! Event bus for dispatching tour events to subscribed handlers

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde_json::Value;
use tracing::{debug, warn};

use crate::event::{EventKey, TourEvent};

/// Subscriber callback
///
/// Identity is the `Arc` allocation: subscribing the same `Arc` twice under
/// one key has no additional effect, and unsubscribing needs a clone of it.
pub type Handler = Arc<dyn Fn(&TourEvent) + Send + Sync>;

/// Wrap a closure as a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&TourEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Publish/subscribe registry keyed by event name
///
/// Handlers run synchronously in registration order. A handler that panics
/// is logged and skipped; the remaining handlers still run. Subscriptions
/// persist until explicitly removed.
#[derive(Default)]
pub struct EventBus {
    /// Subscriptions: event key -> handlers in registration order
    subscriptions: Mutex<HashMap<EventKey, Vec<Handler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscriptions = self.lock();
        let counts: HashMap<&str, usize> = subscriptions
            .iter()
            .map(|(key, handlers)| (key.as_str(), handlers.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscriptions", &counts)
            .finish()
    }
}

impl EventBus {
    /// Create a new, empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide bus for hosts that want one shared instance
    ///
    /// Nothing in this crate requires it; engines take whichever bus they are
    /// built with.
    pub fn global() -> Arc<EventBus> {
        static GLOBAL: OnceLock<Arc<EventBus>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(EventBus::new())).clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<EventKey, Vec<Handler>>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe a handler to an event
    ///
    /// Returns `false` if the handler was already registered for that key.
    pub fn subscribe(&self, key: impl Into<EventKey>, handler: Handler) -> bool {
        let key = key.into();
        let mut subscriptions = self.lock();
        let handlers = subscriptions.entry(key).or_default();
        if handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Unsubscribe a handler from an event
    ///
    /// Returns `false` if it was not registered.
    pub fn unsubscribe(&self, key: impl Into<EventKey>, handler: &Handler) -> bool {
        let key = key.into();
        let mut subscriptions = self.lock();
        let Some(handlers) = subscriptions.get_mut(&key) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|h| !Arc::ptr_eq(h, handler));
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            subscriptions.remove(&key);
        }
        removed
    }

    /// Check whether a handler is registered for an event
    pub fn is_subscribed(&self, key: impl Into<EventKey>, handler: &Handler) -> bool {
        self.lock()
            .get(&key.into())
            .map(|handlers| handlers.iter().any(|h| Arc::ptr_eq(h, handler)))
            .unwrap_or(false)
    }

    /// Number of handlers registered for an event
    pub fn subscriber_count(&self, key: impl Into<EventKey>) -> usize {
        self.lock().get(&key.into()).map(Vec::len).unwrap_or(0)
    }

    /// Remove every handler registered for an event
    pub fn clear(&self, key: impl Into<EventKey>) {
        self.lock().remove(&key.into());
    }

    /// Deliver an event to the handlers registered under its key
    ///
    /// The handler list is snapshotted first, so handlers may subscribe and
    /// unsubscribe freely while running. A handler removed by an earlier one
    /// during the same dispatch is not invoked.
    pub fn publish(&self, event: TourEvent) {
        let key = event.key();
        let snapshot: Vec<Handler> = self.lock().get(&key).cloned().unwrap_or_default();
        debug!(event = %key, handlers = snapshot.len(), "publishing");

        for handler in snapshot {
            if !self.is_subscribed(key.clone(), &handler) {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                warn!(event = %key, "event handler panicked");
            }
        }
    }

    /// Publish a host-defined action
    pub fn emit(&self, name: impl Into<String>, data: Option<Value>) {
        self.publish(TourEvent::custom(name, data));
    }

    /// Receive events for a key as an async stream
    ///
    /// The backing subscription removes itself on the first event published
    /// after the stream is dropped.
    #[cfg(feature = "streams")]
    pub fn stream(
        self: &Arc<Self>,
        key: impl Into<EventKey>,
    ) -> tokio_stream::wrappers::UnboundedReceiverStream<TourEvent> {
        use std::sync::Weak;

        let key = key.into();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let bus = Arc::downgrade(self);
        let slot: Arc<OnceLock<Weak<dyn Fn(&TourEvent) + Send + Sync>>> =
            Arc::new(OnceLock::new());

        let own_key = key.clone();
        let own_slot = slot.clone();
        let forward: Handler = Arc::new(move |event: &TourEvent| {
            if tx.send(event.clone()).is_err() {
                if let (Some(bus), Some(me)) =
                    (bus.upgrade(), own_slot.get().and_then(Weak::upgrade))
                {
                    bus.unsubscribe(own_key.clone(), &me);
                }
            }
        });
        let _ = slot.set(Arc::downgrade(&forward));

        self.subscribe(key, forward);
        tokio_stream::wrappers::UnboundedReceiverStream::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>) -> Handler {
        let counter = counter.clone();
        handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = counting(&hits);

        assert!(bus.subscribe("saved", h.clone()));
        assert_eq!(bus.subscriber_count("saved"), 1);

        assert!(bus.unsubscribe("saved", &h));
        assert_eq!(bus.subscriber_count("saved"), 0);
        assert!(!bus.unsubscribe("saved", &h));

        bus.emit("saved", None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = counting(&hits);

        assert!(bus.subscribe("saved", h.clone()));
        assert!(!bus.subscribe("saved", h.clone()));

        bus.emit("saved", None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_publish_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let order = order.clone();
            bus.subscribe(
                "tick",
                handler(move |_| order.lock().unwrap().push(n)),
            );
        }

        bus.emit("tick", None);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_publish_passes_data() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        bus.subscribe(
            "saved",
            handler(move |event| *sink.lock().unwrap() = event.data().cloned()),
        );

        bus.emit("saved", Some(serde_json::json!(42)));
        assert_eq!(*seen.lock().unwrap(), Some(serde_json::json!(42)));
    }

    #[test]
    fn test_panicking_handler_is_isolated() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.subscribe("boom", handler(|_| panic!("handler failure")));
        bus.subscribe("boom", counting(&hits));

        bus.emit("boom", None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_can_remove_itself() {
        let bus = Arc::new(EventBus::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Handler>>> = Arc::new(Mutex::new(None));

        let weak_bus = Arc::downgrade(&bus);
        let own = slot.clone();
        let counter = hits.clone();
        let once = handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let (Some(bus), Some(me)) = (weak_bus.upgrade(), own.lock().unwrap().clone()) {
                bus.unsubscribe("once", &me);
            }
        });
        *slot.lock().unwrap() = Some(once.clone());
        bus.subscribe("once", once);

        bus.emit("once", None);
        bus.emit("once", None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count("once"), 0);
    }

    #[test]
    fn test_handler_removed_mid_dispatch_is_skipped() {
        let bus = Arc::new(EventBus::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let victim = counting(&hits);

        let weak_bus = Arc::downgrade(&bus);
        let target = victim.clone();
        bus.subscribe(
            "go",
            handler(move |_| {
                if let Some(bus) = weak_bus.upgrade() {
                    bus.unsubscribe("go", &target);
                }
            }),
        );
        bus.subscribe("go", victim);

        bus.emit("go", None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reserved_and_custom_keys_are_separate() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.subscribe(EventKey::Close, counting(&hits));

        bus.emit("close", None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        bus.publish(TourEvent::Close {
            tour_id: "t".into(),
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        bus.subscribe("a", counting(&hits));
        bus.subscribe("a", counting(&hits));
        assert_eq!(bus.subscriber_count("a"), 2);

        bus.clear("a");
        bus.emit("a", None);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_global_is_shared() {
        let a = EventBus::global();
        let b = EventBus::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[cfg(feature = "streams")]
    #[tokio::test]
    async fn test_stream_receives_events() {
        use tokio_stream::StreamExt;

        let bus = Arc::new(EventBus::new());
        let mut events = bus.stream("saved");
        bus.emit("saved", Some(serde_json::json!("x")));

        let event = events.next().await.expect("stream ended");
        assert_eq!(event.data(), Some(&serde_json::json!("x")));

        drop(events);
        bus.emit("saved", None);
        assert_eq!(bus.subscriber_count("saved"), 0);
    }
}
