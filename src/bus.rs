//! Change notification bus.
//!
//! A synchronous, single-threaded publish/subscribe channel over a fixed set of
//! [`Topic`]s. Surfaces subscribe when they mount and hold the returned
//! [`Subscription`]; dropping it unsubscribes, so a surface that fails halfway
//! through mounting still releases everything it registered.
//!
//! # Invariants
//!
//! 1. Handlers run synchronously inside [`ChangeBus::publish`], in registration
//!    order.
//! 2. A publish delivers to the handlers registered when it started. Handlers
//!    may subscribe, unsubscribe, publish, or run domain operations without
//!    deadlocking the bus.
//! 3. After a [`Subscription`] is dropped its handler is never called again,
//!    including later in a delivery that is already in progress.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use tracing::{debug, trace};

use crate::storage::{CART_KEY, REMINDERS_KEY};

/// Named change channel, one per persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// The medication cart changed.
    CartChanged,
    /// The reminder list changed.
    RemindersChanged,
}

impl Topic {
    /// Every topic, in a stable order.
    pub const ALL: [Topic; 2] = [Topic::CartChanged, Topic::RemindersChanged];

    /// Topic announcing changes to the collection stored under `key`.
    pub fn for_storage_key(key: &str) -> Option<Self> {
        match key {
            CART_KEY => Some(Self::CartChanged),
            REMINDERS_KEY => Some(Self::RemindersChanged),
            _ => None,
        }
    }

    /// Storage key of the collection this topic announces.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::CartChanged => CART_KEY,
            Self::RemindersChanged => REMINDERS_KEY,
        }
    }

    /// Wire name of the topic.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CartChanged => "cart-changed",
            Self::RemindersChanged => "reminders-changed",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change made to storage outside this process (another tab or window).
///
/// `key == None` means the whole storage scope was cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// Key that changed, if known.
    pub key: Option<String>,
}

impl StorageEvent {
    /// Event for a single changed key.
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// Event for a cleared storage scope.
    pub fn cleared() -> Self {
        Self { key: None }
    }

    /// Topics affected by this event.
    pub fn topics(&self) -> Vec<Topic> {
        match &self.key {
            Some(key) => Topic::for_storage_key(key).into_iter().collect(),
            None => Topic::ALL.to_vec(),
        }
    }
}

type Handler = Rc<dyn Fn(Topic)>;

struct Registration {
    id: u64,
    topic: Option<Topic>,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl BusInner {
    fn is_registered(&self, id: u64) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }
}

/// Cloneable handle to a shared publish/subscribe channel.
#[derive(Clone, Default)]
pub struct ChangeBus {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl ChangeBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, topic: Topic, handler: impl Fn(Topic) + 'static) -> Subscription {
        self.register(Some(topic), Rc::new(handler))
    }

    /// Register `handler` for every topic.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_all(&self, handler: impl Fn(Topic) + 'static) -> Subscription {
        self.register(None, Rc::new(handler))
    }

    fn register(&self, topic: Option<Topic>, handler: Handler) -> Subscription {
        let mut inner = self.inner.borrow_mut();

        let id = inner.next_id;
        inner.next_id += 1;
        inner.registrations.push(Registration { id, topic, handler });

        trace!(id, ?topic, "subscribed");

        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Notify every handler subscribed to `topic`.
    pub fn publish(&self, topic: Topic) {
        let targets: Vec<(u64, Handler)> = self
            .inner
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.topic.is_none_or(|t| t == topic))
            .map(|r| (r.id, Rc::clone(&r.handler)))
            .collect();

        debug!(%topic, handlers = targets.len(), "publishing change");

        for (id, handler) in targets {
            // Skip handlers unsubscribed by an earlier handler in this delivery.
            if self.inner.borrow().is_registered(id) {
                handler(topic);
            }
        }
    }

    /// Feed a cross-tab storage signal into the bus.
    ///
    /// Keys that do not belong to a known collection are ignored.
    pub fn relay_storage_event(&self, event: &StorageEvent) {
        let topics = event.topics();

        if topics.is_empty() {
            trace!(key = ?event.key, "ignoring storage event for unrelated key");
        }

        for topic in topics {
            self.publish(topic);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().registrations.len()
    }
}

/// RAII guard for a bus registration.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl Subscription {
    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            inner.borrow_mut().registrations.retain(|r| r.id != self.id);
            trace!(id = self.id, "unsubscribed");
        }
    }
}
