//! Mounted surfaces.
//!
//! A surface keeps a transient copy of what it renders and refreshes it from
//! storage whenever the bus announces a change. The copy may be stale between
//! a write in another process and the storage signal reaching this one; the
//! store is always the source of truth.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use tracing::trace;

use crate::{
    bus::{ChangeBus, Subscription, Topic},
    counters::BadgeCounts,
};

/// Cached copy of one collection, reloaded on every change to its topic.
pub struct CollectionView<T> {
    topic: Topic,
    records: Rc<RefCell<Vec<T>>>,
    reloads: Rc<Cell<usize>>,
    _subscription: Subscription,
}

impl<T: 'static> CollectionView<T> {
    /// Load the collection once and subscribe to `topic`.
    ///
    /// Dropping the view unsubscribes.
    pub fn mount(bus: &ChangeBus, topic: Topic, loader: impl Fn() -> Vec<T> + 'static) -> Self {
        let records = Rc::new(RefCell::new(loader()));
        let reloads = Rc::new(Cell::new(0));

        let target = Rc::clone(&records);
        let counter = Rc::clone(&reloads);
        let subscription = bus.subscribe(topic, move |topic| {
            let fresh = loader();
            trace!(%topic, records = fresh.len(), "view reloaded");
            *target.borrow_mut() = fresh;
            counter.set(counter.get() + 1);
        });

        Self {
            topic,
            records,
            reloads,
            _subscription: subscription,
        }
    }

    /// Owned copy of the cached records.
    ///
    /// No borrow of the cache outlives the call, so callers may run domain
    /// operations (and trigger a reload) while walking the result.
    pub fn records(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.records.borrow().clone()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    /// Check whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// How many times the view reloaded since mounting.
    pub fn reloads(&self) -> usize {
        self.reloads.get()
    }

    /// Topic the view reloads on.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

impl<T> fmt::Debug for CollectionView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionView")
            .field("topic", &self.topic)
            .field("records", &self.records.borrow().len())
            .field("reloads", &self.reloads.get())
            .finish()
    }
}

type BadgeListener = Box<dyn Fn(BadgeCounts)>;

/// Navigation header badges, listening to both topics.
pub struct NavigationBadges {
    counts: Rc<Cell<BadgeCounts>>,
    listener: Rc<RefCell<Option<BadgeListener>>>,
    _subscription: Subscription,
}

impl NavigationBadges {
    /// Compute the counts once and subscribe to every topic.
    pub fn mount(bus: &ChangeBus, loader: impl Fn() -> BadgeCounts + 'static) -> Self {
        let counts = Rc::new(Cell::new(loader()));
        let listener: Rc<RefCell<Option<BadgeListener>>> = Rc::new(RefCell::new(None));

        let target = Rc::clone(&counts);
        let notify = Rc::clone(&listener);
        let subscription = bus.subscribe_all(move |topic| {
            let fresh = loader();
            let changed = fresh != target.replace(fresh);

            trace!(
                %topic,
                cart = fresh.cart,
                reminders = fresh.reminders,
                changed,
                "badges recomputed"
            );

            if !changed {
                return;
            }

            if let Some(listener) = notify.borrow().as_ref() {
                listener(fresh);
            }
        });

        Self {
            counts,
            listener,
            _subscription: subscription,
        }
    }

    /// Latest computed counts.
    pub fn counts(&self) -> BadgeCounts {
        self.counts.get()
    }

    /// Call `listener` whenever a recomputation changes the counts.
    pub fn on_change(&self, listener: impl Fn(BadgeCounts) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }
}

impl fmt::Debug for NavigationBadges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationBadges")
            .field("counts", &self.counts.get())
            .finish_non_exhaustive()
    }
}
