//! # Per-event subscriber set bound to one strategy.
//!
//! A [`Dispatcher`] holds the listeners of a single event name and the
//! [`Strategy`] used to deliver to them.
//!
//! ## Architecture
//! ```text
//! subscribers: Vec<ListenerRef>          ids: HashMap<String, ListenerRef>
//!   [ anon, "audit", anon, "metrics" ]     { "audit" → ·, "metrics" → · }
//!
//! dispatch(event)
//!   └─► snapshot(subscribers) ─► strategy(event, snapshot) ─► DispatchFuture ('static)
//! ```
//!
//! ## Rules
//! - **Identity**: at most one listener per non-empty id; adding another listener with
//!   the same id removes the previous one first.
//! - **Anonymous**: no deduplication; the same anonymous listener added twice is
//!   delivered twice.
//! - **Removal** is by reference (same `Arc` allocation) and clears the id index too.
//!   Removing an absent listener is a no-op. It scans the subscriber list, so it is
//!   linear in the number of subscriptions, as is an identity replacement. Adding a new
//!   listener and id lookup are constant time.
//! - **Snapshot**: `dispatch` copies the subscriber list when called; later mutations
//!   never affect a delivery already in flight.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::events::{Event, Payload};
use crate::listeners::{ListenerRef, identity, same_listener};
use crate::strategies::{DispatchFuture, Strategy};

/// Listeners of one event name plus their delivery strategy.
pub struct Dispatcher<V: Payload> {
    strategy: Strategy<V>,
    subscribers: Vec<ListenerRef<V>>,
    ids: HashMap<String, ListenerRef<V>>,
}

impl<V: Payload> Dispatcher<V> {
    /// Creates an empty dispatcher.
    pub fn new(strategy: Strategy<V>) -> Self {
        Self {
            strategy,
            subscribers: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Adds one listener, replacing any listener with the same identity.
    pub fn add_subscriber(&mut self, listener: ListenerRef<V>) {
        if let Some(id) = identity(&listener).map(str::to_owned) {
            if let Some(prev) = self.ids.remove(&id) {
                self.remove_subscriber(&prev);
            }
            self.ids.insert(id, Arc::clone(&listener));
        }
        self.subscribers.push(listener);
    }

    /// Adds listeners one by one with [`add_subscriber`](Self::add_subscriber) semantics.
    pub fn add_subscribers(&mut self, listeners: impl IntoIterator<Item = ListenerRef<V>>) {
        for listener in listeners {
            self.add_subscriber(listener);
        }
    }

    /// Removes every occurrence of `listener`. Returns `true` if anything was removed.
    pub fn remove_subscriber(&mut self, listener: &ListenerRef<V>) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|l| !same_listener(l, listener));
        self.ids.retain(|_, l| !same_listener(l, listener));
        self.subscribers.len() != before
    }

    /// Returns the listener registered under `id`.
    pub fn get(&self, id: &str) -> Option<&ListenerRef<V>> {
        self.ids.get(id)
    }

    /// Copy of the current subscriber list.
    pub fn snapshot(&self) -> Vec<ListenerRef<V>> {
        self.subscribers.clone()
    }

    /// Strategy bound to this dispatcher.
    pub fn strategy(&self) -> &Strategy<V> {
        &self.strategy
    }

    /// Number of subscriptions (anonymous duplicates counted separately).
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Snapshots the subscribers and hands them to the strategy.
    ///
    /// The returned future owns the snapshot and does not borrow `self`.
    pub fn dispatch(&self, event: Arc<Event<V>>) -> DispatchFuture {
        self.strategy.dispatch(event, self.snapshot())
    }
}

impl<V: Payload> fmt::Debug for Dispatcher<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.ids.keys().collect();
        ids.sort_unstable();
        f.debug_struct("Dispatcher")
            .field("strategy", &self.strategy.name())
            .field("subscribers", &self.subscribers.len())
            .field("ids", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::error::ListenerError;
    use crate::testing::{counting, counting_with_id, hits};

    fn event() -> Arc<Event<u8>> {
        Arc::new(Event::new("e", 0u8))
    }

    #[tokio::test]
    async fn test_same_identity_replaces_previous() {
        let old = Arc::new(AtomicUsize::new(0));
        let new = Arc::new(AtomicUsize::new(0));
        let mut d = Dispatcher::new(Strategy::broadcast());

        d.add_subscriber(counting_with_id("x", &old, Ok(())));
        d.add_subscriber(counting_with_id("x", &new, Err(ListenerError::fail("new"))));

        assert_eq!(d.len(), 1);
        assert_eq!(d.dispatch(event()).await, Err(ListenerError::fail("new")));
        assert_eq!(hits(&old), 0);
        assert_eq!(hits(&new), 1);
    }

    #[tokio::test]
    async fn test_anonymous_duplicates_deliver_twice() {
        let counter = Arc::new(AtomicUsize::new(0));
        let listener: ListenerRef<u8> = counting(&counter, Ok(()));
        let mut d = Dispatcher::new(Strategy::broadcast());

        d.add_subscribers([Arc::clone(&listener), Arc::clone(&listener)]);
        d.dispatch(event()).await.expect("dispatch");

        assert_eq!(hits(&counter), 2);
    }

    #[tokio::test]
    async fn test_remove_clears_identity_index() {
        let counter = Arc::new(AtomicUsize::new(0));
        let listener = counting_with_id("x", &counter, Ok(()));
        let mut d = Dispatcher::new(Strategy::broadcast());

        d.add_subscriber(Arc::clone(&listener));
        assert!(d.get("x").is_some());
        assert!(d.remove_subscriber(&listener));
        assert!(d.get("x").is_none());
        assert!(d.is_empty());
        assert!(!d.remove_subscriber(&listener));

        d.dispatch(event()).await.expect("dispatch");
        assert_eq!(hits(&counter), 0);
    }

    #[tokio::test]
    async fn test_empty_identity_is_anonymous() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut d = Dispatcher::new(Strategy::broadcast());

        d.add_subscriber(counting_with_id("", &counter, Ok(())));
        d.add_subscriber(counting_with_id("", &counter, Ok(())));
        d.dispatch(event()).await.expect("dispatch");

        assert_eq!(d.len(), 2);
        assert_eq!(hits(&counter), 2);
    }

    #[tokio::test]
    async fn test_dispatch_uses_snapshot() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut d = Dispatcher::new(Strategy::broadcast());
        d.add_subscriber(counting(&counter, Ok(())));

        let pending = d.dispatch(event());
        d.add_subscriber(counting(&counter, Ok(())));
        pending.await.expect("dispatch");

        assert_eq!(hits(&counter), 1);
    }
}
