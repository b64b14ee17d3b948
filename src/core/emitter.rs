//! # Emitter - registry of event names and their dispatchers.
//!
//! The [`Emitter`] routes `fire(name, payload)` to the [`Dispatcher`] registered
//! under `name`.
//!
//! ## Architecture
//! ```text
//! on(name, listeners) ──┐
//! add_event_listener ───┤ write lock ─► HashMap<String, Dispatcher>
//! off(name) ────────────┤               (created lazily with default or per-name strategy)
//! remove_event_listener ┘
//!
//! fire(name, payload)
//!   └─► read lock ─► dispatcher.dispatch(Arc<Event>) ─► unlock ─► await delivery
//! ```
//!
//! ## Rules
//! - Dispatchers are created on first subscription and destroyed by [`Emitter::off`].
//! - Per-name strategy overrides given to the builder survive `off`: the next
//!   subscription recreates the dispatcher with the same override.
//! - Firing an unknown name is a no-op that returns `Ok(())`.
//! - Delivery runs **outside** the registry lock: listeners may subscribe or
//!   unsubscribe on the same emitter while an event is being delivered.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::builder::EmitterBuilder;
use crate::core::dispatcher::Dispatcher;
use crate::error::ListenerError;
use crate::events::{Event, Payload};
use crate::listeners::ListenerRef;
use crate::strategies::Strategy;

/// Registry of named events.
pub struct Emitter<V: Payload> {
    strategy: Strategy<V>,
    overrides: HashMap<String, Strategy<V>>,
    dispatchers: RwLock<HashMap<String, Dispatcher<V>>>,
}

impl<V: Payload> Emitter<V> {
    /// Creates an emitter whose new events use [`Strategy::broadcast`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for configuring strategies.
    pub fn builder() -> EmitterBuilder<V> {
        EmitterBuilder::new()
    }

    pub(crate) fn from_parts(strategy: Strategy<V>, overrides: HashMap<String, Strategy<V>>) -> Self {
        Self {
            strategy,
            overrides,
            dispatchers: RwLock::new(HashMap::new()),
        }
    }

    /// Strategy applied to newly created dispatchers without an override.
    pub fn default_strategy(&self) -> &Strategy<V> {
        &self.strategy
    }

    /// Subscribes `listeners` to `name` and returns the emitter for chaining.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use eventvisor::{Callback, Emitter, Event, ListenerError, ListenerRef};
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let emitter = Emitter::<u32>::new();
    /// let l: ListenerRef<u32> = Callback::arc(|_ev: Arc<Event<u32>>| async { Ok::<_, ListenerError>(()) });
    ///
    /// emitter.on("a", [l.clone()]).await.on("b", [l]).await;
    /// assert_eq!(emitter.event_names().await, vec!["a", "b"]);
    /// # }
    /// ```
    pub async fn on(
        &self,
        name: impl Into<String>,
        listeners: impl IntoIterator<Item = ListenerRef<V>>,
    ) -> &Self {
        self.add_event_listeners(name, listeners).await;
        self
    }

    /// Subscribes `listeners` to `name`, creating its dispatcher if needed.
    pub async fn add_event_listeners(
        &self,
        name: impl Into<String>,
        listeners: impl IntoIterator<Item = ListenerRef<V>>,
    ) {
        let name = name.into();
        let mut dispatchers = self.dispatchers.write().await;
        dispatchers
            .entry(name)
            .or_insert_with_key(|name| self.new_dispatcher(name))
            .add_subscribers(listeners);
    }

    /// Subscribes one listener to every name in `names`.
    pub async fn add_event_listener<I, S>(&self, listener: ListenerRef<V>, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dispatchers = self.dispatchers.write().await;
        for name in names {
            dispatchers
                .entry(name.into())
                .or_insert_with_key(|name| self.new_dispatcher(name))
                .add_subscriber(Arc::clone(&listener));
        }
    }

    /// Removes the whole dispatcher for `name` and returns the emitter for chaining.
    pub async fn off(&self, name: &str) -> &Self {
        self.remove_event_listeners(name).await;
        self
    }

    /// Removes the whole dispatcher for `name`. Returns `true` if it existed.
    pub async fn remove_event_listeners(&self, name: &str) -> bool {
        let removed = self.dispatchers.write().await.remove(name).is_some();
        if removed {
            tracing::debug!(event = name, "event dispatcher removed");
        }
        removed
    }

    /// Unsubscribes `listener` from every event.
    ///
    /// Dispatchers left empty are kept; use [`off`](Self::off) to drop a name.
    pub async fn remove_event_listener(&self, listener: &ListenerRef<V>) {
        let mut dispatchers = self.dispatchers.write().await;
        for dispatcher in dispatchers.values_mut() {
            dispatcher.remove_subscriber(listener);
        }
    }

    /// Fires `name` with `payload`.
    ///
    /// Returns whatever the dispatcher's strategy returns; `Ok(())` for unknown names.
    pub async fn fire(&self, name: &str, payload: V) -> Result<(), ListenerError> {
        self.fire_event(Event::new(name, payload)).await
    }

    /// Fires a pre-built event (e.g. one carrying a context or delivery mode).
    pub async fn fire_event(&self, event: Event<V>) -> Result<(), ListenerError> {
        let event = Arc::new(event);
        let delivery = {
            let dispatchers = self.dispatchers.read().await;
            match dispatchers.get(event.name()) {
                Some(dispatcher) => dispatcher.dispatch(Arc::clone(&event)),
                None => return Ok(()),
            }
        };
        delivery.await
    }

    /// Returns sorted list of registered event names.
    pub async fn event_names(&self) -> Vec<String> {
        let dispatchers = self.dispatchers.read().await;
        let mut names: Vec<String> = dispatchers.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if `name` has a dispatcher.
    pub async fn has_event(&self, name: &str) -> bool {
        self.dispatchers.read().await.contains_key(name)
    }

    /// Number of subscriptions for `name` (0 if unknown).
    pub async fn listener_count(&self, name: &str) -> usize {
        self.dispatchers
            .read()
            .await
            .get(name)
            .map(Dispatcher::len)
            .unwrap_or(0)
    }

    fn new_dispatcher(&self, name: &str) -> Dispatcher<V> {
        let strategy = self
            .overrides
            .get(name)
            .unwrap_or(&self.strategy)
            .clone();
        tracing::debug!(event = name, strategy = strategy.name(), "event dispatcher created");
        Dispatcher::new(strategy)
    }
}

impl<V: Payload> Default for Emitter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Payload> fmt::Debug for Emitter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("strategy", &self.strategy.name())
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::listeners::Callback;
    use crate::testing::{counting, counting_with_id, hits};

    #[tokio::test]
    async fn test_fire_unknown_is_noop() {
        let emitter = Emitter::<u8>::new();
        assert_eq!(emitter.fire("nothing", 1).await, Ok(()));
        assert!(!emitter.has_event("nothing").await);
    }

    #[tokio::test]
    async fn test_off_drops_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let emitter = Emitter::<u8>::new();
        emitter.on("ping", [counting(&counter, Ok(()))]).await;

        emitter.off("ping").await;

        assert_eq!(emitter.fire("ping", 0).await, Ok(()));
        assert_eq!(hits(&counter), 0);
        assert!(!emitter.has_event("ping").await);
    }

    #[tokio::test]
    async fn test_remove_event_listener_everywhere() {
        let removed = Arc::new(AtomicUsize::new(0));
        let kept = Arc::new(AtomicUsize::new(0));
        let listener = counting(&removed, Ok(()));
        let emitter = Emitter::<u8>::new();

        emitter
            .add_event_listener(Arc::clone(&listener), ["a", "b", "c"])
            .await;
        emitter.on("b", [counting(&kept, Ok(()))]).await;
        emitter.remove_event_listener(&listener).await;

        for name in ["a", "b", "c"] {
            emitter.fire(name, 0).await.expect("fire");
        }
        assert_eq!(hits(&removed), 0);
        assert_eq!(hits(&kept), 1);
        assert_eq!(emitter.event_names().await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_identity_replacement_across_on_calls() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let emitter = Emitter::<u8>::new();

        emitter.on("x", [counting_with_id("X", &first, Ok(()))]).await;
        emitter.on("x", [counting_with_id("X", &second, Ok(()))]).await;
        emitter.fire("x", 0).await.expect("fire");
        emitter.fire("x", 0).await.expect("fire");

        assert_eq!(hits(&first), 0);
        assert_eq!(hits(&second), 2);
        assert_eq!(emitter.listener_count("x").await, 1);
    }

    #[tokio::test]
    async fn test_event_override_survives_off() {
        let emitter = Emitter::<u8>::builder()
            .with_event_strategy("waited", Strategy::parallel_wait())
            .build();
        let counter = Arc::new(AtomicUsize::new(0));
        let failing = || counting(&counter, Err(ListenerError::fail("boom")));

        emitter.on("waited", [failing(), failing()]).await;
        assert_eq!(emitter.fire("waited", 0).await, Err(ListenerError::fail("boom")));
        assert_eq!(hits(&counter), 2);

        emitter.off("waited").await.on("waited", [failing()]).await;
        assert_eq!(emitter.fire("waited", 0).await, Err(ListenerError::fail("boom")));
        assert_eq!(hits(&counter), 3);
    }

    #[tokio::test]
    async fn test_listener_may_subscribe_during_delivery() {
        let emitter = Arc::new(Emitter::<u8>::new());
        let counter = Arc::new(AtomicUsize::new(0));
        let late = counting(&counter, Ok(()));

        let reentrant: ListenerRef<u8> = {
            let emitter = Arc::clone(&emitter);
            Callback::arc(move |_ev: Arc<Event<u8>>| {
                let emitter = Arc::clone(&emitter);
                let late = Arc::clone(&late);
                async move {
                    emitter.on("late", [late]).await;
                    Ok::<_, ListenerError>(())
                }
            })
        };
        emitter.on("outer", [reentrant]).await;

        emitter.fire("outer", 0).await.expect("fire");
        emitter.fire("late", 0).await.expect("fire");

        assert_eq!(hits(&counter), 1);
    }
}
