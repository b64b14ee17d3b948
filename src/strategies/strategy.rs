//! # Dispatch strategy as a function value.
//!
//! [`Strategy`] decides how a snapshot of subscribers is invoked for one event and how
//! their results are combined. It is a cloneable closure, not a trait hierarchy: new
//! policies are new values built with [`Strategy::new`].
//!
//! ## Built-in strategies
//! | Constructor                      | Delivery                           | Result                          |
//! |----------------------------------|------------------------------------|---------------------------------|
//! | [`Strategy::broadcast`]          | sequential, caller's task          | first error; aborts swallowed   |
//! | [`Strategy::parallel`]           | one spawned task per listener      | always `Ok`, errors logged only |
//! | [`Strategy::parallel_wait`]      | one spawned task per listener      | an error if any listener failed |
//! | [`Strategy::conditional`]        | per-event, from [`DeliveryMode`](crate::DeliveryMode) | as selected |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Event, ListenerRef, Strategy};
//!
//! // Deliver only to the first subscriber.
//! let first_only: Strategy<u32> = Strategy::new(
//!     "first_only",
//!     |event: Arc<Event<u32>>, subs: Vec<ListenerRef<u32>>| async move {
//!         match subs.into_iter().next() {
//!             Some(listener) => listener.handle(event).await,
//!             None => Ok(()),
//!         }
//!     },
//! );
//! assert_eq!(first_only.name(), "first_only");
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::ListenerError;
use crate::events::{Event, Payload};
use crate::listeners::ListenerRef;

use super::{broadcast, conditional, parallel, parallel_wait};

/// Future returned by a strategy. Owns everything it needs.
pub type DispatchFuture = BoxFuture<'static, Result<(), ListenerError>>;

type StrategyFn<V> = dyn Fn(Arc<Event<V>>, Vec<ListenerRef<V>>) -> DispatchFuture + Send + Sync;

/// Delivery policy bound to a [`Dispatcher`](crate::Dispatcher).
pub struct Strategy<V> {
    name: &'static str,
    f: Arc<StrategyFn<V>>,
}

impl<V: Payload> Strategy<V> {
    /// Builds a strategy from a closure or async fn.
    pub fn new<F, Fut>(name: &'static str, f: F) -> Self
    where
        F: Fn(Arc<Event<V>>, Vec<ListenerRef<V>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        Self {
            name,
            f: Arc::new(
                move |event: Arc<Event<V>>, subscribers: Vec<ListenerRef<V>>| -> DispatchFuture {
                    f(event, subscribers).boxed()
                },
            ),
        }
    }

    /// Sequential, abort-aware, stops on the first error. Default for new event names.
    pub fn broadcast() -> Self {
        Self::new("broadcast", broadcast::<V>)
    }

    /// Fire-and-forget: spawns every listener and returns immediately.
    pub fn parallel() -> Self {
        Self::new("parallel", parallel::<V>)
    }

    /// Spawns every listener, waits for all, reports an error if any failed.
    pub fn parallel_wait() -> Self {
        Self::new("parallel_wait", parallel_wait::<V>)
    }

    /// Chooses per event from its [`DeliveryMode`](crate::DeliveryMode) marker.
    pub fn conditional() -> Self {
        Self::new("conditional", conditional::<V>)
    }

    /// Strategy name (for logs).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the strategy over `subscribers`.
    pub fn dispatch(&self, event: Arc<Event<V>>, subscribers: Vec<ListenerRef<V>>) -> DispatchFuture {
        (self.f)(event, subscribers)
    }
}

impl<V> Clone for Strategy<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            f: Arc::clone(&self.f),
        }
    }
}

impl<V: Payload> Default for Strategy<V> {
    fn default() -> Self {
        Self::broadcast()
    }
}

impl<V> fmt::Debug for Strategy<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}
