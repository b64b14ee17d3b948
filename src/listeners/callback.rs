//! # Function-backed listener (`Callback`)
//!
//! [`Callback`] wraps a closure `F: Fn(Arc<Event<V>>) -> Fut`, producing a fresh
//! future per delivery. If shared state is needed, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Callback, Event, ListenerError, ListenerRef};
//!
//! let l: ListenerRef<u32> = Callback::arc(|ev: Arc<Event<u32>>| async move {
//!     if *ev.payload() == 0 {
//!         return Err(ListenerError::fail("zero"));
//!     }
//!     Ok(())
//! });
//!
//! let named: ListenerRef<u32> =
//!     Callback::arc_with_id("metrics", |_ev: Arc<Event<u32>>| async { Ok::<_, ListenerError>(()) });
//! assert_eq!(named.id(), Some("metrics"));
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::{Event, Payload};
use crate::listeners::listener::Listener;

/// Function-backed listener implementation.
#[derive(Debug)]
pub struct Callback<F> {
    id: Option<Cow<'static, str>>,
    f: F,
}

impl<F> Callback<F> {
    /// Creates an anonymous callback listener.
    ///
    /// Prefer [`Callback::arc`] when you immediately need a [`ListenerRef`](crate::ListenerRef).
    pub fn new(f: F) -> Self {
        Self { id: None, f }
    }

    /// Creates a callback listener with a stable identity.
    pub fn with_id(id: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            id: Some(id.into()),
            f,
        }
    }

    /// Creates an anonymous callback and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }

    /// Creates an identified callback and returns it as a shared handle.
    pub fn arc_with_id(id: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::with_id(id, f))
    }
}

#[async_trait]
impl<V, F, Fut> Listener<V> for Callback<F>
where
    V: Payload,
    F: Fn(Arc<Event<V>>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), ListenerError>> + Send + 'static,
{
    async fn handle(&self, event: Arc<Event<V>>) -> Result<(), ListenerError> {
        (self.f)(event).await
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn name(&self) -> &'static str {
        "Callback"
    }
}
