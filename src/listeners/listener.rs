//! # Core listener trait
//!
//! `Listener` is the extension point for plugging event handlers into an
//! [`Emitter`](crate::Emitter). A listener is invoked once per delivery decided by the
//! dispatcher's [`Strategy`](crate::Strategy), on the caller's task (sequential
//! strategies) or on a spawned task (parallel strategies).
//!
//! ## Contract
//! - Return `Ok(())` on success, [`ListenerError::Fail`] on failure.
//! - Return [`ListenerError::Aborted`] or call [`Event::abort`] to stop further delivery
//!   of the current event; neither is reported to the caller as an error.
//! - Optionally expose a stable [`id`](Listener::id): within one event name, adding a
//!   listener with the same non-empty id replaces the previous one.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use eventvisor::{Event, Listener, ListenerError};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Listener<String> for Audit {
//!     async fn handle(&self, event: Arc<Event<String>>) -> Result<(), ListenerError> {
//!         if event.payload().is_empty() {
//!             return Err(ListenerError::fail("empty payload"));
//!         }
//!         Ok(())
//!     }
//!
//!     fn id(&self) -> Option<&str> { Some("audit") }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::{Event, Payload};

/// Contract for event listeners.
#[async_trait]
pub trait Listener<V: Payload>: Send + Sync + 'static {
    /// Handle a single event.
    async fn handle(&self, event: Arc<Event<V>>) -> Result<(), ListenerError>;

    /// Stable identity used for replace-on-conflict. `None` or empty means anonymous.
    fn id(&self) -> Option<&str> {
        None
    }

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a listener.
///
/// Two handles refer to the same listener when they point to the same allocation.
pub type ListenerRef<V> = Arc<dyn Listener<V>>;

/// Returns `true` if both handles point to the same listener.
pub(crate) fn same_listener<V: Payload>(a: &ListenerRef<V>, b: &ListenerRef<V>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Returns the listener's identity if it is present and non-empty.
pub(crate) fn identity<V: Payload>(listener: &ListenerRef<V>) -> Option<&str> {
    listener.id().filter(|id| !id.is_empty())
}
