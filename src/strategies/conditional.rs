//! # Conditional delivery
//!
//! Reads the delivery marker stamped by [`Event::with_mode`] and consumes it:
//!
//! ```text
//! context has "_sync"  ──► remove ──► broadcast      (sequential, abort-aware)
//! context has "_wait"  ──► remove ──► parallel_wait  (parallel, joined result)
//! otherwise            ──────────────► parallel       (fire-and-forget)
//! ```

use std::sync::Arc;

use crate::error::ListenerError;
use crate::events::{Event, Payload, SYNC_KEY, WAIT_KEY};
use crate::listeners::ListenerRef;

use super::{broadcast, parallel, parallel_wait};

/// Delivers according to the event's [`DeliveryMode`](crate::DeliveryMode) marker.
pub async fn conditional<V: Payload>(
    event: Arc<Event<V>>,
    subscribers: Vec<ListenerRef<V>>,
) -> Result<(), ListenerError> {
    if event.context().remove(SYNC_KEY) {
        broadcast(event, subscribers).await
    } else if event.context().remove(WAIT_KEY) {
        parallel_wait(event, subscribers).await
    } else {
        parallel(event, subscribers).await
    }
}
