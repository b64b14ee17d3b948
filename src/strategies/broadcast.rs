//! # Sequential broadcast
//!
//! Invokes listeners one after another on the caller's task.
//!
//! ## Rules
//! - Stops and returns the first [`ListenerError::Fail`] / [`ListenerError::Panicked`].
//! - A panicking listener is caught and reported as [`ListenerError::Panicked`].
//! - [`ListenerError::Aborted`] marks the event aborted, stops delivery, returns `Ok(())`.
//! - A listener calling [`Event::abort`] stops delivery before the next listener.
//! - Listeners after the stopping point are not invoked.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::{ListenerError, panic_info};
use crate::events::{Event, Payload};
use crate::listeners::ListenerRef;

/// Delivers `event` to each subscriber in turn.
pub async fn broadcast<V: Payload>(
    event: Arc<Event<V>>,
    subscribers: Vec<ListenerRef<V>>,
) -> Result<(), ListenerError> {
    for listener in subscribers {
        if event.is_aborted() {
            break;
        }
        let outcome = AssertUnwindSafe(listener.handle(Arc::clone(&event)))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ListenerError::Panicked {
                    info: panic_info(panic.as_ref()),
                })
            });
        match outcome {
            Ok(()) => {}
            Err(ListenerError::Aborted) => {
                event.abort();
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
