//! # Parallel delivery
//!
//! Two policies that run one tokio task per listener:
//!
//! ```text
//! parallel(event, subs)            parallel_wait(event, subs)
//!   ├──► spawn(l1.handle)            ├──► JoinSet::spawn(l1.handle)
//!   ├──► spawn(l2.handle)            ├──► JoinSet::spawn(l2.handle)
//!   └──► return Ok(())               └──► join all ──► first error | Ok(())
//! ```
//!
//! ## Rules
//! - `parallel` never reports listener errors; they are logged at `debug`.
//!   Spawned tasks outlive the call.
//! - `parallel_wait` invokes every listener exactly once and waits for all of them.
//!   It returns the first genuine error to complete; aborts are not errors.
//!   A panicking listener is reported as [`ListenerError::Panicked`].
//! - Dropping the `parallel_wait` future cancels listeners that have not finished.
//! - Both require a tokio runtime.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::{ListenerError, panic_info};
use crate::events::{Event, Payload};
use crate::listeners::ListenerRef;

/// Spawns every listener and returns immediately.
pub async fn parallel<V: Payload>(
    event: Arc<Event<V>>,
    subscribers: Vec<ListenerRef<V>>,
) -> Result<(), ListenerError> {
    for listener in subscribers {
        let event = Arc::clone(&event);
        tokio::spawn(async move {
            match listener.handle(Arc::clone(&event)).await {
                Ok(()) | Err(ListenerError::Aborted) => {}
                Err(err) => {
                    tracing::debug!(
                        event = event.name(),
                        listener = listener.name(),
                        error = %err,
                        "fire-and-forget listener failed"
                    );
                }
            }
        });
    }
    Ok(())
}

/// Spawns every listener and waits for all of them.
pub async fn parallel_wait<V: Payload>(
    event: Arc<Event<V>>,
    subscribers: Vec<ListenerRef<V>>,
) -> Result<(), ListenerError> {
    let mut set = JoinSet::new();
    for listener in subscribers {
        let event = Arc::clone(&event);
        set.spawn(async move { listener.handle(event).await });
    }

    let mut first: Option<ListenerError> = None;
    while let Some(joined) = set.join_next().await {
        let outcome = match joined {
            Ok(res) => res,
            Err(je) if je.is_panic() => Err(ListenerError::Panicked {
                info: panic_info(je.into_panic().as_ref()),
            }),
            Err(_) => Err(ListenerError::fail("listener task cancelled")),
        };
        match outcome {
            Ok(()) | Err(ListenerError::Aborted) => {}
            Err(err) => {
                first.get_or_insert(err);
            }
        }
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
