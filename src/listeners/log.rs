//! # LogWriter: simple event logger
//!
//! A minimal listener that logs every delivered [`Event`] through `tracing` at `info`.
//! Use it for tests or demos; it never fails and never aborts.
//!
//! ## Example output (with a `fmt` subscriber)
//! ```text
//! INFO eventvisor::listeners::log: event delivered event="metrics.flush" seq=12 payload=Tick { .. }
//! ```

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::{Event, Payload};
use crate::listeners::listener::Listener;

/// Event writer listener.
#[derive(Default, Debug)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<V: Payload + Debug> Listener<V> for LogWriter {
    async fn handle(&self, event: Arc<Event<V>>) -> Result<(), ListenerError> {
        tracing::info!(
            event = event.name(),
            seq = event.seq(),
            payload = ?event.payload(),
            "event delivered"
        );
        Ok(())
    }

    fn id(&self) -> Option<&str> {
        Some("LogWriter")
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::ListenerRef;

    #[tokio::test]
    async fn test_log_writer_never_fails() {
        let l: ListenerRef<&'static str> = Arc::new(LogWriter::new());
        assert_eq!(l.handle(Arc::new(Event::new("x", "payload"))).await, Ok(()));
        assert_eq!(l.id(), Some("LogWriter"));
    }
}
