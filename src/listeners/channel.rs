//! # Channel-backed listener
//!
//! [`Channel`] forwards every delivered event into a bounded
//! [`tokio::sync::mpsc`] queue, turning push delivery into a pull stream.
//!
//! ## Rules
//! - `handle` waits for queue capacity (backpressure on the strategy).
//! - A dropped receiver makes every later delivery fail with [`ListenerError::Fail`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::ListenerError;
use crate::events::{Event, Payload};
use crate::listeners::listener::Listener;

/// Listener that sends events into an mpsc queue.
pub struct Channel<V> {
    tx: mpsc::Sender<Arc<Event<V>>>,
}

impl<V: Payload> Channel<V> {
    /// Wraps an existing sender.
    pub fn new(tx: mpsc::Sender<Arc<Event<V>>>) -> Self {
        Self { tx }
    }

    /// Creates a queue of `capacity` (min 1) and returns the listener with its receiver.
    pub fn bounded(capacity: usize) -> (Arc<Self>, mpsc::Receiver<Arc<Event<V>>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Arc::new(Self::new(tx)), rx)
    }
}

#[async_trait]
impl<V: Payload> Listener<V> for Channel<V> {
    async fn handle(&self, event: Arc<Event<V>>) -> Result<(), ListenerError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ListenerError::fail("channel closed"))
    }

    fn name(&self) -> &'static str {
        "Channel"
    }
}
