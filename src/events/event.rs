//! # Events delivered to listeners.
//!
//! An [`Event`] carries a name, a payload of the emitter's payload type `V`, a
//! [`Context`] for out-of-band data and a one-way `aborted` flag.
//!
//! One event instance is created per [`Emitter::fire`](crate::Emitter::fire) call and
//! shared as `Arc<Event<V>>` by every listener the strategy invokes.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore creation order when parallel strategies deliver out of order.
//!
//! ## Example
//! ```rust
//! use eventvisor::{DeliveryMode, Event};
//!
//! let ev = Event::new("user.created", 42u64).with_mode(DeliveryMode::Sync);
//!
//! assert_eq!(ev.name(), "user.created");
//! assert_eq!(*ev.payload(), 42);
//! assert!(!ev.is_aborted());
//! ev.abort();
//! assert!(ev.is_aborted());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::SystemTime;

use super::context::Context;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Context key requesting synchronous delivery from the conditional strategy.
pub(crate) const SYNC_KEY: &str = "_sync";
/// Context key requesting parallel delivery with a joined result.
pub(crate) const WAIT_KEY: &str = "_wait";

/// Bound shared by every payload type.
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}

/// Delivery mode requested by the caller, honored by
/// [`Strategy::conditional`](crate::Strategy::conditional).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Fire-and-forget parallel delivery.
    #[default]
    Async,
    /// Sequential delivery on the caller's task (abort-aware, stops on error).
    Sync,
    /// Parallel delivery, waits for all listeners and reports an error if any failed.
    Wait,
}

/// A named event with payload.
pub struct Event<V> {
    name: String,
    payload: V,
    context: Context,
    aborted: AtomicBool,
    seq: u64,
    at: SystemTime,
}

impl<V> Event<V> {
    /// Creates a new event, stamping the sequence number and wall-clock time.
    pub fn new(name: impl Into<String>, payload: V) -> Self {
        Self {
            name: name.into(),
            payload,
            context: Context::new(),
            aborted: AtomicBool::new(false),
            seq: EVENT_SEQ.fetch_add(1, Ordering::Relaxed) + 1,
            at: SystemTime::now(),
        }
    }

    /// Replaces the event context.
    ///
    /// A delivery marker already stamped by [`with_mode`](Self::with_mode) is kept
    /// unless `context` carries its own.
    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        if !context.contains(SYNC_KEY) && !context.contains(WAIT_KEY) {
            for key in [SYNC_KEY, WAIT_KEY] {
                if self.context.contains(key) {
                    context.set(key, ());
                }
            }
        }
        self.context = context;
        self
    }

    /// Stamps the delivery marker for `mode` into the context.
    #[must_use]
    pub fn with_mode(self, mode: DeliveryMode) -> Self {
        self.context.remove(SYNC_KEY);
        self.context.remove(WAIT_KEY);
        match mode {
            DeliveryMode::Async => {}
            DeliveryMode::Sync => self.context.set(SYNC_KEY, ()),
            DeliveryMode::Wait => self.context.set(WAIT_KEY, ()),
        }
        self
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Event payload.
    pub fn payload(&self) -> &V {
        &self.payload
    }

    /// Out-of-band context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Global sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Creation time.
    pub fn at(&self) -> SystemTime {
        self.at
    }

    /// Marks the event as aborted. Sequential strategies stop delivering it.
    ///
    /// The flag never resets.
    pub fn abort(&self) -> &Self {
        self.aborted.store(true, Ordering::Release);
        self
    }

    /// Returns `true` once any listener called [`abort`](Self::abort).
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

impl<V: fmt::Debug> fmt::Debug for Event<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .field("context", &self.context)
            .field("aborted", &self.is_aborted())
            .field("seq", &self.seq)
            .finish()
    }
}

impl<V> fmt::Display for Event<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new("a", ());
        let b = Event::new("b", ());
        assert!(b.seq() > a.seq());
    }

    #[test]
    fn test_mode_markers_replace_each_other() {
        let ev = Event::new("x", ()).with_mode(DeliveryMode::Sync);
        assert!(ev.context().contains(SYNC_KEY));

        let ev = ev.with_mode(DeliveryMode::Wait);
        assert!(!ev.context().contains(SYNC_KEY));
        assert!(ev.context().contains(WAIT_KEY));

        let ev = ev.with_mode(DeliveryMode::Async);
        assert!(ev.context().is_empty());
    }

    #[test]
    fn test_context_after_mode_keeps_marker() {
        let ev = Event::new("x", ())
            .with_mode(DeliveryMode::Wait)
            .with_context(Context::new().with("user", 7u32));

        assert!(ev.context().contains(WAIT_KEY));
        assert_eq!(ev.context().get::<u32>("user").as_deref(), Some(&7));

        let ev = ev.with_context(Context::new().with(SYNC_KEY, ()));
        assert!(ev.context().contains(SYNC_KEY));
        assert!(!ev.context().contains(WAIT_KEY));
    }

    #[test]
    fn test_display_is_name() {
        let ev = Event::new("ping", 1u8);
        assert_eq!(ev.to_string(), "ping");
    }
}
