//! Test helpers shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ListenerError;
use crate::events::Event;
use crate::listeners::{Callback, ListenerRef};

/// Listener that increments `hits` and then returns `result`.
pub(crate) fn counting<V: crate::events::Payload>(
    hits: &Arc<AtomicUsize>,
    result: Result<(), ListenerError>,
) -> ListenerRef<V> {
    let hits = Arc::clone(hits);
    Callback::arc(move |_ev: Arc<Event<V>>| {
        hits.fetch_add(1, Ordering::SeqCst);
        let result = result.clone();
        async move { result }
    })
}

/// Identified variant of [`counting`].
pub(crate) fn counting_with_id<V: crate::events::Payload>(
    id: &'static str,
    hits: &Arc<AtomicUsize>,
    result: Result<(), ListenerError>,
) -> ListenerRef<V> {
    let hits = Arc::clone(hits);
    Callback::arc_with_id(id, move |_ev: Arc<Event<V>>| {
        hits.fetch_add(1, Ordering::SeqCst);
        let result = result.clone();
        async move { result }
    })
}

/// Reads a counter.
pub(crate) fn hits(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
