//! # Example: Delivery strategies
//!
//! Fires the same event under each built-in strategy and prints what the caller sees.
//!
//! ```bash
//! cargo run --example strategies
//! ```

use std::sync::Arc;
use std::time::Duration;

use eventvisor::{
    Callback, Context, DeliveryMode, Emitter, Event, ListenerError, ListenerRef, Strategy,
};

/// Listener that sleeps, prints, then returns `result`.
fn worker(id: &'static str, work_ms: u64, result: Result<(), ListenerError>) -> ListenerRef<String> {
    Callback::arc_with_id(id, move |ev: Arc<Event<String>>| {
        let result = result.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(work_ms)).await;
            println!("  [{id}] handled {} ({})", ev.name(), ev.payload());
            result
        }
    })
}

fn workers() -> Vec<ListenerRef<String>> {
    vec![
        worker("fast", 10, Ok(())),
        worker("failing", 20, Err(ListenerError::fail("disk full"))),
        worker("slow", 50, Ok(())),
    ]
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    for strategy in [
        Strategy::broadcast(),
        Strategy::parallel(),
        Strategy::parallel_wait(),
    ] {
        println!("== {}", strategy.name());
        let emitter = Emitter::builder().with_default_strategy(strategy).build();
        emitter.on("job", workers()).await;

        let res = emitter.fire("job", "payload".to_string()).await;
        println!("  fire returned: {res:?}");

        // Let fire-and-forget listeners finish before the next round.
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    println!("== conditional");
    let emitter = Emitter::builder()
        .with_default_strategy(Strategy::conditional())
        .build();
    emitter.on("job", workers()).await;

    for mode in [DeliveryMode::Sync, DeliveryMode::Wait, DeliveryMode::Async] {
        let ev = Event::new("job", format!("{mode:?}"))
            .with_context(Context::new().with("request_id", 42u64))
            .with_mode(mode);
        let res = emitter.fire_event(ev).await;
        println!("  {mode:?} fire returned: {res:?}");
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("== abort");
    let gate: ListenerRef<String> = Callback::arc_with_id("gate", |ev: Arc<Event<String>>| async move {
        if ev.payload().is_empty() {
            ev.abort();
        }
        Ok::<_, ListenerError>(())
    });
    let emitter = Emitter::new();
    emitter.on("job", [gate]).await.on("job", workers()).await;
    let res = emitter.fire("job", String::new()).await;
    println!("  empty payload aborted, fire returned: {res:?}");

    Ok(())
}
