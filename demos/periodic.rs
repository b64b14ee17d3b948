//! # Example: Periodic events
//!
//! Two timers share one control loop; `LogWriter` prints every tick.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example periodic --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use eventvisor::{
    Callback, Emitter, Event, ListenerError, ListenerRef, LogWriter, Period, PeriodicEmitter, Tick,
};
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let emitter = Arc::new(Emitter::<Tick>::new());
    let periodic = PeriodicEmitter::new(Arc::clone(&emitter));
    let log: ListenerRef<Tick> = Arc::new(LogWriter::new());

    let flush: ListenerRef<Tick> = Callback::arc(|ev: Arc<Event<Tick>>| async move {
        if ev.payload().seq % 3 == 0 {
            return Err(ListenerError::fail("flush backend unavailable"));
        }
        Ok(())
    });

    periodic
        .register_event("heartbeat", Duration::from_millis(200), [Arc::clone(&log)])
        .await?;
    periodic
        .register_event("metrics.flush", Duration::from_millis(500), [Arc::clone(&log), flush])
        .await?;

    // A finite tick source: three quick ticks, then the timer is dropped.
    let burst = burst_ticks();
    periodic
        .register_event("burst", Period::Ticks(burst), [log])
        .await?;

    tokio::time::sleep(Duration::from_millis(1200)).await;
    println!("live timers: {:?}", periodic.events().await?);

    periodic.remove_event("heartbeat").await?;
    tokio::time::sleep(Duration::from_millis(600)).await;

    periodic.stop();
    periodic.stopped().await;
    println!("after stop: events on emitter = {:?}", emitter.event_names().await);
    Ok(())
}

fn burst_ticks() -> futures::stream::BoxStream<'static, std::time::Instant> {
    futures::stream::unfold(0u8, |n| async move {
        if n == 3 {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        Some((std::time::Instant::now(), n + 1))
    })
    .boxed()
}
