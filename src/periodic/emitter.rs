//! # Periodic multiplexer handle.
//!
//! [`PeriodicEmitter`] owns one control loop task that fires named events on timers
//! through a shared [`Emitter`]. Every method is a command to that task; the call
//! returns once the loop has applied it.
//!
//! ## Rules
//! - After [`stop`](PeriodicEmitter::stop) every command returns [`PeriodicError::Stopped`].
//! - Dropping the handle stops the loop.
//! - Listeners run on the loop task. A listener must not await `register_event`,
//!   `remove_event` or `events` on the same multiplexer: the loop cannot answer while
//!   it is delivering, so the call never completes.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::config::PeriodicConfig;
use crate::core::Emitter;
use crate::error::PeriodicError;
use crate::events::Payload;
use crate::listeners::ListenerRef;

use super::control::{Command, ControlLoop};
use super::timer::{Period, Tick, Timer};

/// Fires named events on timers.
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use eventvisor::{Callback, Emitter, Event, ListenerError, ListenerRef, PeriodicEmitter, Tick};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let periodic = PeriodicEmitter::<Tick>::new(Arc::new(Emitter::new()));
///     let print: ListenerRef<Tick> = Callback::arc(|ev: Arc<Event<Tick>>| async move {
///         println!("{} #{}", ev.name(), ev.payload().seq);
///         Ok::<_, ListenerError>(())
///     });
///
///     periodic
///         .register_event("heartbeat", Duration::from_secs(1), [print])
///         .await?;
///     assert_eq!(periodic.events().await?, vec!["heartbeat"]);
///
///     periodic.stop();
///     periodic.stopped().await;
///     Ok(())
/// }
/// ```
pub struct PeriodicEmitter<V: Payload> {
    emitter: Arc<Emitter<V>>,
    tx: mpsc::Sender<Command<V>>,
    cfg: PeriodicConfig,
    stop: CancellationToken,
    done: CancellationToken,
}

impl<V: Payload + From<Tick>> PeriodicEmitter<V> {
    /// Creates a multiplexer with [`PeriodicConfig::default`].
    ///
    /// Spawns the control loop, so it must be called inside a Tokio runtime.
    pub fn new(emitter: Arc<Emitter<V>>) -> Self {
        Self::with_config(emitter, PeriodicConfig::default())
    }

    /// Creates a multiplexer with a custom configuration.
    pub fn with_config(emitter: Arc<Emitter<V>>, cfg: PeriodicConfig) -> Self {
        let (tx, rx) = mpsc::channel(cfg.command_capacity_clamped());
        let stop = CancellationToken::new();
        let done = CancellationToken::new();

        let control = ControlLoop::new(Arc::clone(&emitter), rx);
        tokio::spawn(control.run(stop.clone(), done.clone()));

        Self {
            emitter,
            tx,
            cfg,
            stop,
            done,
        }
    }

    /// Emitter the periodic events are fired through.
    pub fn emitter(&self) -> &Arc<Emitter<V>> {
        &self.emitter
    }

    /// Registers a timer for `name` and subscribes `listeners` to it.
    ///
    /// Re-registering a live name replaces its timer (the old one stops) and adds
    /// `listeners` to the existing subscribers.
    ///
    /// # Errors
    /// - [`PeriodicError::InvalidPeriod`] for a zero [`Period::Every`];
    /// - [`PeriodicError::Stopped`] once the loop has stopped.
    pub async fn register_event(
        &self,
        name: impl Into<String>,
        period: impl Into<Period>,
        listeners: impl IntoIterator<Item = ListenerRef<V>>,
    ) -> Result<(), PeriodicError> {
        let name = name.into();
        let timer = Timer::from_period(&name, period.into(), self.cfg.missed_tick)?;
        let listeners = listeners.into_iter().collect();

        let (ack, rx) = oneshot::channel();
        self.send(Command::Register {
            name,
            timer,
            listeners,
            ack,
        })
        .await?;
        rx.await.map_err(|_| PeriodicError::Stopped)
    }

    /// Stops the timer for `name` and removes the event from the emitter.
    ///
    /// Returns `Ok(false)` if no timer was registered under `name`.
    pub async fn remove_event(&self, name: &str) -> Result<bool, PeriodicError> {
        let (ack, rx) = oneshot::channel();
        self.send(Command::Remove {
            name: name.to_string(),
            ack,
        })
        .await?;
        rx.await.map_err(|_| PeriodicError::Stopped)
    }

    /// Sorted names of the live timers.
    pub async fn events(&self) -> Result<Vec<String>, PeriodicError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Events { reply }).await?;
        rx.await.map_err(|_| PeriodicError::Stopped)
    }

    async fn send(&self, cmd: Command<V>) -> Result<(), PeriodicError> {
        if self.stop.is_cancelled() {
            return Err(PeriodicError::Stopped);
        }
        self.tx.send(cmd).await.map_err(|_| PeriodicError::Stopped)
    }
}

impl<V: Payload> PeriodicEmitter<V> {
    /// Requests shutdown. Idempotent; returns immediately.
    ///
    /// Use [`stopped`](Self::stopped) to wait until every timer is gone.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Waits until the control loop has exited.
    pub async fn stopped(&self) {
        self.done.cancelled().await;
    }

    /// Returns `true` once shutdown was requested or the loop has exited.
    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled() || self.done.is_cancelled()
    }
}

impl<V: Payload> Drop for PeriodicEmitter<V> {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use futures::StreamExt;
    use tokio::time;

    use crate::error::ListenerError;
    use crate::events::Event;
    use crate::listeners::Callback;
    use crate::testing::{counting, hits};

    fn periodic() -> PeriodicEmitter<Tick> {
        PeriodicEmitter::new(Arc::new(Emitter::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_period() {
        let periodic = periodic();
        let count = Arc::new(AtomicUsize::new(0));

        periodic
            .register_event("t", Duration::from_millis(100), [counting(&count, Ok(()))])
            .await
            .unwrap();
        time::sleep(Duration::from_millis(1050)).await;

        let n = hits(&count);
        assert!((9..=10).contains(&n), "got {n} ticks");
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_payload_counts_per_registration() {
        let periodic = periodic();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let record: ListenerRef<Tick> = Callback::arc(move |ev: Arc<Event<Tick>>| {
            let _ = tx.send(ev.payload().clone());
            async { Ok::<_, ListenerError>(()) }
        });

        periodic
            .register_event("beat", Duration::from_millis(10), [record])
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.event, "beat");
        assert_eq!((first.seq, second.seq), (1, 2));
        assert!(second.at > first.at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_event_stops_ticks() {
        let periodic = periodic();
        let count = Arc::new(AtomicUsize::new(0));

        periodic
            .register_event("t", Duration::from_millis(100), [counting(&count, Ok(()))])
            .await
            .unwrap();
        time::sleep(Duration::from_millis(350)).await;

        assert!(periodic.remove_event("t").await.unwrap());
        let seen = hits(&count);
        time::sleep(Duration::from_millis(500)).await;

        assert_eq!(hits(&count), seen);
        assert!(!periodic.emitter().has_event("t").await);
        assert!(!periodic.remove_event("t").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_ticks() {
        let periodic = periodic();
        let count = Arc::new(AtomicUsize::new(0));

        periodic
            .register_event("t", Duration::from_millis(100), [counting(&count, Ok(()))])
            .await
            .unwrap();

        periodic.stop();
        periodic.stop();
        periodic.stopped().await;
        time::sleep(Duration::from_millis(500)).await;

        assert_eq!(hits(&count), 0);
        assert!(periodic.is_stopped());
        assert!(!periodic.emitter().has_event("t").await);

        let err = periodic
            .register_event("u", Duration::from_millis(100), [])
            .await
            .unwrap_err();
        assert_eq!(err, PeriodicError::Stopped);
        assert_eq!(periodic.events().await.unwrap_err(), PeriodicError::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reregister_replaces_timer() {
        let periodic = periodic();
        let count = Arc::new(AtomicUsize::new(0));

        periodic
            .register_event("t", Duration::from_millis(100), [counting(&count, Ok(()))])
            .await
            .unwrap();
        periodic
            .register_event("t", Duration::from_secs(10), [])
            .await
            .unwrap();
        time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(hits(&count), 0);
        assert_eq!(periodic.events().await.unwrap(), vec!["t"]);
        assert_eq!(periodic.emitter().listener_count("t").await, 1);
    }

    #[tokio::test]
    async fn test_zero_period_is_rejected() {
        let periodic = periodic();
        let err = periodic
            .register_event("t", Duration::ZERO, [])
            .await
            .unwrap_err();

        assert_eq!(err, PeriodicError::InvalidPeriod { event: "t".into() });
        assert!(periodic.events().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ended_source_is_dropped() {
        let periodic = periodic();
        let count = Arc::new(AtomicUsize::new(0));
        let now = std::time::Instant::now();
        let source = futures::stream::iter([now, now]).boxed();

        periodic
            .register_event("once", Period::Ticks(source), [counting(&count, Ok(()))])
            .await
            .unwrap();

        let mut live = periodic.events().await.unwrap();
        while !live.is_empty() {
            time::sleep(Duration::from_millis(1)).await;
            live = periodic.events().await.unwrap();
        }

        assert_eq!(hits(&count), 2);
        assert_eq!(periodic.emitter().listener_count("once").await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivery_error_keeps_loop_running() {
        let periodic = periodic();
        let count = Arc::new(AtomicUsize::new(0));

        periodic
            .register_event(
                "t",
                Duration::from_millis(100),
                [counting(&count, Err(ListenerError::fail("boom")))],
            )
            .await
            .unwrap();
        time::sleep(Duration::from_millis(350)).await;

        assert!(hits(&count) >= 2);
        assert_eq!(periodic.events().await.unwrap(), vec!["t"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_listener_does_not_starve_other_events() {
        let periodic = periodic();
        let good = Arc::new(AtomicUsize::new(0));
        let bad: ListenerRef<Tick> = Callback::arc(|ev: Arc<Event<Tick>>| async move {
            if ev.payload().seq == 2 {
                panic!("bad listener");
            }
            Ok::<_, ListenerError>(())
        });

        periodic
            .register_event("bad", Duration::from_millis(100), [bad])
            .await
            .unwrap();
        periodic
            .register_event("good", Duration::from_millis(100), [counting(&good, Ok(()))])
            .await
            .unwrap();
        time::sleep(Duration::from_millis(1050)).await;

        let n = hits(&good);
        assert!(n >= 9, "good event starved: only {n} ticks");
        assert!(!periodic.is_stopped());
        assert_eq!(periodic.events().await.unwrap(), vec!["bad", "good"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prebuilt_interval_ticks_until_removed() {
        let periodic = periodic();
        let count = Arc::new(AtomicUsize::new(0));

        periodic
            .register_event(
                "i",
                time::interval(Duration::from_millis(100)),
                [counting(&count, Ok(()))],
            )
            .await
            .unwrap();
        time::sleep(Duration::from_millis(1050)).await;

        // A fresh interval ticks immediately, then once per period.
        let n = hits(&count);
        assert!((10..=11).contains(&n), "got {n} ticks");

        assert!(periodic.remove_event("i").await.unwrap());
        let seen = hits(&count);
        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits(&count), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_loop() {
        let emitter = Arc::new(Emitter::<Tick>::new());
        let count = Arc::new(AtomicUsize::new(0));

        let periodic = PeriodicEmitter::new(Arc::clone(&emitter));
        periodic
            .register_event("t", Duration::from_millis(100), [counting(&count, Ok(()))])
            .await
            .unwrap();
        drop(periodic);

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits(&count), 0);
        assert!(!emitter.has_event("t").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_small_command_queue() {
        let cfg = PeriodicConfig {
            command_capacity: 0,
            ..PeriodicConfig::default()
        };
        let periodic = PeriodicEmitter::<Tick>::with_config(Arc::new(Emitter::new()), cfg);

        for name in ["c", "a", "b"] {
            periodic
                .register_event(name, Duration::from_secs(1), [])
                .await
                .unwrap();
        }
        assert_eq!(periodic.events().await.unwrap(), vec!["a", "b", "c"]);
    }
}
