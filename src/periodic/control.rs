//! # Control loop owning every periodic timer.
//!
//! One task owns the live timers and is their only mutator. Structural changes arrive
//! as [`Command`]s over a bounded queue and are applied between deliveries, so the
//! wait-set never changes while it is being awaited.
//!
//! ## Architecture
//! ```text
//! PeriodicEmitter ── Command ──► mpsc ──┐
//!                                       ▼
//!   loop { select! (biased) {
//!     stop.cancelled()            ─► break
//!     rx.recv()                   ─► Register | Remove | Events   (ack via oneshot)
//!     select_all(slots[i].tick()) ─► Some(at) → emitter.fire(slots[i].name, Tick)
//!                                    None     → drop slots[i]
//!   }}
//!   shutdown: close rx, drop every timer, emitter.off(name) for each
//! ```
//!
//! ## Rules
//! - Deliveries run inline on the loop task: a slow listener delays every periodic
//!   event and every pending command until it returns.
//! - Delivery errors are logged and never end the loop; a panic escaping the
//!   strategy is caught and logged the same way.
//! - Re-registering a live name swaps its timer in place; the old timer is dropped.
//! - A tick source that ends is dropped; the event's listeners stay subscribed.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use futures::future;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::core::Emitter;
use crate::error::{ListenerError, panic_info};
use crate::events::Payload;
use crate::listeners::ListenerRef;

use super::timer::{Tick, Timer};

/// Requests handled by the control loop.
pub(crate) enum Command<V: Payload> {
    Register {
        name: String,
        timer: Timer,
        listeners: Vec<ListenerRef<V>>,
        ack: oneshot::Sender<()>,
    },
    Remove {
        name: String,
        ack: oneshot::Sender<bool>,
    },
    Events {
        reply: oneshot::Sender<Vec<String>>,
    },
}

/// One live timer in the wait-set.
struct Slot {
    name: String,
    timer: Timer,
    ticks: u64,
}

pub(crate) struct ControlLoop<V: Payload> {
    emitter: Arc<Emitter<V>>,
    rx: mpsc::Receiver<Command<V>>,
    slots: Vec<Slot>,
}

impl<V: Payload + From<Tick>> ControlLoop<V> {
    pub(crate) fn new(emitter: Arc<Emitter<V>>, rx: mpsc::Receiver<Command<V>>) -> Self {
        Self {
            emitter,
            rx,
            slots: Vec::new(),
        }
    }

    /// Runs until `stop` is cancelled or every command sender is gone.
    ///
    /// `done` is cancelled on exit.
    pub(crate) async fn run(mut self, stop: CancellationToken, done: CancellationToken) {
        let _done = done.drop_guard();
        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => break,
                cmd = self.rx.recv() => match cmd {
                    Some(cmd) => self.execute(cmd).await,
                    None => break,
                },
                (index, tick) = next_tick(&mut self.slots) => match tick {
                    Some(at) => self.deliver(index, at).await,
                    None => self.expire(index),
                },
            }
        }

        self.shutdown().await;
    }

    async fn execute(&mut self, cmd: Command<V>) {
        match cmd {
            Command::Register {
                name,
                timer,
                listeners,
                ack,
            } => {
                self.install(name, timer, listeners).await;
                let _ = ack.send(());
            }
            Command::Remove { name, ack } => {
                let removed = self.remove(&name).await;
                let _ = ack.send(removed);
            }
            Command::Events { reply } => {
                let mut names: Vec<String> = self.slots.iter().map(|s| s.name.clone()).collect();
                names.sort_unstable();
                let _ = reply.send(names);
            }
        }
    }

    async fn install(&mut self, name: String, timer: Timer, listeners: Vec<ListenerRef<V>>) {
        match self.position(&name) {
            Some(pos) => {
                let slot = &mut self.slots[pos];
                slot.timer = timer;
                slot.ticks = 0;
                tracing::debug!(event = %name, "periodic timer replaced");
            }
            None => {
                self.slots.push(Slot {
                    name: name.clone(),
                    timer,
                    ticks: 0,
                });
                tracing::debug!(event = %name, timers = self.slots.len(), "periodic timer registered");
            }
        }

        if !listeners.is_empty() {
            self.emitter.add_event_listeners(name, listeners).await;
        }
    }

    async fn remove(&mut self, name: &str) -> bool {
        let Some(pos) = self.position(name) else {
            return false;
        };
        self.slots.remove(pos);
        self.emitter.off(name).await;
        tracing::debug!(event = name, timers = self.slots.len(), "periodic timer removed");
        true
    }

    async fn deliver(&mut self, index: usize, at: Instant) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        slot.ticks += 1;
        let name = slot.name.clone();
        let tick = Tick {
            event: name.clone(),
            at,
            seq: slot.ticks,
        };

        let outcome = AssertUnwindSafe(self.emitter.fire(&name, V::from(tick)))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ListenerError::Panicked {
                    info: panic_info(panic.as_ref()),
                })
            });
        if let Err(err) = outcome {
            tracing::warn!(
                event = %name,
                error = %err,
                label = err.as_label(),
                "periodic delivery failed"
            );
        }
    }

    fn expire(&mut self, index: usize) {
        if index < self.slots.len() {
            let slot = self.slots.remove(index);
            tracing::debug!(event = %slot.name, ticks = slot.ticks, "periodic timer source ended");
        }
    }

    async fn shutdown(&mut self) {
        self.rx.close();
        for slot in std::mem::take(&mut self.slots) {
            self.emitter.off(&slot.name).await;
        }
        tracing::debug!("periodic control loop stopped");
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }
}

/// Waits for the first timer in `slots` to tick; pends forever when there are none.
async fn next_tick(slots: &mut [Slot]) -> (usize, Option<Instant>) {
    if slots.is_empty() {
        return future::pending().await;
    }
    let waits = slots.iter_mut().map(|slot| slot.timer.tick().boxed());
    let (tick, index, _) = future::select_all(waits).await;
    (index, tick)
}
