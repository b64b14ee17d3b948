//! # eventvisor
//!
//! **Eventvisor** is an async named-event dispatcher for Rust.
//!
//! Listeners subscribe to event names on an [`Emitter`]. Firing a name hands an
//! [`Event`] to that name's [`Dispatcher`], which delivers it to a snapshot of its
//! subscribers under a pluggable [`Strategy`]. A [`PeriodicEmitter`] fires named
//! events on timers through the same emitter.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   emitter.fire("order.created", payload)
//!            │
//!            ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Emitter (name → Dispatcher registry)                             │
//! │  - RwLock<HashMap<String, Dispatcher>>                            │
//! │  - default Strategy + per-name overrides (EmitterBuilder)         │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Dispatcher  │   │  Dispatcher  │   │  Dispatcher  │
//!     │ subscribers  │   │ subscribers  │   │ subscribers  │
//!     │ + id index   │   │ + id index   │   │ + id index   │
//!     └──────┬───────┘   └──────────────┘   └──────────────┘
//!            │ snapshot, then strategy(event, snapshot)
//!            ▼
//!   broadcast      : l1 → l2 → l3   (in order, stop on error / abort)
//!   parallel       : spawn(l1) spawn(l2) spawn(l3)   (return at once)
//!   parallel_wait  : JoinSet{l1,l2,l3} → first error
//!   conditional    : "_sync" → broadcast, "_wait" → parallel_wait, else parallel
//! ```
//!
//! ### Periodic events
//! ```text
//! PeriodicEmitter ──► Command (mpsc + oneshot ack) ──► control loop
//!
//! loop {
//!   ├─► stop requested          ─► off every timed event, exit
//!   ├─► Register/Remove/Events  ─► apply, ack
//!   └─► first timer to tick     ─► emitter.fire(name, V::from(Tick))
//!                                  (errors logged, loop keeps going)
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                                 | Key types / traits                           |
//! |-----------------|-------------------------------------------------------------|----------------------------------------------|
//! | **Listeners**   | Async handlers, optionally identified for replacement.      | [`Listener`], [`Callback`], [`Channel`]      |
//! | **Events**      | Name, payload, shared context and abort flag.               | [`Event`], [`Context`], [`DeliveryMode`]     |
//! | **Strategies**  | How one event reaches its subscribers.                      | [`Strategy`], [`strategies`]                 |
//! | **Emitter**     | Name registry, subscribe / unsubscribe / fire.              | [`Emitter`], [`EmitterBuilder`]              |
//! | **Periodic**    | Timer-driven events multiplexed on one task.                | [`PeriodicEmitter`], [`Period`], [`Tick`]    |
//! | **Errors**      | Typed delivery and periodic errors.                         | [`ListenerError`], [`PeriodicError`]         |
//! | **Configuration** | Periodic control loop settings.                           | [`PeriodicConfig`]                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] listener _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventvisor::{Callback, DeliveryMode, Emitter, Event, ListenerError, ListenerRef, Strategy};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let emitter = Emitter::<String>::builder()
//!         .with_default_strategy(Strategy::conditional())
//!         .build();
//!
//!     let greet: ListenerRef<String> = Callback::arc_with_id("greet", |ev: Arc<Event<String>>| async move {
//!         println!("hello, {}", ev.payload());
//!         Ok::<_, ListenerError>(())
//!     });
//!     emitter.on("greet", [greet]).await;
//!
//!     // Sync mode: delivered in order before `fire_event` returns.
//!     let ev = Event::new("greet", "world".to_string()).with_mode(DeliveryMode::Sync);
//!     emitter.fire_event(ev).await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod listeners;
mod periodic;
pub mod strategies;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::PeriodicConfig;
pub use core::{Dispatcher, Emitter, EmitterBuilder};
pub use error::{ListenerError, PeriodicError};
pub use events::{Context, DeliveryMode, Event, Payload};
pub use listeners::{Callback, Channel, Listener, ListenerRef};
pub use periodic::{Period, PeriodicEmitter, Tick};
pub use strategies::{DispatchFuture, Strategy};

// Optional: expose a simple built-in logging listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
