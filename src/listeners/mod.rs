//! # Event listeners.
//!
//! This module provides the [`Listener`] trait and built-in implementations.
//!
//! ## Architecture
//! ```text
//! Emitter::fire(name, payload)
//!     │
//!     └──► Dispatcher ──► Strategy ──┬──► Listener::handle(Arc<Event>)
//!                                    ├──► Listener::handle(Arc<Event>)
//!                                    └──► ...
//!
//!   Callback   closure-backed, optional identity
//!   Channel    forwards into an mpsc queue
//!   LogWriter  tracing output (feature `logging`)
//! ```

mod callback;
mod channel;
mod listener;
#[cfg(feature = "logging")]
mod log;

pub use callback::Callback;
pub use channel::Channel;
pub use listener::{Listener, ListenerRef};
pub(crate) use listener::{identity, same_listener};
#[cfg(feature = "logging")]
pub use log::LogWriter;
