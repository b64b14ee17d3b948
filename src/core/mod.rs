//! Dispatch engine: per-event dispatchers and the emitter registry.
//!
//! Internal modules:
//! - [`dispatcher`]: one event's subscribers, identity index and strategy;
//! - [`emitter`]: name → dispatcher registry, the public entry point;
//! - [`builder`]: default and per-name strategy configuration.

mod builder;
mod dispatcher;
mod emitter;

pub use builder::EmitterBuilder;
pub use dispatcher::Dispatcher;
pub use emitter::Emitter;
