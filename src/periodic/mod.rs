//! Timer-driven events on top of an [`Emitter`](crate::Emitter).
//!
//! - [`PeriodicEmitter`]: handle; every method is a command to the control loop;
//! - [`Period`]: where ticks come from (duration, interval, or any tick stream);
//! - [`Tick`]: what each firing carries, converted into the emitter's payload type.

mod control;
mod emitter;
mod timer;

pub use emitter::PeriodicEmitter;
pub use timer::{Period, Tick};
