//! Events: the unit of delivery and its out-of-band context.
//!
//! ## Contents
//! - [`Event`] name, payload, context, abort flag and sequence number
//! - [`Context`] lock-guarded typed key/value map
//! - [`DeliveryMode`] markers read by the conditional strategy
//! - [`Payload`] bound shared by every payload type

mod context;
mod event;

pub use context::Context;
pub use event::{DeliveryMode, Event, Payload};
pub(crate) use event::{SYNC_KEY, WAIT_KEY};
