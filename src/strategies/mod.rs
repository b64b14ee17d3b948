//! Delivery strategies.
//!
//! A [`Strategy`] is the policy a [`Dispatcher`](crate::Dispatcher) applies to its
//! subscriber snapshot. The built-in policies are also exported as plain `async fn`s so
//! they can be composed inside custom strategies.
//!
//! - [`broadcast`]: sequential, abort-aware, stops on first error (default)
//! - [`parallel`]: fire-and-forget
//! - [`parallel_wait`]: parallel with aggregated result
//! - [`conditional`]: per-event choice from [`DeliveryMode`](crate::DeliveryMode)

mod broadcast;
mod conditional;
mod parallel;
mod strategy;

pub use broadcast::broadcast;
pub use conditional::conditional;
pub use parallel::{parallel, parallel_wait};
pub use strategy::{DispatchFuture, Strategy};
