//! # Periodic emitter configuration.
//!
//! Provides [`PeriodicConfig`] centralized settings for the periodic control loop.
//!
//! ## Sentinel values
//! - `command_capacity = 0` → clamped to 1

use tokio::time::MissedTickBehavior;

/// Configuration for [`PeriodicEmitter`](crate::PeriodicEmitter).
///
/// ## Field semantics
/// - `command_capacity`: Bounded command queue size (min 1; clamped)
/// - `missed_tick`: What timers created from a [`Duration`](std::time::Duration) do
///   when the control loop falls behind (a slow listener stalls every periodic event)
#[derive(Clone, Debug)]
pub struct PeriodicConfig {
    /// Capacity of the command queue feeding the control loop.
    ///
    /// `register_event` / `remove_event` wait for room when the queue is full.
    pub command_capacity: usize,

    /// Missed-tick policy applied to timers built from a duration.
    ///
    /// Pre-built [`Interval`](tokio::time::Interval)s keep their own policy.
    pub missed_tick: MissedTickBehavior,
}

impl PeriodicConfig {
    /// Returns the command capacity clamped to a minimum of 1.
    #[inline]
    pub fn command_capacity_clamped(&self) -> usize {
        self.command_capacity.max(1)
    }
}

impl Default for PeriodicConfig {
    /// Default configuration:
    ///
    /// - `command_capacity = 64`
    /// - `missed_tick = Skip` (late ticks are dropped, the schedule is kept)
    fn default() -> Self {
        Self {
            command_capacity: 64,
            missed_tick: MissedTickBehavior::Skip,
        }
    }
}
