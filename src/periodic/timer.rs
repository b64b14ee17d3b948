//! # Timer sources for periodic events.
//!
//! A [`Period`] describes where ticks come from; the control loop turns it into an
//! internal `Timer` and delivers a [`Tick`] (converted into the emitter's payload
//! type) on every firing.

use std::fmt;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::error::PeriodicError;

/// Payload source for periodic deliveries.
///
/// The emitter's payload type must implement `From<Tick>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Event name the timer is registered under.
    pub event: String,
    /// When the timer fired.
    pub at: Instant,
    /// 1-based count of ticks delivered for this registration.
    pub seq: u64,
}

/// Tick schedule for [`PeriodicEmitter::register_event`](crate::PeriodicEmitter::register_event).
pub enum Period {
    /// Fires every `Duration`, first one period after registration. Must be non-zero.
    Every(Duration),
    /// Uses an existing interval as-is (its first tick and missed-tick policy included).
    Interval(Interval),
    /// Arbitrary tick source; when the stream ends the registration is dropped.
    Ticks(BoxStream<'static, Instant>),
}

impl From<Duration> for Period {
    fn from(period: Duration) -> Self {
        Period::Every(period)
    }
}

impl From<Interval> for Period {
    fn from(interval: Interval) -> Self {
        Period::Interval(interval)
    }
}

impl fmt::Debug for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Every(d) => f.debug_tuple("Every").field(d).finish(),
            Period::Interval(i) => f.debug_tuple("Interval").field(&i.period()).finish(),
            Period::Ticks(_) => f.write_str("Ticks(..)"),
        }
    }
}

/// Live timer owned by the control loop. Dropping it stops it.
pub(crate) enum Timer {
    Interval(Interval),
    Ticks(BoxStream<'static, Instant>),
}

impl Timer {
    /// Builds the timer for `event`; a zero `Every` period is rejected.
    pub(crate) fn from_period(
        event: &str,
        period: Period,
        missed: MissedTickBehavior,
    ) -> Result<Self, PeriodicError> {
        match period {
            Period::Every(d) if d.is_zero() => Err(PeriodicError::InvalidPeriod {
                event: event.to_string(),
            }),
            Period::Every(d) => {
                let mut interval = time::interval_at(time::Instant::now() + d, d);
                interval.set_missed_tick_behavior(missed);
                Ok(Timer::Interval(interval))
            }
            Period::Interval(interval) => Ok(Timer::Interval(interval)),
            Period::Ticks(stream) => Ok(Timer::Ticks(stream)),
        }
    }

    /// Waits for the next tick. `None` means the source is exhausted.
    ///
    /// Cancel-safe: dropping the future before completion loses no tick.
    pub(crate) async fn tick(&mut self) -> Option<Instant> {
        match self {
            Timer::Interval(interval) => Some(interval.tick().await.into_std()),
            Timer::Ticks(stream) => stream.next().await,
        }
    }
}
