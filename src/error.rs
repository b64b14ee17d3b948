//! Error types used by listeners, strategies and the periodic emitter.
//!
//! This module defines two error enums:
//!
//! - [`ListenerError`]: returned by [`Listener::handle`](crate::Listener::handle)
//!   and surfaced by [`Emitter::fire`](crate::Emitter::fire).
//! - [`PeriodicError`]: returned by [`PeriodicEmitter`](crate::PeriodicEmitter) operations.
//!
//! Both types provide `as_label` for logging.

use thiserror::Error;

/// # Errors produced while delivering an event.
///
/// [`ListenerError::Aborted`] is a sentinel, not a failure: strategies treat it as
/// "stop further delivery for this fire call" and never return it to the caller.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Listener asked to stop delivery of the current event.
    #[error("delivery aborted")]
    Aborted,

    /// Listener failed while handling the event.
    #[error("listener failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Listener panicked inside a task spawned by a parallel strategy.
    #[error("listener panicked: {info}")]
    Panicked {
        /// Panic message, if it could be extracted.
        info: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Fail`].
    ///
    /// # Example
    /// ```
    /// use eventvisor::ListenerError;
    ///
    /// let err = ListenerError::fail("boom");
    /// assert_eq!(err.to_string(), "listener failed: boom");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        ListenerError::Fail {
            error: error.into(),
        }
    }

    /// Returns `true` for the abort sentinel.
    pub fn is_abort(&self) -> bool {
        matches!(self, ListenerError::Aborted)
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventvisor::ListenerError;
    ///
    /// assert_eq!(ListenerError::Aborted.as_label(), "listener_aborted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Aborted => "listener_aborted",
            ListenerError::Fail { .. } => "listener_failed",
            ListenerError::Panicked { .. } => "listener_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Aborted => "aborted".to_string(),
            ListenerError::Fail { error } => format!("error: {error}"),
            ListenerError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// # Errors produced by the periodic emitter.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodicError {
    /// The control loop has stopped; no further commands are accepted.
    #[error("periodic emitter stopped")]
    Stopped,

    /// A zero-length period was requested.
    #[error("invalid period for event {event:?}: period must be non-zero")]
    InvalidPeriod {
        /// Event the period was requested for.
        event: String,
    },
}

impl PeriodicError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PeriodicError::Stopped => "periodic_stopped",
            PeriodicError::InvalidPeriod { .. } => "periodic_invalid_period",
        }
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_info(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_is_not_a_failure_label() {
        assert!(ListenerError::Aborted.is_abort());
        assert!(!ListenerError::fail("x").is_abort());
        assert_eq!(ListenerError::fail("x").as_label(), "listener_failed");
    }

    #[test]
    fn test_panic_info_extracts_messages() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_info(s.as_ref()), "static");
        let s: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_info(s.as_ref()), "owned");
        let s: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_info(s.as_ref()), "unknown panic");
    }
}
