use std::collections::HashMap;

use crate::events::Payload;
use crate::strategies::Strategy;

use super::emitter::Emitter;

/// Builder for constructing an [`Emitter`] with non-default strategies.
///
/// ```rust
/// use eventvisor::{Emitter, Strategy};
///
/// let emitter = Emitter::<String>::builder()
///     .with_default_strategy(Strategy::conditional())
///     .with_event_strategy("audit", Strategy::broadcast())
///     .build();
/// assert_eq!(emitter.default_strategy().name(), "conditional");
/// ```
pub struct EmitterBuilder<V: Payload> {
    strategy: Strategy<V>,
    overrides: HashMap<String, Strategy<V>>,
}

impl<V: Payload> EmitterBuilder<V> {
    /// Creates a builder with [`Strategy::broadcast`] as default and no overrides.
    pub fn new() -> Self {
        Self {
            strategy: Strategy::broadcast(),
            overrides: HashMap::new(),
        }
    }

    /// Sets the strategy used for every event name without an override.
    pub fn with_default_strategy(mut self, strategy: Strategy<V>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the strategy for one event name.
    ///
    /// The override applies whenever that name's dispatcher is created,
    /// including after [`Emitter::off`].
    pub fn with_event_strategy(mut self, name: impl Into<String>, strategy: Strategy<V>) -> Self {
        self.overrides.insert(name.into(), strategy);
        self
    }

    /// Builds the emitter.
    pub fn build(self) -> Emitter<V> {
        Emitter::from_parts(self.strategy, self.overrides)
    }
}

impl<V: Payload> Default for EmitterBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
