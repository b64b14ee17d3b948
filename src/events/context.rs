//! # Lock-guarded key/value context carried by every event.
//!
//! [`Context`] is an opaque bag of typed values attached to an [`Event`](crate::Event).
//! Listeners and strategies may read and mutate it concurrently; every access takes
//! a short, non-async lock.
//!
//! Keys starting with `_` are reserved for delivery markers (see
//! [`DeliveryMode`](crate::DeliveryMode)).

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Value = Arc<dyn Any + Send + Sync>;

/// Thread-safe map from string keys to typed values.
///
/// ## Example
/// ```rust
/// use eventvisor::Context;
///
/// let ctx = Context::new().with("user", String::from("alice"));
/// ctx.set("attempt", 3u32);
///
/// assert_eq!(ctx.get::<String>("user").as_deref().map(String::as_str), Some("alice"));
/// assert_eq!(ctx.get::<u32>("attempt").as_deref(), Some(&3));
/// assert!(ctx.get::<u64>("attempt").is_none()); // wrong type
/// ```
#[derive(Default)]
pub struct Context {
    values: RwLock<HashMap<String, Value>>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with<T: Any + Send + Sync>(self, key: impl Into<String>, value: T) -> Self {
        self.set(key, value);
        self
    }

    /// Inserts or replaces the value under `key`.
    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.write().insert(key.into(), Arc::new(value));
    }

    /// Returns the value under `key` if present and of type `T`.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self.read().get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    /// Returns `true` if `key` is present (regardless of value type).
    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        self.write().remove(key).is_some()
    }

    /// Copies every entry of `other` into `self`; entries of `other` win on conflict.
    pub fn merge(&self, other: &Context) {
        if std::ptr::eq(self, other) {
            return;
        }
        let incoming: Vec<(String, Value)> = other
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        self.write().extend(incoming);
    }

    /// Returns sorted list of keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the context holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Value>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Value>> {
        self.values.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for Context {
    /// Shallow copy: the map is copied, values are shared.
    fn clone(&self) -> Self {
        Self {
            values: RwLock::new(self.read().clone()),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("keys", &self.keys())
            .finish()
    }
}
