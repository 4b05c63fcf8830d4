//! Per-scenario state shared between steps.
//!
//! A `StepContext` is created when a scenario starts and dropped when it
//! finishes. Steps communicate through string keys holding [`Value`]s.

use hashbrown::HashMap;

use crate::error::ContextError;
use crate::params::{FromValue, Value};

/// Mutable key/value store handed to every step of one scenario.
///
/// # Examples
///
/// ```
/// use stepwise::StepContext;
///
/// let mut ctx = StepContext::new();
/// ctx.set("cucumbers", 10);
///
/// let count: i64 = ctx.get("cucumbers")?;
/// assert_eq!(count, 10);
/// assert!(ctx.get::<i64>("apples").is_err());
/// # Ok::<(), stepwise::ContextError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepContext {
    values: HashMap<String, Value>,
}

impl StepContext {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, returning whatever was there before.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Read the value under `key` as `T`.
    ///
    /// # Errors
    ///
    /// [`ContextError::KeyNotFound`] when nothing is stored under `key`, and
    /// [`ContextError::TypeMismatch`] when the stored value is not a `T`.
    pub fn get<T: FromValue>(&self, key: &str) -> Result<T, ContextError> {
        let value = self.value(key)?;
        T::from_value(value).ok_or_else(|| ContextError::TypeMismatch {
            key: key.to_string(),
            expected: T::KIND,
            actual: value.kind(),
        })
    }

    /// Read the value under `key` as `T`, or `default` when the key is absent.
    ///
    /// # Errors
    ///
    /// [`ContextError::TypeMismatch`] when a value of another type is stored.
    pub fn get_or<T: FromValue>(&self, key: &str, default: T) -> Result<T, ContextError> {
        if self.contains(key) {
            self.get(key)
        } else {
            Ok(default)
        }
    }

    /// Borrow the raw value under `key`.
    ///
    /// # Errors
    ///
    /// [`ContextError::KeyNotFound`] when nothing is stored under `key`.
    pub fn value(&self, key: &str) -> Result<&Value, ContextError> {
        self.values
            .get(key)
            .ok_or_else(|| ContextError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Whether anything is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove and return the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Stored keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the context holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every stored value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
