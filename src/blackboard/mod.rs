//! Shared key-value scratch space for states and the host.
//!
//! Values are stored opaquely as `Box<dyn Any + Send>`. The store never
//! checks types on write; typed reads report a [`BlackboardError`] instead of
//! forcing callers into unchecked casts.
//!
//! # Example
//!
//! ```rust
//! use tickstate::blackboard::{Blackboard, BlackboardError};
//!
//! let mut board = Blackboard::new();
//! board.set("target", String::from("player"));
//! board.set("hp", 10_i32);
//! board.set("hp", 7_i32);
//!
//! assert_eq!(board.get::<i32>("hp"), Ok(Some(&7)));
//! assert_eq!(board.get::<i32>("missing"), Ok(None));
//! assert!(matches!(
//!     board.get::<i32>("target"),
//!     Err(BlackboardError::TypeMismatch { .. })
//! ));
//! ```

pub mod error;

pub use error::BlackboardError;

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

const OPAQUE_TYPE: &str = "<opaque>";

struct Entry {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

/// Opaque key-value store with typed accessors.
#[derive(Default)]
pub struct Blackboard {
    entries: HashMap<String, Entry>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Insert or overwrite a value.
    ///
    /// Returns `true` if an existing entry was replaced.
    pub fn set<T: Any + Send>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.insert_entry(
            key.into(),
            Entry {
                value: Box::new(value),
                type_name: type_name::<T>(),
            },
        )
    }

    /// Insert or overwrite an already boxed value.
    ///
    /// The concrete type name is unknown here, so type mismatch errors for
    /// this entry report it as `<opaque>`.
    pub fn set_boxed(&mut self, key: impl Into<String>, value: Box<dyn Any + Send>) -> bool {
        self.insert_entry(
            key.into(),
            Entry {
                value,
                type_name: OPAQUE_TYPE,
            },
        )
    }

    fn insert_entry(&mut self, key: String, entry: Entry) -> bool {
        self.entries.insert(key, entry).is_some()
    }

    /// Get the raw stored value, or `None` if the key was never set.
    pub fn get_value(&self, key: &str) -> Option<&(dyn Any + Send)> {
        self.entries.get(key).map(|entry| entry.value.as_ref())
    }

    /// Get a value as `T`.
    ///
    /// `Ok(None)` means absent; a value of another type is an error.
    pub fn get<T: Any>(&self, key: &str) -> Result<Option<&T>, BlackboardError> {
        let Some(entry) = self.entries.get(key) else {
            return Ok(None);
        };
        entry
            .value
            .downcast_ref::<T>()
            .map(Some)
            .ok_or_else(|| mismatch::<T>(key, entry))
    }

    /// Get a mutable value as `T`.
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Result<Option<&mut T>, BlackboardError> {
        let Some(entry) = self.entries.get_mut(key) else {
            return Ok(None);
        };
        let found = entry.type_name;
        entry
            .value
            .downcast_mut::<T>()
            .map(Some)
            .ok_or_else(|| BlackboardError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
                found,
            })
    }

    /// Get a clone of the value as `T`, or `default` when absent.
    pub fn get_or<T: Any + Clone>(&self, key: &str, default: T) -> Result<T, BlackboardError> {
        Ok(self.get::<T>(key)?.cloned().unwrap_or(default))
    }

    /// Remove an entry, returning whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mismatch<T: Any>(key: &str, entry: &Entry) -> BlackboardError {
    BlackboardError::TypeMismatch {
        key: key.to_string(),
        expected: type_name::<T>(),
        found: entry.type_name,
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, e)| (k, e.type_name)))
            .finish()
    }
}
