// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared Inventory Defaults
//!
//! The lowest-precedence attribute source. The inventory owns the mapping and
//! every host built by it holds a clone of the same handle, so a write through
//! any handle is visible to all of them.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::value::Data;

/// Shared, read-mostly handle to the inventory-wide defaults
#[derive(Clone, Default)]
pub struct Defaults(Arc<RwLock<Data>>);

impl Defaults {
    /// Create a handle owning the given mapping
    pub fn new(data: Data) -> Self {
        Self(Arc::new(RwLock::new(data)))
    }

    /// Look up a default value
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    /// Whether a default exists for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Set a default, returning the previous value
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.write().insert(key.into(), value)
    }

    /// Remove a default
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.write().shift_remove(key)
    }

    /// Copy of the current mapping
    pub fn snapshot(&self) -> Data {
        self.0.read().clone()
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Whether two handles refer to the same mapping
    pub fn ptr_eq(&self, other: &Defaults) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Data> for Defaults {
    fn from(data: Data) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Defaults").field(&*self.0.read()).finish()
    }
}
