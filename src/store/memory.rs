//! In-memory property store.
//!
//! Properties live in nested `Value::Map`s addressed by dotted paths, the way
//! an entity document nests its data (`data.currency.pp`).
//!
//! Use this store for:
//! - Tests and embedding where the host has no storage of its own
//! - Hosts that load an entity snapshot from JSON, evaluate, and hand the
//!   result back

use crate::model::*;
use crate::Result;
use super::PropertyStore;

// ============================================================================
// MemoryStore
// ============================================================================

/// Nested in-memory property storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    root: PropertyMap,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(path, value)` pairs, e.g. `("data.hp", 10)`.
    pub fn from_flat<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut store = Self::new();
        for (path, value) in pairs {
            store.set(path.as_ref(), value.into())?;
        }
        Ok(store)
    }

    /// Build a store from a JSON object. Non-object JSON yields an empty store.
    pub fn from_json(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::Map(root) => Self { root },
            _ => Self::new(),
        }
    }

    pub fn root(&self) -> &PropertyMap {
        &self.root
    }

    pub fn into_inner(self) -> PropertyMap {
        self.root
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(&Value::Map(self.root.clone()))
    }
}

impl From<PropertyMap> for MemoryStore {
    fn from(root: PropertyMap) -> Self {
        Self { root }
    }
}

// ============================================================================
// PropertyStore impls
// ============================================================================

impl PropertyStore for MemoryStore {
    fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.root, path)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<()> {
        set_path(&mut self.root, path, value)
    }
}

impl PropertyStore for PropertyMap {
    fn get(&self, path: &str) -> Option<&Value> {
        get_path(self, path)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<()> {
        set_path(self, path, value)
    }
}
