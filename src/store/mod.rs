//! # Property Store Trait
//!
//! The contract between the engine and whatever holds an entity's current
//! property values. The engine only reads and writes dotted paths; how the
//! host lays out, persists or tracks those values is its own business.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | Nested in-memory maps |
//! | `PropertyMap` | `memory` | The bare map, for hosts that already own one |

pub mod memory;

use crate::model::Value;
use crate::Result;

pub use memory::MemoryStore;

/// Read/write view of an entity's properties.
///
/// A store is exclusively borrowed for the duration of one evaluation.
pub trait PropertyStore {
    /// Current value at `path`, or `None` if absent.
    fn get(&self, path: &str) -> Option<&Value>;

    /// Write `value` at `path`, creating intermediate structure as needed.
    ///
    /// Return [`Error::PathConflict`](crate::Error::PathConflict) or
    /// [`Error::InvalidPath`](crate::Error::InvalidPath) when the value cannot
    /// be placed; the engine skips that change and continues. Any other error
    /// aborts the evaluation.
    fn set(&mut self, path: &str, value: Value) -> Result<()>;

    fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}

impl<S: PropertyStore + ?Sized> PropertyStore for &mut S {
    fn get(&self, path: &str) -> Option<&Value> {
        (**self).get(path)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<()> {
        (**self).set(path, value)
    }
}
