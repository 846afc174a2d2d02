//! # Property Model
//!
//! Plain data that crosses every boundary: host ↔ planner ↔ execution.
//!
//! Design rule: this module is pure data with no I/O and no engine state.

pub mod value;
pub mod property_map;
pub mod operation;
pub mod effect;

pub use value::Value;
pub use property_map::{PropertyMap, PATH_SEPARATOR, get_path, set_path, split_path};
pub use operation::{Mode, Operation, SourceId, UnknownMode};
pub use effect::{Change, Effect, active_operations};
