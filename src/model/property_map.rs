//! PropertyMap: the key-value store behind an entity's properties.
//!
//! Nested objects are `Value::Map` entries, addressed with dotted paths
//! (`"data.currency.pp"`).

use std::collections::HashMap;
use super::Value;
use crate::{Error, Result};

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Convert iterator of (key, value) pairs into a Map value.
impl<K, V> From<Vec<(K, V)>> for Value
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Split a dotted path, rejecting empty paths and empty segments.
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(Error::InvalidPath { path: path.to_string() });
    }
    Ok(segments)
}

/// Look up a dotted path. Missing segments, scalar intermediates and
/// malformed paths all read as absent.
pub fn get_path<'a>(map: &'a PropertyMap, path: &str) -> Option<&'a Value> {
    let mut segments = path.split(PATH_SEPARATOR);
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        match current {
            Value::Map(inner) => current = inner.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Write a value at a dotted path, creating intermediate maps as needed.
///
/// Fails with `PathConflict` when an intermediate segment exists but holds
/// something other than a map; nothing is modified in that case.
pub fn set_path(map: &mut PropertyMap, path: &str, value: Value) -> Result<()> {
    let segments = split_path(path)?;
    let (last, parents) = segments.split_last()
        .ok_or_else(|| Error::InvalidPath { path: path.to_string() })?;

    // Check before creating anything so a conflict leaves the map untouched.
    let mut probe = Some(&*map);
    for segment in parents {
        let Some(current) = probe else { break };
        probe = match current.get(*segment) {
            None => None,
            Some(Value::Map(inner)) => Some(inner),
            Some(_) => {
                return Err(Error::PathConflict {
                    path: path.to_string(),
                    segment: segment.to_string(),
                });
            }
        };
    }

    let mut target = map;
    for segment in parents {
        let entry = target
            .entry(segment.to_string())
            .or_insert_with(|| Value::Map(PropertyMap::new()));
        target = match entry {
            Value::Map(inner) => inner,
            _ => {
                return Err(Error::PathConflict {
                    path: path.to_string(),
                    segment: segment.to_string(),
                });
            }
        };
    }
    target.insert(last.to_string(), value);
    Ok(())
}
