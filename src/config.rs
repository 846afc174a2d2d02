//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::reference::DEFAULT_SENTINEL;

/// Settings for an [`Engine`](crate::Engine).
///
/// Deserializable so hosts can keep it next to their own settings; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Leading character that marks a change value as a reference.
    pub reference_sentinel: char,
    /// Log cycle exclusions at warn level (debug level otherwise).
    pub warn_on_exclusion: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_sentinel: DEFAULT_SENTINEL,
            warn_on_exclusion: true,
        }
    }
}
