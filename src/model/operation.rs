//! Modification operations and their combination modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How an operation combines its value with the property's current value.
///
/// Declaration order matches the host's mode numbering, which also drives
/// the default application priority (`ordinal × 10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Host-defined combinator, delegated to the registered `ChangeApplier`.
    Custom,
    Multiply,
    Add,
    /// Clamp down: `min(current, value)`.
    Downgrade,
    /// Clamp up: `max(current, value)`.
    Upgrade,
    Override,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Custom,
        Mode::Multiply,
        Mode::Add,
        Mode::Downgrade,
        Mode::Upgrade,
        Mode::Override,
    ];

    pub fn ordinal(self) -> u8 {
        match self {
            Mode::Custom => 0,
            Mode::Multiply => 1,
            Mode::Add => 2,
            Mode::Downgrade => 3,
            Mode::Upgrade => 4,
            Mode::Override => 5,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Mode> {
        Mode::ALL.get(usize::from(ordinal)).copied()
    }

    /// Priority used when an operation does not carry one.
    pub fn default_priority(self) -> f64 {
        f64::from(self.ordinal()) * 10.0
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Custom => "CUSTOM",
            Mode::Multiply => "MULTIPLY",
            Mode::Add => "ADD",
            Mode::Downgrade => "DOWNGRADE",
            Mode::Upgrade => "UPGRADE",
            Mode::Override => "OVERRIDE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a mode name or ordinal is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown change mode: '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ordinal) = trimmed.parse::<u8>() {
            return Mode::from_ordinal(ordinal).ok_or_else(|| UnknownMode(s.to_string()));
        }
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Opaque identifier of the container an operation came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(v: &str) -> Self { SourceId(v.to_owned()) }
}

impl From<String> for SourceId {
    fn from(v: String) -> Self { SourceId(v) }
}

/// A single (key, mode, value, priority) modification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Dotted path of the property this operation modifies.
    pub key: String,
    pub mode: Mode,
    /// Literal text, or a reference such as `"&data.currency.gp"`.
    pub raw_value: String,
    /// Explicit priority; `None` falls back to [`Mode::default_priority`].
    #[serde(default)]
    pub priority: Option<f64>,
    #[serde(default)]
    pub source: SourceId,
}

impl Operation {
    pub fn new(key: impl Into<String>, mode: Mode, raw_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mode,
            raw_value: raw_value.into(),
            priority: None,
            source: SourceId::default(),
        }
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_source(mut self, source: impl Into<SourceId>) -> Self {
        self.source = source.into();
        self
    }

    /// Priority actually used for ordering within a key.
    pub fn effective_priority(&self) -> f64 {
        self.priority.unwrap_or_else(|| self.mode.default_priority())
    }
}
