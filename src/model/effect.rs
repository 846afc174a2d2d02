//! Effect: an operation-bearing container as a host authors it.

use serde::{Deserialize, Serialize};
use super::{Mode, Operation, SourceId};

/// One change inside an effect, before it is tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub key: String,
    pub mode: Mode,
    pub value: String,
    #[serde(default)]
    pub priority: Option<f64>,
}

impl Change {
    pub fn new(key: impl Into<String>, mode: Mode, value: impl Into<String>) -> Self {
        Self { key: key.into(), mode, value: value.into(), priority: None }
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A container of changes that the host may disable or suppress.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Effect {
    pub id: SourceId,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub suppressed: bool,
    #[serde(default)]
    pub changes: Vec<Change>,
}

impl Effect {
    pub fn new(id: impl Into<SourceId>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    pub fn with_change(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn suppressed(mut self) -> Self {
        self.suppressed = true;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.disabled && !self.suppressed
    }

    /// The effect's changes as operations tagged with this effect's id.
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.changes.iter().map(|c| Operation {
            key: c.key.clone(),
            mode: c.mode,
            raw_value: c.value.clone(),
            priority: c.priority,
            source: self.id.clone(),
        })
    }
}

/// Flatten the operations of every active effect, in effect order.
pub fn active_operations(effects: &[Effect]) -> Vec<Operation> {
    let total = effects.iter().filter(|e| e.is_active()).map(|e| e.changes.len()).sum();
    let mut ops = Vec::with_capacity(total);
    for effect in effects.iter().filter(|e| e.is_active()) {
        ops.extend(effect.operations());
    }
    ops
}
