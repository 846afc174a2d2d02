//! # effect-graph: Dependency-Ordered Property Changes
//!
//! Applies a batch of property changes to an entity where a change's value
//! may name another property. Changes are ordered so every referenced
//! property is final before anything reads it; changes caught in a reference
//! cycle, or depending on one, are left out and reported.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `PropertyStore` is the contract between engine and host storage
//! 2. **Planner owns nothing**: operations → graph → order is a pure function
//! 3. **Cycles are data**: excluded keys come back in the `Evaluation`, never as errors
//! 4. **No hidden state**: overrides are returned, not written into shared host state
//!
//! ## Quick Start
//!
//! ```rust
//! use effect_graph::{Engine, MemoryStore, Mode, Operation, PropertyStore, Value};
//!
//! # fn main() -> effect_graph::Result<()> {
//! let mut store = MemoryStore::from_flat([
//!     ("data.currency.pp", 15),
//!     ("data.currency.gp", 39),
//! ])?;
//!
//! let eval = Engine::new().evaluate(
//!     vec![
//!         Operation::new("data.currency.pp", Mode::Add, "&data.currency.gp"),
//!         Operation::new("data.currency.gp", Mode::Add, "7"),
//!     ],
//!     &mut store,
//! )?;
//!
//! assert_eq!(store.get("data.currency.pp"), Some(&Value::Int(61)));
//! assert!(eval.is_complete());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modes
//!
//! | Mode | Default priority | Result |
//! |------|------------------|--------|
//! | `Custom` | 0 | Delegated to the registered `ChangeApplier` |
//! | `Multiply` | 10 | `current × value` |
//! | `Add` | 20 | `current + value` (concatenation for strings) |
//! | `Downgrade` | 30 | `min(current, value)` |
//! | `Upgrade` | 40 | `max(current, value)` |
//! | `Override` | 50 | `value` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod reference;
pub mod planner;
pub mod execution;
pub mod store;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Value, PropertyMap, Operation, Mode, SourceId, Effect, Change,
};

// ============================================================================
// Re-exports: Planning and execution
// ============================================================================

pub use planner::{Plan, SkipReason, SkippedOperation};
pub use execution::{Evaluation, ChangeApplier, StandardApplier};

// ============================================================================
// Re-exports: Storage and configuration
// ============================================================================

pub use store::{PropertyStore, MemoryStore};
pub use config::EngineConfig;

use tracing::{debug, warn};

// ============================================================================
// Top-level Engine handle
// ============================================================================

/// The primary entry point. An `Engine` holds configuration and the change
/// applier strategy, and runs evaluation passes against property stores.
///
/// An engine keeps no state between passes; one instance can serve any
/// number of entities.
#[derive(Debug, Clone, Default)]
pub struct Engine<A: ChangeApplier = StandardApplier> {
    config: EngineConfig,
    applier: A,
}

impl Engine {
    /// Engine with default configuration and the standard combinators.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config, applier: StandardApplier }
    }
}

impl<A: ChangeApplier> Engine<A> {
    /// Replace the change applier, e.g. to give `Mode::Custom` a meaning.
    pub fn with_applier<B: ChangeApplier>(self, applier: B) -> Engine<B> {
        Engine { config: self.config, applier }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn applier(&self) -> &A {
        &self.applier
    }

    /// Plan `operations` without touching any store.
    pub fn plan<I>(&self, operations: I) -> Plan
    where
        I: IntoIterator<Item = Operation>,
    {
        planner::plan(operations, self.config.reference_sentinel)
    }

    /// Run one evaluation pass: plan, apply in order, report.
    ///
    /// `store` is mutated in place. The returned `Evaluation` carries the
    /// overrides for this pass and any excluded or skipped changes.
    pub fn evaluate<I, S>(&self, operations: I, store: &mut S) -> Result<Evaluation>
    where
        I: IntoIterator<Item = Operation>,
        S: PropertyStore + ?Sized,
    {
        // Phase 1: Plan
        let plan = self.plan(operations);
        if plan.graph.is_empty() {
            return Ok(Evaluation { skipped: plan.graph.into_parts().1, ..Evaluation::default() });
        }

        // Phase 2: Execute
        let eval = execution::execute(plan, store, &self.applier)?;

        // Phase 3: Report
        if !eval.is_complete() {
            let count = eval.excluded_count();
            if self.config.warn_on_exclusion {
                warn!(
                    count,
                    keys = ?eval.excluded,
                    changes = eval.excluded_operations.len(),
                    "could not apply changes to {count} properties, likely due to a cycle"
                );
            } else {
                debug!(count, keys = ?eval.excluded, "excluded properties on a cycle");
            }
        }
        debug!(
            applied = eval.order.len(),
            overrides = eval.overrides.len(),
            skipped = eval.skipped.len(),
            "evaluation pass complete"
        );
        Ok(eval)
    }

    /// Evaluate the changes of every enabled, unsuppressed effect.
    pub fn evaluate_effects<S>(&self, effects: &[Effect], store: &mut S) -> Result<Evaluation>
    where
        S: PropertyStore + ?Sized,
    {
        self.evaluate(model::active_operations(effects), store)
    }
}

/// Evaluate `operations` against `store` with a default engine.
pub fn evaluate<I, S>(operations: I, store: &mut S) -> Result<Evaluation>
where
    I: IntoIterator<Item = Operation>,
    S: PropertyStore + ?Sized,
{
    Engine::new().evaluate(operations, store)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid property path: '{path}'")]
    InvalidPath { path: String },

    #[error("Cannot write '{path}': segment '{segment}' is not an object")]
    PathConflict { path: String, segment: String },

    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Errors that skip a single change rather than abort the pass.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::InvalidPath { .. } | Error::PathConflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
