//! Plan execution: applies scheduled changes to a property store.
//!
//! Keys are visited in plan order. Within a key, changes run in ascending
//! priority; equal priorities keep their input order. A referenced key is
//! always fully applied before any change that reads it, so references
//! resolve against the store as it stands when the change runs. Resolved
//! values are shaped against the target exactly like literals.

pub mod combinator;

pub use combinator::{ChangeApplier, StandardApplier, combine};

use tracing::{debug, trace, warn};

use crate::model::{Operation, PropertyMap, Value, set_path};
use crate::planner::{Plan, PlannedOp, SkipReason, SkippedOperation};
use crate::reference::{cast_literal, cast_value};
use crate::store::PropertyStore;
use crate::Result;

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Keys in the order they were applied (including anchor keys).
    pub order: Vec<String>,
    /// Final value written per key during this pass.
    pub overrides: PropertyMap,
    /// Keys left untouched because they sit on or downstream of a cycle.
    pub excluded: Vec<String>,
    /// The changes those keys carried.
    pub excluded_operations: Vec<Operation>,
    /// Changes dropped as invalid or refused by the store.
    pub skipped: Vec<SkippedOperation>,
}

impl Evaluation {
    /// True when no key was excluded.
    pub fn is_complete(&self) -> bool {
        self.excluded.is_empty()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }

    pub fn override_for(&self, key: &str) -> Option<&Value> {
        self.overrides.get(key)
    }

    /// Overrides expanded into nested maps, as a host would merge them into
    /// its own override tree.
    pub fn nested_overrides(&self) -> PropertyMap {
        let mut nested = PropertyMap::new();
        for key in &self.order {
            if let Some(value) = self.overrides.get(key) {
                if let Err(e) = set_path(&mut nested, key, value.clone()) {
                    debug!(key = %key, error = %e, "override shadowed by a later write");
                }
            }
        }
        nested
    }
}

/// Apply `plan` to `store`.
///
/// Only fatal store errors are returned; recoverable write failures skip the
/// change and are reported in [`Evaluation::skipped`].
pub fn execute<S, A>(plan: Plan, store: &mut S, applier: &A) -> Result<Evaluation>
where
    S: PropertyStore + ?Sized,
    A: ChangeApplier + ?Sized,
{
    let Plan { graph, schedule } = plan;
    let (mut nodes, skipped) = graph.into_parts();

    let mut eval = Evaluation {
        order: Vec::with_capacity(schedule.order.len()),
        overrides: PropertyMap::with_capacity(schedule.order.len()),
        excluded: Vec::with_capacity(schedule.excluded.len()),
        excluded_operations: Vec::new(),
        skipped,
    };

    for &idx in &schedule.order {
        let node = &mut nodes[idx];
        let mut operations = std::mem::take(&mut node.operations);
        if operations.len() > 1 {
            // slice::sort_by is stable: equal priorities keep input order.
            operations.sort_by(|a, b| a.op.effective_priority().total_cmp(&b.op.effective_priority()));
        }
        let key = std::mem::take(&mut node.key);
        if !operations.is_empty() {
            apply_key(&key, operations, store, applier, &mut eval)?;
        }
        eval.order.push(key);
    }

    for &idx in &schedule.excluded {
        let node = &mut nodes[idx];
        eval.excluded_operations.extend(node.operations.drain(..).map(|p| p.op));
        eval.excluded.push(std::mem::take(&mut node.key));
    }

    Ok(eval)
}

/// Fold every change targeting `key` into one running value, then write it.
///
/// No change reads its own key through a reference, so a single write per
/// key is indistinguishable from writing after each change.
fn apply_key<S, A>(
    key: &str,
    operations: Vec<PlannedOp>,
    store: &mut S,
    applier: &A,
    eval: &mut Evaluation,
) -> Result<()>
where
    S: PropertyStore + ?Sized,
    A: ChangeApplier + ?Sized,
{
    let mut current = store.get(key).cloned().unwrap_or(Value::Null);
    let mut applied: Vec<Operation> = Vec::with_capacity(operations.len());

    for PlannedOp { op, reference } in operations {
        let delta = match &reference {
            Some(dependency) => store
                .get(dependency)
                .cloned()
                .and_then(|resolved| cast_value(resolved, &current)),
            None => cast_literal(&op.raw_value, &current),
        };

        let produced = match delta {
            Some(delta) if !delta.is_null() => applier.apply(&op, &mut current, delta),
            _ => false,
        };
        if produced {
            trace!(key, mode = %op.mode, value = %current, "applied change");
            applied.push(op);
        } else {
            trace!(key, mode = %op.mode, current = current.type_name(), "change produced no result");
        }
    }

    if applied.is_empty() {
        return Ok(());
    }

    match store.set(key, current.clone()) {
        Ok(()) => {
            eval.overrides.insert(key.to_string(), current);
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            warn!(
                key,
                sources = ?applied.iter().map(|op| op.source.0.as_str()).collect::<Vec<_>>(),
                error = %e,
                "store rejected changes"
            );
            let reason = SkipReason::Store(e.to_string());
            eval.skipped.extend(applied.into_iter().map(|operation| SkippedOperation {
                operation,
                reason: reason.clone(),
            }));
            Ok(())
        }
        Err(e) => Err(e),
    }
}
