//! Mode combinators and the pluggable applier strategy.

use std::cmp::Ordering;

use crate::model::{Mode, Operation, Value};

/// Strategy that combines a change's value with the current property value.
///
/// Hosts that need different semantics (or a meaning for [`Mode::Custom`])
/// register their own implementation on the [`Engine`](crate::Engine).
pub trait ChangeApplier {
    /// Combine `delta` into `current` in place.
    ///
    /// Returns `false` when the change produced no result; `current` is then
    /// left as it was, the property is not written and no override is
    /// recorded.
    fn apply(&self, op: &Operation, current: &mut Value, delta: Value) -> bool {
        match op.mode {
            Mode::Custom => match self.apply_custom(op, current, delta) {
                Some(value) => {
                    *current = value;
                    true
                }
                None => false,
            },
            mode => combine(mode, current, delta),
        }
    }

    /// Hook for [`Mode::Custom`] changes. The default ignores them.
    fn apply_custom(&self, _op: &Operation, _current: &Value, _delta: Value) -> Option<Value> {
        None
    }
}

/// The built-in combinators with no custom mode handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardApplier;

impl ChangeApplier for StandardApplier {}

impl<A: ChangeApplier + ?Sized> ChangeApplier for &A {
    fn apply(&self, op: &Operation, current: &mut Value, delta: Value) -> bool {
        (**self).apply(op, current, delta)
    }

    fn apply_custom(&self, op: &Operation, current: &Value, delta: Value) -> Option<Value> {
        (**self).apply_custom(op, current, delta)
    }
}

/// Apply a built-in mode to `current` in place. `Custom` has no built-in
/// meaning and produces no result.
pub fn combine(mode: Mode, current: &mut Value, delta: Value) -> bool {
    if delta.is_null() {
        return false;
    }
    let result = match mode {
        Mode::Custom => None,
        Mode::Add => return add(current, delta),
        Mode::Multiply => multiply(current, &delta),
        Mode::Override => Some(delta),
        Mode::Upgrade => return clamp(current, delta, Ordering::Greater),
        Mode::Downgrade => return clamp(current, delta, Ordering::Less),
    };
    match result {
        Some(value) => {
            *current = value;
            true
        }
        None => false,
    }
}

// Lists and strings grow in place.
fn add(current: &mut Value, delta: Value) -> bool {
    let sum = match (&mut *current, delta) {
        (Value::Null, delta) => delta,
        (Value::List(items), Value::List(more)) => {
            items.extend(more);
            return true;
        }
        (Value::List(items), delta) => {
            items.push(delta);
            return true;
        }
        (Value::String(text), delta) => {
            text.push_str(&delta.to_text());
            return true;
        }
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(b)
            .map(Value::Int)
            .unwrap_or(Value::Float(*a as f64 + b as f64)),
        (a, Value::String(b)) => Value::String(a.to_text() + &b),
        (a, b) if a.is_numeric() && b.is_numeric() => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => Value::Float(x + y),
            _ => return false,
        },
        _ => return false,
    };
    *current = sum;
    true
}

fn multiply(current: &Value, delta: &Value) -> Option<Value> {
    match (current, delta) {
        (Value::Int(a), Value::Int(b)) => Some(
            a.checked_mul(*b)
                .map(Value::Int)
                .unwrap_or(Value::Float(*a as f64 * *b as f64)),
        ),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            Some(Value::Float(a.as_float()? * b.as_float()?))
        }
        _ => None,
    }
}

/// Keep whichever of `current` and `delta` lies further toward `keep`.
fn clamp(current: &mut Value, delta: Value, keep: Ordering) -> bool {
    if current.is_null() {
        *current = delta;
        return true;
    }
    match delta.compare(current) {
        Some(ord) => {
            if ord == keep {
                *current = delta;
            }
            true
        }
        None => false,
    }
}
