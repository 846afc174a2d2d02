//! Large inputs: many changes on one key, many keys, and long reference chains.

use effect_graph::{Engine, MemoryStore, Mode, Operation, PropertyStore, Value};

const N: usize = 10_000;

#[test]
fn test_many_changes_on_one_key() {
    let ops = (0..N).map(|_| Operation::new("data.currency.pp", Mode::Add, "1"));
    let mut store = MemoryStore::new();
    let eval = Engine::new().evaluate(ops, &mut store).unwrap();

    assert_eq!(store.get("data.currency.pp"), Some(&Value::Int(N as i64)));
    assert_eq!(eval.order.len(), 1);
}

#[test]
fn test_many_appends_to_one_list() {
    let ops = (0..N).map(|i| Operation::new("flags.log", Mode::Add, i.to_string()));
    let mut store = MemoryStore::from_flat([("flags.log", Value::List(Vec::new()))]).unwrap();
    let eval = Engine::new().evaluate(ops, &mut store).unwrap();

    let Some(Value::List(items)) = store.get("flags.log") else {
        panic!("flags.log should still be a list");
    };
    assert_eq!(items.len(), N);
    assert_eq!(items.last(), Some(&Value::Int(N as i64 - 1)));
    assert_eq!(eval.overrides.len(), 1);
}

#[test]
fn test_many_independent_keys() {
    let ops = (0..N).map(|i| Operation::new(format!("flags.key{i}"), Mode::Add, "1"));
    let mut store = MemoryStore::new();
    let eval = Engine::new().evaluate(ops, &mut store).unwrap();

    assert_eq!(eval.overrides.len(), N);
    assert_eq!(eval.order.first().map(String::as_str), Some("flags.key0"));
    assert_eq!(store.get("flags.key9999"), Some(&Value::Int(1)));
}

#[test]
fn test_long_reference_chain() {
    // key_i = key_i + key_{i+1}; the last key is a plain literal.
    let ops: Vec<Operation> = (0..N)
        .map(|i| {
            if i + 1 == N {
                Operation::new(format!("flags.key{i}"), Mode::Add, "1")
            } else {
                Operation::new(format!("flags.key{i}"), Mode::Add, format!("&flags.key{}", i + 1))
            }
        })
        .collect();

    let mut store = MemoryStore::new();
    let eval = Engine::new().evaluate(ops, &mut store).unwrap();

    assert!(eval.is_complete());
    assert_eq!(eval.order.len(), N);
    assert_eq!(eval.order.first().map(String::as_str), Some("flags.key9999"));
    assert_eq!(eval.order.last().map(String::as_str), Some("flags.key0"));
    assert_eq!(store.get("flags.key0"), Some(&Value::Int(1)));
}

#[test]
fn test_long_chain_closed_into_a_cycle() {
    let ops = (0..N).map(|i| {
        Operation::new(format!("flags.key{i}"), Mode::Add, format!("&flags.key{}", (i + 1) % N))
    });

    let mut store = MemoryStore::new();
    let eval = Engine::new().evaluate(ops, &mut store).unwrap();

    assert_eq!(eval.excluded_count(), N);
    assert!(eval.order.is_empty());
    assert!(store.root().is_empty());
}
