//! Property tests for the interpolation engine
//!
//! Verifies:
//! - Idempotence: interpolating an already-interpolated value changes nothing
//! - Read-only: interpolation never alters the store
//! - Round-trip: restore(snapshot()) reproduces the store after any edits

use flowbind::VariableStore;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// JSON values whose strings never contain braces
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z ]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_record() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,3}", arb_json(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

/// Templates mixing literal text with at most one path placeholder
fn arb_template() -> impl Strategy<Value = String> {
    "[a-z ]{0,6}(\\{\\{ ?[a-z]{1,3}(\\.[a-z]{1,3})? ?\\}\\})?[a-z ]{0,6}"
}

/// Settings shaped like arbitrary JSON with template strings at the leaves
fn arb_settings() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<i32>().prop_map(|n| json!(n)),
        arb_template().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

#[derive(Debug, Clone)]
enum Op {
    Set(String, Value),
    Merge(Map<String, Value>),
    Delete(String),
    Bind(String, Value),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[a-z]{1,3}", arb_json()).prop_map(|(k, v)| Op::Set(k, v)),
        arb_record().prop_map(Op::Merge),
        "[a-z]{1,3}".prop_map(Op::Delete),
        ("[a-z]{1,3}", arb_json()).prop_map(|(k, v)| Op::Bind(k, v)),
    ]
}

fn apply(store: &mut VariableStore, op: Op) {
    match op {
        Op::Set(name, value) => {
            store.set(name, value);
        }
        Op::Merge(record) => store.merge_all(record),
        Op::Delete(name) => {
            store.delete(&name);
        }
        Op::Bind(step, output) => {
            store.bind_output(&step, output);
        }
    }
}

proptest! {
    #[test]
    fn prop_placeholder_free_values_are_unchanged(record in arb_record(), value in arb_json()) {
        let store = VariableStore::restore(record);
        prop_assert_eq!(store.interpolate_container(&value), value);
    }

    #[test]
    fn prop_container_interpolation_is_idempotent(record in arb_record(), settings in arb_settings()) {
        let store = VariableStore::restore(record);
        let once = store.interpolate_container(&settings);
        let twice = store.interpolate_container(&once);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_interpolation_is_read_only(record in arb_record(), settings in arb_settings()) {
        let store = VariableStore::restore(record);
        let before = store.snapshot();
        for _ in 0..50 {
            let _ = store.interpolate_container(&settings);
        }
        prop_assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn prop_restore_round_trips(ops in prop::collection::vec(arb_op(), 0..12)) {
        let mut store = VariableStore::new();
        for op in ops {
            apply(&mut store, op);
        }
        let restored = VariableStore::restore(store.snapshot());
        prop_assert_eq!(restored, store);
    }

    #[test]
    fn prop_lone_placeholder_returns_stored_value(name in "[a-z]{1,4}", value in arb_json()) {
        let mut store = VariableStore::new();
        store.set(name.clone(), value.clone());
        let template = format!("{{{{{}}}}}", name);
        prop_assert_eq!(store.interpolate(&template), Some(value));
    }
}

#[test]
fn test_thousand_interpolations_leave_store_unchanged() {
    let mut store = VariableStore::new();
    store.bind_output("lookup", json!({"people": [{"email": "a@x.com"}, {"email": "b@x.com"}]}));
    let before = store.snapshot();

    for i in 0..1000 {
        let template = format!("#{i}: {{{{$.people[*].email}}}} / {{{{lookup.people[0]}}}}");
        let _ = store.interpolate(&template);
        let _ = store.interpolate_container(&json!({"to": "{{$.people[*].email}}"}));
    }

    assert_eq!(store.snapshot(), before);
}
