//! Integration tests for template and container interpolation
//!
//! Exercises the full path from a seeded store through placeholder dispatch,
//! query evaluation, formatting, and output binding across several steps.

use flowbind::{
    EngineConfig, InterpolationWarning, ReferenceKind, VariableSource, VariableStore,
};
use serde_json::{json, Value};

fn seeded(value: Value) -> VariableStore {
    match value {
        Value::Object(record) => VariableStore::restore(record),
        _ => panic!("seed must be an object"),
    }
}

#[test]
fn test_string_placeholder_stays_string() {
    let store = seeded(json!({"name": "Ada"}));
    assert_eq!(store.interpolate("{{name}}"), Some(json!("Ada")));
}

#[test]
fn test_number_placeholder_stays_number() {
    let store = seeded(json!({"count": 3}));
    assert_eq!(store.interpolate("{{count}}"), Some(json!(3)));
    assert_ne!(store.interpolate("{{count}}"), Some(json!("3")));
}

#[test]
fn test_partial_template() {
    let store = seeded(json!({"name": "Ada"}));
    assert_eq!(store.interpolate("Hello {{name}}!"), Some(json!("Hello Ada!")));
}

#[test]
fn test_query_single_match_unwrap() {
    let store = seeded(json!({"items": [{"email": "a@x.com"}]}));
    assert_eq!(
        store.interpolate("{{$.items[0].email}}"),
        Some(json!("a@x.com"))
    );
}

#[test]
fn test_query_multi_match_native_and_spliced() {
    let store = seeded(json!({"items": [{"email": "a@x.com"}, {"email": "b@x.com"}]}));
    assert_eq!(
        store.interpolate("{{$.items[*].email}}"),
        Some(json!(["a@x.com", "b@x.com"]))
    );

    let rendered = store.interpolate("Emails: {{$.items[*].email}}").unwrap();
    insta::assert_snapshot!(rendered.as_str().unwrap(), @"Emails: a@x.com, b@x.com");
}

#[test]
fn test_record_is_spliced_as_compact_json() {
    let store = seeded(json!({"lead": {"name": "Ada", "score": 91}}));
    let rendered = store.interpolate("Lead: {{ lead }}").unwrap();
    insta::assert_snapshot!(rendered.as_str().unwrap(), @r#"Lead: {"name":"Ada","score":91}"#);
}

#[test]
fn test_placeholders_resolve_independently() {
    let store = seeded(json!({"a": "{{b}}", "b": "B"}));
    // Resolved text is never re-scanned for placeholders
    assert_eq!(store.interpolate("{{a}}-{{b}}"), Some(json!("{{b}}-B")));
}

#[test]
fn test_pipeline_of_steps() {
    let mut store = seeded(json!({"company_domain": "acme.io"}));

    let lookup_settings = json!({"domain": "{{company_domain}}", "limit": 2});
    let resolved = store.interpolate_container(&lookup_settings);
    assert_eq!(resolved, json!({"domain": "acme.io", "limit": 2}));

    store.bind_output(
        "lookup",
        json!({
            "company": {"name": "Acme", "size": 120},
            "people": [
                {"name": "Ada", "email": "ada@acme.io", "title": "CTO"},
                {"name": "Bob", "email": "bob@acme.io", "title": "CEO"}
            ]
        }),
    );

    let draft_settings = json!({
        "to": "{{$.people[*].email}}",
        "subject": "{{company.name}} x Flowbind",
        "body": "Hi {{people[0].name}}, congrats on reaching {{company.size}} people.",
        "meta": {"source": "{{$.lookup.company.name}}", "missing": "{{nope}}"}
    });
    let resolved = store.interpolate_container(&draft_settings);
    assert_eq!(
        resolved,
        json!({
            "to": ["ada@acme.io", "bob@acme.io"],
            "subject": "Acme x Flowbind",
            "body": "Hi Ada, congrats on reaching 120 people.",
            "meta": {"source": "Acme", "missing": null}
        })
    );

    store.bind_output("draft", json!({"subject": "Acme x Flowbind", "status": "ok"}));
    assert_eq!(store.get("status"), Some(&json!("ok")));
    assert_eq!(
        store.resolve_nested_path("lookup.people[1].title"),
        Some(&json!("CEO"))
    );
}

#[test]
fn test_strict_pass_reports_every_miss() {
    let store = seeded(json!({"name": "Ada"}));
    let config = EngineConfig::default().with_strict_mode(true);
    let result = store.interpolate_reported(
        &json!(["{{name}}", "{{ missing.path }}", "x {{$.none}} y"]),
        config,
    );

    assert_eq!(result.value, json!(["Ada", null, "x  y"]));
    assert_eq!(
        result.warnings,
        vec![
            InterpolationWarning {
                expression: "missing.path".into(),
                kind: ReferenceKind::Path,
            },
            InterpolationWarning {
                expression: "$.none".into(),
                kind: ReferenceKind::Query,
            },
        ]
    );
}

#[test]
fn test_malformed_query_never_raises() {
    let store = seeded(json!({"items": [1, 2]}));
    for template in ["{{$.items[}}", "{{$..}}", "{{$.items[?(x)]}}", "{{$$}}"] {
        assert_eq!(store.interpolate(template), None, "template {template}");
    }
    assert_eq!(
        store.interpolate("before {{$.items[}} after"),
        Some(json!("before  after"))
    );
}

#[test]
fn test_non_string_leaves_pass_through() {
    let store = seeded(json!({"x": 1}));
    let settings = json!([1, true, null, 2.5, {"n": 0}]);
    assert_eq!(store.interpolate_container(&settings), settings);
}
