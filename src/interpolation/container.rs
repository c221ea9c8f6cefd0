//! Recursive interpolation over arrays and records

use super::{Interpolator, VariableSource, Warnings};
use serde_json::Value;

impl<S: VariableSource + ?Sized> Interpolator<'_, S> {
    /// Interpolate every string leaf of `value`, at any depth.
    ///
    /// Returns a freshly built value with the same shape as the input; keys
    /// are never interpolated. A lone placeholder that does not resolve
    /// becomes `null`, since a container slot must hold a value.
    pub fn interpolate_value(&self, value: &Value) -> Value {
        self.walk(value, &mut Warnings::discard())
    }

    pub(crate) fn walk(&self, value: &Value, warnings: &mut Warnings) -> Value {
        match value {
            Value::String(template) => self.render(template, warnings).unwrap_or(Value::Null),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.walk(item, warnings))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.walk(item, warnings)))
                    .collect(),
            ),
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpolation::Interpolator;
    use serde_json::{json, Map, Value};

    fn vars() -> Map<String, Value> {
        match json!({
            "company": {"name": "Acme", "domains": ["acme.io", "acme.dev"]},
            "limit": 25,
            "contacts": [{"email": "a@acme.io"}, {"email": "b@acme.io"}]
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_nested_settings_resolve() {
        let vars = vars();
        let settings = json!({
            "subject": "Intro to {{company.name}}",
            "max": "{{limit}}",
            "recipients": "{{$.contacts[*].email}}",
            "options": {
                "domains": ["{{company.domains[0]}}", "static"],
                "dry_run": true,
                "retries": 3,
                "note": null
            }
        });

        let resolved = Interpolator::new(&vars).interpolate_value(&settings);
        assert_eq!(
            resolved,
            json!({
                "subject": "Intro to Acme",
                "max": 25,
                "recipients": ["a@acme.io", "b@acme.io"],
                "options": {
                    "domains": ["acme.io", "static"],
                    "dry_run": true,
                    "retries": 3,
                    "note": null
                }
            })
        );
    }

    #[test]
    fn test_keys_are_not_interpolated() {
        let vars = vars();
        let settings = json!({"{{limit}}": "{{limit}}"});
        assert_eq!(
            Interpolator::new(&vars).interpolate_value(&settings),
            json!({"{{limit}}": 25})
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        let vars = vars();
        let interpolator = Interpolator::new(&vars);
        for value in [json!(1.5), json!(false), Value::Null] {
            assert_eq!(interpolator.interpolate_value(&value), value);
        }
    }

    #[test]
    fn test_unresolved_lone_placeholder_becomes_null() {
        let vars = vars();
        assert_eq!(
            Interpolator::new(&vars).interpolate_value(&json!(["{{missing}}"])),
            json!([null])
        );
    }

    #[test]
    fn test_input_is_left_untouched() {
        let vars = vars();
        let settings = json!({"a": ["{{limit}}"]});
        let before = settings.clone();
        let _ = Interpolator::new(&vars).interpolate_value(&settings);
        assert_eq!(settings, before);
    }
}
