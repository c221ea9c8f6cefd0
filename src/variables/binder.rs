//! Binding step outputs into the namespace

use super::VariableStore;
use serde_json::Value;
use tracing::debug;

impl VariableStore {
    /// Store a step's output under its identifier and promote record keys.
    ///
    /// The output is always stored under `step_id`. When it is a record, each
    /// of its keys is also written at the root, overwriting any earlier value
    /// of the same name. A key equal to `step_id` is not promoted, so the
    /// value under the step's identifier is always the full output.
    ///
    /// Returns the promoted keys in record order.
    pub fn bind_output(&mut self, step_id: &str, output: Value) -> Vec<String> {
        let fields = match &output {
            Value::Object(record) => Some(record.clone()),
            _ => None,
        };
        self.set(step_id, output);

        let Some(fields) = fields else {
            return Vec::new();
        };

        let mut promoted = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            if key == step_id {
                debug!("Not promoting key '{}' over its own step output", key);
                continue;
            }
            if self.set(key.clone(), value).is_some() {
                debug!("Output of step '{}' shadows variable '{}'", step_id, key);
            }
            promoted.push(key);
        }

        promoted
    }
}
