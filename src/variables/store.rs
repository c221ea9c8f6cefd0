use crate::config::EngineConfig;
use crate::error::{kind_of, FlowbindError, Result};
use crate::interpolation::{Interpolated, Interpolator, VariableSource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat namespace of named values produced during one execution run
///
/// The store is exclusively owned by its run and threaded explicitly
/// through each step; there is no ambient instance. Writes overwrite,
/// reads never fail, and [`VariableStore::snapshot`] /
/// [`VariableStore::restore`] are the only persistence boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    variables: Map<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from an initial record
    pub fn restore(record: Map<String, Value>) -> Self {
        Self { variables: record }
    }

    /// Decode a JSON object into a store
    pub fn from_json_str(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(record) => Ok(Self::restore(record)),
            other => Err(FlowbindError::NotARecord {
                found: kind_of(&other),
            }),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.variables)?)
    }

    /// Set a variable, returning the value it replaced
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.variables.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn delete(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    /// Shallow merge: each incoming key overwrites the current value
    pub fn merge_all<I>(&mut self, record: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (name, value) in record {
            self.set(name, value);
        }
    }

    /// Independent copy of the current contents
    pub fn snapshot(&self) -> Map<String, Value> {
        self.variables.clone()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn interpolator(&self) -> Interpolator<'_, Self> {
        Interpolator::new(self)
    }

    pub fn interpolator_with(&self, config: EngineConfig) -> Interpolator<'_, Self> {
        Interpolator::with_config(self, config)
    }

    /// Interpolate one template string; see [`Interpolator::interpolate`]
    pub fn interpolate(&self, template: &str) -> Option<Value> {
        self.interpolator().interpolate(template)
    }

    /// Resolve every placeholder inside a step's settings
    pub fn interpolate_container(&self, settings: &Value) -> Value {
        self.interpolator().interpolate_value(settings)
    }

    pub fn interpolate_reported(&self, settings: &Value, config: EngineConfig) -> Interpolated {
        self.interpolator_with(config).interpolate_reported(settings)
    }
}

impl VariableSource for VariableStore {
    fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}

impl From<Map<String, Value>> for VariableStore {
    fn from(record: Map<String, Value>) -> Self {
        Self::restore(record)
    }
}

impl FromIterator<(String, Value)> for VariableStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            variables: iter.into_iter().collect(),
        }
    }
}
