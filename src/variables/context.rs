//! Read-only view handed to step executors

use super::VariableStore;
use crate::interpolation::VariableSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Identifiers of the execution a step runs under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionIds {
    pub run_id: String,
    pub parent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl ExecutionIds {
    pub fn new(run_id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            parent_id: parent_id.into(),
            group_id: None,
        }
    }

    /// Fresh run id under an existing parent
    pub fn generate(parent_id: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), parent_id)
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }
}

/// Frozen view of a run: its identifiers plus a snapshot of the variables
///
/// Exposes lookups only. Later writes to the originating store are not
/// visible through a context that was already projected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepContext {
    #[serde(flatten)]
    ids: ExecutionIds,
    variables: Map<String, Value>,
}

impl StepContext {
    pub fn ids(&self) -> &ExecutionIds {
        &self.ids
    }

    pub fn run_id(&self) -> &str {
        &self.ids.run_id
    }

    pub fn parent_id(&self) -> &str {
        &self.ids.parent_id
    }

    pub fn group_id(&self) -> Option<&str> {
        self.ids.group_id.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Resolve a dot/bracket path against the captured variables
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        self.resolve_nested_path(path)
    }
}

impl VariableSource for StepContext {
    fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}

impl VariableStore {
    /// Project the read-only context for a step executor
    pub fn project(&self, ids: ExecutionIds) -> StepContext {
        StepContext {
            ids,
            variables: self.snapshot(),
        }
    }
}
