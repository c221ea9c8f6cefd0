//! Variable resolution and template interpolation
//!
//! Resolves `{{ expression }}` placeholders against a flat variable
//! namespace. Expressions starting with `$` are JSONPath-style queries over
//! the whole namespace; anything else is a dot/bracket nested path.
//!
//! Resolution never fails: a reference that does not resolve degrades to
//! absence. In strict mode each unresolved reference is additionally
//! recorded as an [`InterpolationWarning`].

mod container;
pub mod format;
pub mod path;
pub mod query;
pub mod template;

pub use format::format_value;
pub use path::resolve_nested_path;
pub use query::{evaluate_query, JsonPath};
pub use template::{extract_references, placeholders, Placeholder};

use crate::config::EngineConfig;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{trace, warn};

/// Read access to a variable namespace
///
/// Implemented by the mutable store, by the read-only step context, and by a
/// bare record, so the same interpolation code serves all three.
pub trait VariableSource {
    /// The namespace as a single record
    fn variables(&self) -> &Map<String, Value>;

    /// Resolve a dot/bracket nested path
    fn resolve_nested_path(&self, path: &str) -> Option<&Value> {
        path::resolve_nested_path(self.variables(), path)
    }

    /// Evaluate a `$` query over the whole namespace
    fn evaluate_query(&self, expr: &str) -> Option<Value> {
        query::evaluate_query(self.variables(), expr)
    }
}

impl VariableSource for Map<String, Value> {
    fn variables(&self) -> &Map<String, Value> {
        self
    }
}

/// How a placeholder expression is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Path,
    Query,
}

impl ReferenceKind {
    pub fn of(expression: &str) -> Self {
        if expression.starts_with('$') {
            ReferenceKind::Query
        } else {
            ReferenceKind::Path
        }
    }
}

/// A placeholder that resolved to absence during a strict pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationWarning {
    pub expression: String,
    pub kind: ReferenceKind,
}

impl fmt::Display for InterpolationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ReferenceKind::Path => "path",
            ReferenceKind::Query => "query",
        };
        write!(f, "unresolved {} reference '{}'", kind, self.expression)
    }
}

/// Result of a reported interpolation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolated {
    pub value: Value,
    pub warnings: Vec<InterpolationWarning>,
}

/// Warning sink for one pass; a discarding sink records nothing
pub(crate) struct Warnings {
    collected: Option<Vec<InterpolationWarning>>,
}

impl Warnings {
    pub(crate) fn discard() -> Self {
        Self { collected: None }
    }

    pub(crate) fn collect() -> Self {
        Self {
            collected: Some(Vec::new()),
        }
    }

    fn push(&mut self, warning: InterpolationWarning) {
        if let Some(collected) = self.collected.as_mut() {
            collected.push(warning);
        }
    }

    fn into_vec(self) -> Vec<InterpolationWarning> {
        self.collected.unwrap_or_default()
    }
}

/// Interpolates templates and containers against one variable source
///
/// Holds only a shared borrow of the source, so interpolation can never
/// mutate the namespace it reads.
pub struct Interpolator<'s, S: VariableSource + ?Sized> {
    source: &'s S,
    config: EngineConfig,
}

impl<'s, S: VariableSource + ?Sized> Interpolator<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: &'s S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    /// Interpolate a value, collecting warnings when strict mode is enabled
    pub fn interpolate_reported(&self, value: &Value) -> Interpolated {
        let mut warnings = if self.config.strict_mode {
            Warnings::collect()
        } else {
            Warnings::discard()
        };
        let value = self.walk(value, &mut warnings);
        Interpolated {
            value,
            warnings: warnings.into_vec(),
        }
    }

    fn unresolved(&self, expression: &str, kind: ReferenceKind, warnings: &mut Warnings) {
        if self.config.log_unresolved {
            if self.config.strict_mode {
                warn!("Unresolved {:?} reference '{}'", kind, expression);
            } else {
                trace!("Unresolved {:?} reference '{}'", kind, expression);
            }
        }
        warnings.push(InterpolationWarning {
            expression: expression.to_string(),
            kind,
        });
    }
}

/// Interpolate one template string against `source` with default settings
pub fn interpolate<S: VariableSource + ?Sized>(source: &S, template: &str) -> Option<Value> {
    Interpolator::new(source).interpolate(template)
}

/// Interpolate every string leaf of `value` against `source` with default settings
pub fn interpolate_container<S: VariableSource + ?Sized>(source: &S, value: &Value) -> Value {
    Interpolator::new(source).interpolate_value(value)
}
