use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or decoding engine inputs.
///
/// Resolution and interpolation never fail; these variants only cover the
/// edges where snapshots and configuration enter the process.
#[derive(Error, Debug)]
pub enum FlowbindError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid variable snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Variable snapshot must be a JSON object, found {found}")]
    NotARecord { found: &'static str },

    #[error("Invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl FlowbindError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while compiling a `$` query expression.
///
/// [`crate::interpolation::evaluate_query`] converts every one of these into
/// absence; they surface only through [`crate::JsonPath::compile`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query must start with '$'")]
    MissingRoot,

    #[error("Unexpected character '{found}' at position {position}")]
    Unexpected { position: usize, found: char },

    #[error("Expected a member name at position {position}")]
    EmptyName { position: usize },

    #[error("Unclosed bracket starting at position {position}")]
    UnclosedBracket { position: usize },

    #[error("Invalid array index '{0}'")]
    InvalidIndex(String),

    #[error("Invalid slice '{0}'")]
    InvalidSlice(String),

    #[error("Invalid filter expression '{0}'")]
    InvalidFilter(String),
}

pub type Result<T> = std::result::Result<T, FlowbindError>;

/// Name of a JSON value's variant, for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
