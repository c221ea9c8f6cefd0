//! # flowbind
//!
//! Variable resolution and template interpolation for node-based step
//! pipelines. Wires the output of one automation step into the settings of
//! a later one.
//!
//! ## Usage
//!
//! ```
//! use flowbind::VariableStore;
//! use serde_json::json;
//!
//! let mut store = VariableStore::new();
//! store.bind_output("lookup", json!({"company": "Acme", "contacts": [{"email": "a@acme.io"}]}));
//!
//! let settings = json!({
//!     "subject": "Hello {{company}}",
//!     "to": "{{$.contacts[0].email}}",
//! });
//! assert_eq!(
//!     store.interpolate_container(&settings),
//!     json!({"subject": "Hello Acme", "to": "a@acme.io"})
//! );
//! ```
//!
//! ## Modules
//!
//! - `variables` - The per-run namespace, output binding, and step context projection
//! - `interpolation` - Path resolution, `$` queries, value formatting, and templates
//! - `config` - Engine settings (strict mode, logging of unresolved references)
//! - `error` - Error types for loading snapshots and configuration
//! - `app` - Command-line configuration, logging, and error reporting
pub mod app;
pub mod config;
pub mod error;
pub mod interpolation;
pub mod variables;

pub use config::EngineConfig;
pub use error::{FlowbindError, QueryError, Result};
pub use interpolation::{
    evaluate_query, extract_references, format_value, interpolate, interpolate_container,
    resolve_nested_path, Interpolated, InterpolationWarning, Interpolator, JsonPath,
    ReferenceKind, VariableSource,
};
pub use variables::{ExecutionIds, StepContext, VariableStore};
