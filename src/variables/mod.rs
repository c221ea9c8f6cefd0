//! Variable namespace for one execution run
//!
//! - `store` - the mutable namespace with snapshot/restore
//! - `binder` - promotion of step outputs into the namespace
//! - `context` - the read-only projection handed to step executors

mod binder;
mod context;
mod store;

pub use context::{ExecutionIds, StepContext};
pub use store::VariableStore;
