//! Engine configuration
//!
//! Settings are read from a TOML file and may be overridden through
//! `FLOWBIND_*` environment variables.

use crate::error::{FlowbindError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Interpolation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record a warning for every placeholder that resolves to absence
    pub strict_mode: bool,
    /// Emit a tracing event for unresolved placeholders
    pub log_unresolved: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            log_unresolved: true,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| FlowbindError::io(path, e))?;
        let mut config = Self::from_toml_str(&content)?;
        config.merge_env_vars();
        Ok(config)
    }

    /// Apply `FLOWBIND_STRICT` and `FLOWBIND_LOG_UNRESOLVED` overrides.
    ///
    /// Only the literals `true` and `false` are recognised; any other value
    /// (such as `1` or `yes`) leaves the setting unchanged.
    pub fn merge_env_vars(&mut self) {
        if let Some(strict) = env_flag("FLOWBIND_STRICT") {
            self.strict_mode = strict;
        }
        if let Some(log) = env_flag("FLOWBIND_LOG_UNRESOLVED") {
            self.log_unresolved = log;
        }
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok()?.parse().ok()
}
