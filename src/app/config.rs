//! Command-line application configuration

use crate::config::EngineConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Settings shared by every `flowbind` subcommand
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Engine settings file (TOML)
    pub config_path: Option<PathBuf>,
    /// Forces strict mode regardless of the settings file
    pub strict: bool,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Get the log filter string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Resolve the engine configuration for this invocation
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let config = match &self.config_path {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("Failed to load engine config {}", path.display()))?,
            None => {
                let mut config = EngineConfig::default();
                config.merge_env_vars();
                config
            }
        };

        Ok(if self.strict {
            config.with_strict_mode(true)
        } else {
            config
        })
    }
}
