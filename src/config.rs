//! Configuration management

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use mender_core::{Mender, ValidationRule, ValidatorRegistry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Prefix for configuration environment variables
pub const ENV_PREFIX: &str = "TOOL_MENDER_";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Policy for requests that omit `strict_mode`
    pub strict_mode: bool,
    /// Register the built-in `calculator` and `available_model` rules
    pub builtin_rules: bool,
    /// Additional validation rules; a rule named like a built-in replaces it
    pub rules: Vec<ValidationRule>,
    /// Server identity reported during `initialize`
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_mode: false,
            builtin_rules: true,
            rules: Vec::new(),
            server: ServerConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name reported in `serverInfo`
    pub name: String,
    /// Instructions returned from `initialize`
    pub instructions: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "tool-mender".to_string(),
            instructions: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional YAML file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        // Merge environment variables (TOOL_MENDER_ prefix, `__` for nesting)
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.check()?;
        debug!(
            strict_mode = config.strict_mode,
            rules = config.rules.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject rules that could never match a tool.
    fn check(&self) -> Result<()> {
        if let Some(pos) = self.rules.iter().position(|r| r.name.trim().is_empty()) {
            return Err(Error::Config(format!("rules[{pos}]: name is required")));
        }
        Ok(())
    }

    /// Build the validator registry described by this configuration.
    #[must_use]
    pub fn registry(&self) -> ValidatorRegistry {
        let mut registry = if self.builtin_rules {
            ValidatorRegistry::with_builtins()
        } else {
            ValidatorRegistry::empty()
        };

        for rule in &self.rules {
            let name = rule.name.clone();
            if registry.register(rule.clone()) {
                info!(rule = %name, "Configured rule replaces an existing validator");
            }
        }

        registry
    }

    /// Build the repair pipeline described by this configuration.
    #[must_use]
    pub fn mender(&self) -> Mender {
        Mender::new(self.registry()).with_default_strict(self.strict_mode)
    }
}
