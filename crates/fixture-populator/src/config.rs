//! Fixture configuration files.
//!
//! A configuration file carries the population parameters together with
//! field strategies and exclusions, so a fixture setup can be shared
//! without code:
//!
//! ```yaml
//! seed: 42
//! max_collection_size: 3
//! max_randomization_depth: 4
//!
//! randomize:
//!   - owner: Person
//!     field: email
//!     type: string
//!     strategy:
//!       type: pattern
//!       pattern: "user_{rand:6}@example.com"
//!   - field: age
//!     type: uint8
//!     strategy:
//!       type: int_range
//!       min: 18
//!       max: 99
//!
//! exclude:
//!   - owner: Person
//!     field: password
//!   - type: bytes
//!
//! exclude_paths:
//!   - address.street
//! ```

use crate::context::PopulateOptions;
use crate::error::FixtureError;
use crate::parameters::Parameters;
use crate::populator::PopulatorBuilder;
use crate::strategy::StrategyConfig;
use fixture_core::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// A strategy attached to the fields matching a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomizeRule {
    /// Fields the strategy applies to; the declared type is required
    #[serde(flatten)]
    pub field: FieldDescriptor,

    /// How values are generated
    pub strategy: StrategyConfig,
}

/// Populator configuration loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Population parameters
    #[serde(flatten)]
    pub parameters: Parameters,

    /// Field strategies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub randomize: Vec<RandomizeRule>,

    /// Excluded fields and types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<FieldDescriptor>,

    /// Dot-separated field paths left untouched on every populate call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_paths: Vec<String>,

    /// Keys matching no parameter or section, kept so they can be reported
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_yaml::Value>,
}

impl FixtureConfig {
    /// Parse a configuration from a YAML string.
    ///
    /// Unknown keys (usually misspelled parameters) are logged and ignored.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        for key in config.unknown.keys() {
            warn!("Ignoring unknown config key '{key}'");
        }
        Ok(config)
    }

    /// Load a configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Apply the configuration to a builder.
    ///
    /// The builder's parameters are replaced by the configured ones, so
    /// builder overrides (such as a seed from the command line) belong after
    /// this call.
    pub fn apply(&self, builder: PopulatorBuilder) -> Result<PopulatorBuilder, FixtureError> {
        let mut builder = builder.parameters(self.parameters.clone());

        for rule in &self.randomize {
            let target = rule.field.declared_type.as_ref().ok_or_else(|| {
                FixtureError::AmbiguousFieldDefinition(format!(
                    "strategy '{}' for {} has no declared type",
                    rule.strategy.name(),
                    rule.field
                ))
            })?;
            let randomizer = rule.strategy.clone().into_randomizer(target)?;
            builder = builder.randomize(rule.field.clone(), randomizer)?;
        }

        for descriptor in &self.exclude {
            builder = builder.exclude(descriptor.clone())?;
        }

        Ok(builder)
    }

    /// Per-call options derived from the configuration.
    pub fn populate_options(&self) -> PopulateOptions {
        self.exclude_paths
            .iter()
            .fold(PopulateOptions::new(), |options, path| options.exclude_path(path.clone()))
    }
}
