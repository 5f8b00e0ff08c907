//! External per-rule configuration overrides
//!
//! The host may supply a JSON document overriding severity and enablement per
//! rule id:
//!
//! ```json
//! {
//!   "rules": {
//!     "shared-output-path": { "severity": "error" },
//!     "some-other-rule": { "enabled": false }
//!   }
//! }
//! ```
//!
//! Overrides are honored for the current session only; this crate never
//! persists them.

use crate::diagnostic::Severity;
use crate::rule::{Rule, RuleConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error while reading or applying configuration overrides
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read configuration '{0}': {1}")]
    Read(PathBuf, String),

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("invalid severity '{value}' for rule '{rule_id}'")]
    InvalidSeverity { rule_id: String, value: String },

    #[error("analyzer '{analyzer}' rejected its configuration: {reason}")]
    Rejected { analyzer: String, reason: String },
}

/// A single rule override as supplied by the host
///
/// The severity is kept as a string until it is validated against a declared
/// rule, so a malformed value is attributed to that rule rather than failing
/// the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOverride {
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// The full set of external overrides for a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfiguration {
    #[serde(default)]
    pub rules: HashMap<String, RuleOverride>,
}

impl CheckConfiguration {
    /// Parse overrides from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(content).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Load overrides from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Read(path.to_path_buf(), e.to_string()))?;
        Self::from_json(&content)
    }
}

/// Effective per-rule configuration handed to one analyzer's `initialize`
///
/// Built from the analyzer's declared rules with external overrides applied.
/// Overrides naming rules this analyzer did not declare are ignored here;
/// another analyzer may declare them.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationContext {
    effective: HashMap<String, RuleConfig>,
}

impl ConfigurationContext {
    /// Apply overrides to the declared rule set
    pub fn build(
        rules: &[Rule],
        overrides: &CheckConfiguration,
    ) -> Result<Self, ConfigurationError> {
        let mut effective = HashMap::with_capacity(rules.len());

        for rule in rules {
            let mut config = rule.default_config;

            if let Some(over) = overrides.rules.get(&rule.id) {
                if let Some(raw) = &over.severity {
                    config.severity = raw.parse::<Severity>().map_err(|()| {
                        ConfigurationError::InvalidSeverity {
                            rule_id: rule.id.clone(),
                            value: raw.clone(),
                        }
                    })?;
                }
                if let Some(enabled) = over.enabled {
                    config.enabled = enabled;
                }
            }

            effective.insert(rule.id.clone(), config);
        }

        Ok(Self { effective })
    }

    /// Effective configuration for one declared rule
    pub fn rule_config(&self, rule_id: &str) -> Option<RuleConfig> {
        self.effective.get(rule_id).copied()
    }

    pub(crate) fn into_effective(self) -> HashMap<String, RuleConfig> {
        self.effective
    }
}
