//! Rule definition for analyzer diagnostics

use crate::diagnostic::Severity;
use serde::{Deserialize, Serialize};

/// Per-rule configuration (default or externally overridden)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Severity applied to results of this rule
    #[serde(default)]
    pub severity: Severity,
    /// Whether the rule produces results at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            severity: Severity::Warning,
            enabled: true,
        }
    }
}

/// A diagnostic rule declared by an analyzer
///
/// Immutable once declared. Rule ids must be unique across all analyzers
/// registered in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Globally unique rule identifier (e.g., "shared-output-path")
    pub id: String,
    /// Short human-readable name
    pub title: String,
    /// Detailed description
    pub description: String,
    /// Message template with positional placeholders ("{0}", "{1}", ...)
    pub message_format: String,
    /// Default configuration, applied unless overridden externally
    #[serde(default)]
    pub default_config: RuleConfig,
}

impl Rule {
    pub fn new(id: &str, title: &str, description: &str, message_format: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            message_format: message_format.to_string(),
            default_config: RuleConfig::default(),
        }
    }

    /// Set the default severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.default_config.severity = severity;
        self
    }

    /// Declare the rule as disabled unless enabled by configuration
    pub fn disabled_by_default(mut self) -> Self {
        self.default_config.enabled = false;
        self
    }

    /// Render the message template with positional arguments
    ///
    /// Placeholders without a matching argument are left as-is.
    pub fn format_message(&self, args: &[String]) -> String {
        let placeholder = regex::Regex::new(r"\{(\d+)\}").unwrap();
        placeholder
            .replace_all(&self.message_format, |caps: &regex::Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| args.get(i))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .to_string()
    }
}
