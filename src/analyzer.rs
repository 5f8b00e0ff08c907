//! Analyzer contract: rule declaration, action registration, result reporting

use crate::config::{ConfigurationContext, ConfigurationError};
use crate::diagnostic::{CheckResult, Location, Severity};
use crate::events::EvaluatedPropertiesData;
use crate::rule::{Rule, RuleConfig};
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// A problem with an analyzer itself, as opposed to a finding about the build
///
/// Faults are isolated to the offending analyzer invocation; they never abort
/// other analyzers or the host session.
#[derive(Debug, Clone, Error)]
pub enum AnalyzerFault {
    #[error("analyzer '{analyzer}' reported undeclared rule '{rule_id}'")]
    UndeclaredRule { analyzer: String, rule_id: String },

    #[error("analyzer '{analyzer}' panicked during a callback: {message}")]
    CallbackPanicked { analyzer: String, message: String },
}

impl AnalyzerFault {
    /// Friendly name of the analyzer at fault
    pub fn analyzer(&self) -> &str {
        match self {
            AnalyzerFault::UndeclaredRule { analyzer, .. }
            | AnalyzerFault::CallbackPanicked { analyzer, .. } => analyzer,
        }
    }
}

/// Callback invoked when a project's evaluated properties become available
pub type EvaluatedPropertiesAction =
    Box<dyn Fn(&mut CheckContext<'_>) + Send + Sync>;

/// A pluggable build analyzer
///
/// Implementations declare a non-empty rule set, may adjust to incoming
/// configuration in `initialize`, and subscribe callbacks through
/// `register_actions`. Shared per-instance state must tolerate concurrent
/// callbacks from multiple host worker threads.
pub trait BuildAnalyzer: Send + Sync {
    /// Human-readable analyzer name (used in fault reporting)
    fn friendly_name(&self) -> &str;

    /// Rules this analyzer may report under; must be non-empty
    fn supported_rules(&self) -> Vec<Rule>;

    /// One-time configuration hook; a returned error prevents execution
    fn initialize(&self, config: &ConfigurationContext) -> Result<(), ConfigurationError> {
        let _ = config;
        Ok(())
    }

    /// Subscribe callbacks to event kinds; invoked exactly once
    fn register_actions(self: Arc<Self>, registration: &mut RegistrationContext);
}

/// Collects an analyzer's event subscriptions
///
/// Event kinds form a closed set; each kind keeps its callbacks in
/// registration order.
#[derive(Default)]
pub struct RegistrationContext {
    pub(crate) evaluated_properties: Vec<EvaluatedPropertiesAction>,
}

impl RegistrationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to "evaluated properties available" events
    pub fn register_evaluated_properties_action(&mut self, action: EvaluatedPropertiesAction) {
        self.evaluated_properties.push(action);
    }
}

/// Per-invocation context handed to a callback: the triggering payload plus a
/// reporting sink bound to the owning analyzer's declared rule set
pub struct CheckContext<'a> {
    /// The triggering event payload
    pub data: &'a EvaluatedPropertiesData,
    pub(crate) analyzer: &'a str,
    pub(crate) declared: &'a HashSet<String>,
    pub(crate) configs: &'a HashMap<String, RuleConfig>,
    pub(crate) results: &'a mut Vec<CheckResult>,
    pub(crate) faults: &'a mut Vec<AnalyzerFault>,
}

impl CheckContext<'_> {
    /// Report a result under one of the analyzer's declared rules
    ///
    /// Reporting an undeclared rule is a contract violation: it is recorded
    /// as a fault about the analyzer and the result is discarded. Results for
    /// disabled rules (or rules configured to severity `none`) are dropped.
    pub fn report_result(&mut self, rule: &Rule, location: Location, message_args: Vec<String>) {
        if !self.declared.contains(&rule.id) {
            log::warn!(
                "analyzer '{}' tried to report undeclared rule '{}'",
                self.analyzer,
                rule.id
            );
            self.faults.push(AnalyzerFault::UndeclaredRule {
                analyzer: self.analyzer.to_string(),
                rule_id: rule.id.clone(),
            });
            return;
        }

        let config = self
            .configs
            .get(&rule.id)
            .copied()
            .unwrap_or(rule.default_config);
        if !config.enabled || config.severity == Severity::None {
            return;
        }

        let message = rule.format_message(&message_args);
        self.results.push(CheckResult {
            rule_id: rule.id.clone(),
            severity: config.severity,
            location,
            message_args,
            message,
        });
    }
}
