//! Event dispatch for registered analyzers
//!
//! The dispatcher maps build-evaluation event kinds to the callbacks
//! registered by loaded analyzers. Registration happens up front on a single
//! thread; dispatch may then be driven concurrently from the host's worker
//! threads (one call per delivered event).

use crate::analyzer::{AnalyzerFault, BuildAnalyzer, CheckContext, RegistrationContext};
use crate::config::{CheckConfiguration, ConfigurationContext, ConfigurationError};
use crate::diagnostic::CheckResult;
use crate::events::EvaluatedPropertiesData;
use crate::rule::RuleConfig;
use std::collections::{HashMap, HashSet};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// Error while registering an analyzer
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("analyzer '{0}' declares no rules")]
    NoRules(String),

    #[error("rule '{rule_id}' from analyzer '{analyzer}' is already registered")]
    DuplicateRule { rule_id: String, analyzer: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Outcome of dispatching one event
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    /// Results reported by analyzers, in callback registration order
    pub results: Vec<CheckResult>,
    /// Faults attributed to misbehaving analyzers
    pub faults: Vec<AnalyzerFault>,
}

impl DispatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.results.is_empty() && self.faults.is_empty()
    }

    pub fn merge(&mut self, other: DispatchOutcome) {
        self.results.extend(other.results);
        self.faults.extend(other.faults);
    }
}

struct AnalyzerRegistration {
    name: String,
    declared: HashSet<String>,
    configs: HashMap<String, RuleConfig>,
    actions: RegistrationContext,
}

/// Routes build-evaluation events to registered analyzer callbacks
#[derive(Default)]
pub struct AnalysisDispatcher {
    registrations: Vec<AnalyzerRegistration>,
    rule_ids: HashSet<String>,
}

impl AnalysisDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered analyzers
    pub fn analyzer_count(&self) -> usize {
        self.registrations.len()
    }

    /// Whether a rule id is registered in this session
    pub fn has_rule(&self, rule_id: &str) -> bool {
        self.rule_ids.contains(rule_id)
    }

    /// Register an analyzer for the session
    ///
    /// Validates the declared rule set (non-empty, session-unique ids),
    /// applies external overrides, runs `initialize`, and collects the
    /// analyzer's event subscriptions. On any error the analyzer is not
    /// executed and the dispatcher is left unchanged.
    pub fn register_analyzer(
        &mut self,
        analyzer: Arc<dyn BuildAnalyzer>,
        overrides: &CheckConfiguration,
    ) -> Result<(), RegistrationError> {
        let name = analyzer.friendly_name().to_string();
        let rules = analyzer.supported_rules();
        if rules.is_empty() {
            return Err(RegistrationError::NoRules(name));
        }

        let mut declared = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if self.rule_ids.contains(&rule.id) || !declared.insert(rule.id.clone()) {
                return Err(RegistrationError::DuplicateRule {
                    rule_id: rule.id.clone(),
                    analyzer: name,
                });
            }
        }

        let context = ConfigurationContext::build(&rules, overrides)?;
        analyzer.initialize(&context)?;

        let mut actions = RegistrationContext::new();
        Arc::clone(&analyzer).register_actions(&mut actions);

        log::debug!(
            "registered analyzer '{}' with {} rule(s), {} evaluated-properties action(s)",
            name,
            rules.len(),
            actions.evaluated_properties.len()
        );

        self.rule_ids.extend(declared.iter().cloned());
        self.registrations.push(AnalyzerRegistration {
            name,
            declared,
            configs: context.into_effective(),
            actions,
        });
        Ok(())
    }

    /// Deliver one "evaluated properties available" event
    ///
    /// Callbacks run in registration order. A callback that panics is
    /// isolated: it yields a fault naming the analyzer, and remaining
    /// callbacks still run. Safe to call concurrently from multiple threads;
    /// analyzers guard their own shared state.
    pub fn dispatch_evaluated_properties(
        &self,
        data: &EvaluatedPropertiesData,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        for registration in &self.registrations {
            for action in &registration.actions.evaluated_properties {
                let mut ctx = CheckContext {
                    data,
                    analyzer: &registration.name,
                    declared: &registration.declared,
                    configs: &registration.configs,
                    results: &mut outcome.results,
                    faults: &mut outcome.faults,
                };

                if let Err(panic) = catch_unwind(AssertUnwindSafe(|| action(&mut ctx))) {
                    let message = panic_message(panic);
                    log::warn!(
                        "analyzer '{}' panicked while handling evaluated properties for '{}': {}",
                        registration.name,
                        data.project_file_path,
                        message
                    );
                    outcome.faults.push(AnalyzerFault::CallbackPanicked {
                        analyzer: registration.name.clone(),
                        message,
                    });
                }
            }
        }

        outcome
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
