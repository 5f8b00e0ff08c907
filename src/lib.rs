//! BuildCheck - Build Analysis Framework
//!
//! Rule-based analysis of build evaluation events, plus an isolation loader
//! that resolves plugin module dependencies without leaking into the host.
//!
//! # Architecture
//!
//! ```text
//! Host -> AnalysisDispatcher -> BuildAnalyzer -> CheckResult
//!      -> IsolationLoader -> resolver -> LoadedModule
//! ```
//!
//! Analyzers declare rules up front, subscribe to event kinds through a
//! registration context, and report results through a context that enforces
//! the declared rule set and the effective per-rule configuration. Analyzer
//! misbehavior (undeclared rules, panicking callbacks) is isolated into
//! faults and never aborts the host session.
//!
//! # Registering an Analyzer
//!
//! ```no_run
//! use buildcheck::analyzers::SharedOutputPathAnalyzer;
//! use buildcheck::config::CheckConfiguration;
//! use buildcheck::dispatcher::AnalysisDispatcher;
//! use std::sync::Arc;
//!
//! let mut dispatcher = AnalysisDispatcher::new();
//! let config = CheckConfiguration::default();
//! dispatcher
//!     .register_analyzer(Arc::new(SharedOutputPathAnalyzer::new()), &config)
//!     .unwrap();
//! ```

pub mod analyzer;
pub mod analyzers;
pub mod config;
pub mod diagnostic;
pub mod dispatcher;
pub mod events;
pub mod loader;
pub mod resolver;
pub mod rule;

// Re-export main types
pub use analyzer::{AnalyzerFault, BuildAnalyzer, CheckContext, RegistrationContext};
pub use analyzers::SharedOutputPathAnalyzer;
pub use config::{CheckConfiguration, ConfigurationContext, ConfigurationError, RuleOverride};
pub use diagnostic::{CheckResult, Location, Severity};
pub use dispatcher::{AnalysisDispatcher, DispatchOutcome, RegistrationError};
pub use events::{EvaluatedPropertiesData, EvaluatedProperty};
pub use loader::{IsolationLoader, LoadedModule, LoaderError, LoaderOptions, ModuleMetadata, Resolution};
pub use resolver::{
    CandidateSpec, ResolutionDecision, SharedNameSet, DEFAULT_EXTENSIONS, DEFAULT_HOST_SHARED_NAMES,
};
pub use rule::{Rule, RuleConfig};
