//! Module isolation loader
//!
//! One loader exists per plugin; it owns a private resolution boundary rooted
//! at the plugin's directory. Host contract modules are always deferred to
//! the host's default context so that exactly one copy of the contract types
//! is loaded across all plugins. Everything else is searched in the plugin's
//! directory (culture subfolder first for satellite requests), with a
//! last-resort fallback to the host tool directory.
//!
//! Candidate module files embed a JSON manifest declaring at least `name` and
//! `version`; the probe reads those two fields only and never activates the
//! module.

use crate::resolver::{
    candidate_paths, decide, CandidateSpec, ResolutionDecision, SharedNameSet, DEFAULT_EXTENSIONS,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Error constructing a loader
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("plugin module directory does not exist: {0}")]
    MissingDirectory(PathBuf),
}

/// Declared identity of a candidate module, read without activating it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleMetadata {
    pub name: String,
    pub version: String,
}

impl ModuleMetadata {
    /// Read the declared name/version from a candidate file
    ///
    /// An unreadable or invalid manifest yields `None`; the caller skips the
    /// candidate and continues searching.
    pub fn probe(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("cannot read candidate '{}': {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                log::debug!("candidate '{}' has no readable manifest: {}", path.display(), e);
                None
            }
        }
    }
}

/// A successfully resolved module, ready for the host to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    /// Concrete file the request resolved to
    pub path: PathBuf,
    /// Declared identity, when a manifest was readable
    pub metadata: Option<ModuleMetadata>,
}

/// Outcome of one resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Host contract module: the host's default context must supply it
    DeferToHost,
    /// Resolved to a concrete file
    Loaded(LoadedModule),
    /// No match; the caller's default resolution pipeline may continue
    Unresolved,
}

/// Loader construction options: injected, read-only configuration
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Names always deferred to the host
    pub shared_names: SharedNameSet,
    /// Extension precedence for candidate enumeration
    pub extensions: Vec<String>,
    /// Host tool directory for the last-resort simple-name fallback
    pub host_tools_dir: Option<PathBuf>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            shared_names: SharedNameSet::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            host_tools_dir: None,
        }
    }
}

/// Per-plugin isolation loader
///
/// Resolution on one instance is serialized; independent instances touch
/// disjoint directories and may resolve concurrently.
#[derive(Debug)]
pub struct IsolationLoader {
    directory: PathBuf,
    options: LoaderOptions,
    guard: Mutex<()>,
}

impl IsolationLoader {
    /// Construct a loader for the plugin whose primary module is at
    /// `module_path`
    ///
    /// A missing containing directory is fatal to this plugin's load.
    pub fn new(module_path: &Path) -> Result<Self, LoaderError> {
        Self::with_options(module_path, LoaderOptions::default())
    }

    pub fn with_options(module_path: &Path, options: LoaderOptions) -> Result<Self, LoaderError> {
        let directory = module_path
            .parent()
            .map(Path::to_path_buf)
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| LoaderError::MissingDirectory(module_path.to_path_buf()))?;

        Ok(Self {
            directory,
            options,
            guard: Mutex::new(()),
        })
    }

    /// The plugin directory this loader searches
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resolve a requested dependency name to a loadable file
    ///
    /// Search order: host-shared names defer outright; then each culture
    /// directory and extension in precedence order, accepting the first
    /// existing candidate whose declared version exactly equals the request
    /// (a mismatch is skipped, not an error); then a file literally named
    /// `name` in the host tool directory. Anything else is `Unresolved`.
    pub fn resolve(&self, spec: &CandidateSpec) -> Resolution {
        let _serialized = self.guard.lock().unwrap_or_else(PoisonError::into_inner);

        if decide(&spec.name, &self.options.shared_names) == ResolutionDecision::DeferToHost {
            log::debug!("'{}' is host-shared; deferring", spec.name);
            return Resolution::DeferToHost;
        }

        for candidate in candidate_paths(&self.directory, spec, &self.options.extensions) {
            if !candidate.is_file() {
                continue;
            }
            let Some(metadata) = ModuleMetadata::probe(&candidate) else {
                continue;
            };
            if metadata.version != spec.version {
                log::debug!(
                    "candidate '{}' declares version {} (requested {}); skipping",
                    candidate.display(),
                    metadata.version,
                    spec.version
                );
                continue;
            }
            return Resolution::Loaded(LoadedModule {
                path: candidate,
                metadata: Some(metadata),
            });
        }

        // Last resort once the versioned search is exhausted: a file named
        // exactly `name` next to the host tools, taken without version
        // gating.
        if let Some(host_dir) = &self.options.host_tools_dir {
            let fallback = host_dir.join(&spec.name);
            if fallback.is_file() {
                let metadata = ModuleMetadata::probe(&fallback);
                return Resolution::Loaded(LoadedModule {
                    path: fallback,
                    metadata,
                });
            }
        }

        Resolution::Unresolved
    }
}
