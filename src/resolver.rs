//! Pure candidate search for plugin module resolution
//!
//! Everything here is filesystem-free: the shared-name decision, the culture
//! search order, and candidate path enumeration are pure functions over
//! injected, read-only data. The loader layers existence checks and metadata
//! probing on top.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Module names that must always resolve to the host's own loaded copy
///
/// Keeping exactly one copy of the host contract modules across all plugins
/// prevents type-identity mismatches at the plugin/host boundary.
pub const DEFAULT_HOST_SHARED_NAMES: [&str; 4] = [
    "buildcheck",
    "buildcheck-framework",
    "buildcheck-tasks",
    "buildcheck-utilities",
];

/// Candidate file extensions, in precedence order: native-image dynamic
/// library, native-image executable, managed dynamic library, managed
/// executable.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["ni.dll", "ni.exe", "dll", "exe"];

/// Immutable set of host-owned module names
#[derive(Debug, Clone)]
pub struct SharedNameSet {
    names: HashSet<String>,
}

impl SharedNameSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Default for SharedNameSet {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_SHARED_NAMES)
    }
}

/// One dependency resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpec {
    /// Simple module name, without extension
    pub name: String,
    /// Requested version; matched by exact equality
    pub version: String,
    /// Requested culture for satellite resources, if any
    pub culture: Option<String>,
}

impl CandidateSpec {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            culture: None,
        }
    }

    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = Some(culture.to_string());
        self
    }
}

/// First-tier resolution decision for a requested name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionDecision {
    /// Host contract module: defer to the host's default context
    DeferToHost,
    /// Plugin dependency: search the loader's isolated directory
    SearchIsolated,
}

/// Decide whether a name is host-owned or subject to isolated search
pub fn decide(name: &str, shared: &SharedNameSet) -> ResolutionDecision {
    if shared.contains(name) {
        ResolutionDecision::DeferToHost
    } else {
        ResolutionDecision::SearchIsolated
    }
}

/// Culture directories to search, in precedence order
///
/// With no requested culture only the bare directory is searched; otherwise
/// the culture subfolder takes precedence over the bare directory, so
/// culture-specific satellite resources win over neutral ones.
pub fn culture_search_order(culture: Option<&str>) -> Vec<Option<&str>> {
    match culture {
        None | Some("") => vec![None],
        Some(c) => vec![Some(c), None],
    }
}

/// Enumerate candidate file locations for a request, in search order
///
/// Purely combinatorial; existence and metadata checks are the caller's job.
pub fn candidate_paths(directory: &Path, spec: &CandidateSpec, extensions: &[String]) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2 * extensions.len());

    for culture in culture_search_order(spec.culture.as_deref()) {
        let base = match culture {
            Some(c) => directory.join(c),
            None => directory.to_path_buf(),
        };
        for extension in extensions {
            candidates.push(base.join(format!("{}.{}", spec.name, extension)));
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extensions() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_host_shared_name_defers() {
        let shared = SharedNameSet::default();
        assert_eq!(
            decide("buildcheck-framework", &shared),
            ResolutionDecision::DeferToHost
        );
        assert_eq!(
            decide("some-plugin-dep", &shared),
            ResolutionDecision::SearchIsolated
        );
    }

    #[test]
    fn test_decision_is_exact_match() {
        let shared = SharedNameSet::default();
        // No prefix or case games: only the literal names defer.
        assert_eq!(
            decide("buildcheck-framework-extras", &shared),
            ResolutionDecision::SearchIsolated
        );
        assert_eq!(
            decide("Buildcheck", &shared),
            ResolutionDecision::SearchIsolated
        );
    }

    #[test]
    fn test_culture_order_without_culture() {
        assert_eq!(culture_search_order(None), vec![None]);
        assert_eq!(culture_search_order(Some("")), vec![None]);
    }

    #[test]
    fn test_culture_order_with_culture() {
        assert_eq!(
            culture_search_order(Some("fr-FR")),
            vec![Some("fr-FR"), None]
        );
    }

    #[test]
    fn test_candidate_paths_bare_directory() {
        let spec = CandidateSpec::new("dep", "1.0.0");
        let paths = candidate_paths(Path::new("/plugins/p1"), &spec, &extensions());
        let expected: Vec<PathBuf> = [
            "/plugins/p1/dep.ni.dll",
            "/plugins/p1/dep.ni.exe",
            "/plugins/p1/dep.dll",
            "/plugins/p1/dep.exe",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_candidate_paths_culture_takes_precedence() {
        let spec = CandidateSpec::new("dep", "1.0.0").with_culture("de-DE");
        let paths = candidate_paths(Path::new("/plugins/p1"), &spec, &extensions());
        assert_eq!(paths.len(), 8);
        assert_eq!(paths[0], PathBuf::from("/plugins/p1/de-DE/dep.ni.dll"));
        assert_eq!(paths[4], PathBuf::from("/plugins/p1/dep.ni.dll"));
    }

    #[test]
    fn test_custom_shared_names() {
        let shared = SharedNameSet::new(["host-core"]);
        assert_eq!(decide("host-core", &shared), ResolutionDecision::DeferToHost);
        assert_eq!(
            decide("buildcheck", &shared),
            ResolutionDecision::SearchIsolated
        );
    }
}
