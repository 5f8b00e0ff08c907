//! Shared output path analyzer
//!
//! Reference analyzer: tracks the output locations each project claims and
//! reports when two distinct projects resolve to the same location. Tracked
//! properties are `OutputPath` (primary) and `IntermediateOutputPath`
//! (secondary).

use crate::analyzer::{BuildAnalyzer, CheckContext, RegistrationContext};
use crate::events::EvaluatedProperty;
use crate::rule::Rule;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

const OUTPUT_PATH: &str = "OutputPath";
const INTERMEDIATE_OUTPUT_PATH: &str = "IntermediateOutputPath";

/// Detects two projects writing build artifacts to the same location
pub struct SharedOutputPathAnalyzer {
    rule: Rule,
    /// Projects already analyzed; a project is evaluated at most once per
    /// instance, so re-evaluations (e.g. outer and inner passes of a
    /// multi-targeted project) do not duplicate diagnostics
    visited: DashSet<String>,
    /// Normalized path key (lowercased) to owning project path; first writer
    /// wins, entries are never reassigned
    claimed: DashMap<String, String>,
}

impl SharedOutputPathAnalyzer {
    pub fn new() -> Self {
        Self {
            rule: Rule::new(
                "shared-output-path",
                "ConflictingOutputPath",
                "Two projects should not share their OutputPath nor IntermediateOutputPath locations",
                "Projects {0} and {1} have conflicting output paths: {2}.",
            ),
            visited: DashSet::new(),
            claimed: DashMap::new(),
        }
    }

    fn check_evaluated_properties(&self, ctx: &mut CheckContext<'_>) {
        let project = ctx.data.project_file_path.clone();

        // Atomic dedup: only the first evaluation of a project is analyzed.
        if !self.visited.insert(project.to_lowercase()) {
            return;
        }

        let bin = ctx.data.property(OUTPUT_PATH).cloned();
        let obj = ctx.data.property(INTERMEDIATE_OUTPUT_PATH).cloned();

        let bin_full = self.check_and_claim(bin.as_ref(), &project, ctx);

        if let Some(obj) = obj {
            let bin_raw = bin.map(|b| b.value).unwrap_or_default();
            // Skip the secondary value when it names the same physical
            // location as the primary, either verbatim or via the primary's
            // resolved absolute form.
            let duplicates_primary = eq_ignore_case(&obj.value, &bin_raw)
                || bin_full
                    .as_deref()
                    .is_some_and(|full| eq_ignore_case(&obj.value, full));
            if !duplicates_primary {
                self.check_and_claim(Some(&obj), &project, ctx);
            }
        }
    }

    /// Resolve a claimed path to normalized absolute form, then either claim
    /// it for `project` or report a conflict with the existing owner
    fn check_and_claim(
        &self,
        record: Option<&EvaluatedProperty>,
        project: &str,
        ctx: &mut CheckContext<'_>,
    ) -> Option<String> {
        let record = record?;
        if record.value.is_empty() {
            return None;
        }

        let mut full = PathBuf::from(&record.value);
        if full.is_relative() {
            let base = Path::new(project).parent().unwrap_or(Path::new(""));
            full = base.join(full);
        }
        let display = normalize_path(&full).to_string_lossy().into_owned();

        // Check-and-claim must be atomic: under a race for the same path,
        // exactly one project wins the entry and every later claimant is
        // reported against that owner.
        match self.claimed.entry(display.to_lowercase()) {
            Entry::Occupied(existing) => {
                let owner = existing.get();
                if !eq_ignore_case(owner, project) {
                    ctx.report_result(
                        &self.rule,
                        record.location(),
                        vec![
                            display_name(project),
                            display_name(owner),
                            display.clone(),
                        ],
                    );
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(project.to_string());
            }
        }

        Some(display)
    }
}

impl Default for SharedOutputPathAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildAnalyzer for SharedOutputPathAnalyzer {
    fn friendly_name(&self) -> &str {
        "SharedOutputPath"
    }

    fn supported_rules(&self) -> Vec<Rule> {
        vec![self.rule.clone()]
    }

    fn register_actions(self: Arc<Self>, registration: &mut RegistrationContext) {
        registration.register_evaluated_properties_action(Box::new(move |ctx| {
            self.check_evaluated_properties(ctx);
        }));
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn display_name(project: &str) -> String {
    Path::new(project)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project.to_string())
}

/// Lexically normalize a path: collapse `.`/`..` and canonicalize
/// separators without touching the filesystem (claimed output directories
/// need not exist at analysis time)
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && normalized.as_os_str().is_empty() {
                    normalized.push("..");
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
