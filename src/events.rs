//! Build-evaluation event payloads
//!
//! These are produced by the host's evaluation engine, once per project per
//! evaluation pass, and delivered to registered analyzers through the
//! dispatcher.

use crate::diagnostic::Location;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One evaluated property value with its source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedProperty {
    /// Evaluated value
    pub value: String,
    /// File the assignment came from
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl EvaluatedProperty {
    pub fn new(value: &str, file: &str, line: usize, column: usize) -> Self {
        Self {
            value: value.to_string(),
            file: PathBuf::from(file),
            line,
            column,
        }
    }

    /// Source location of the assignment
    pub fn location(&self) -> Location {
        Location::new(self.file.clone(), self.line, self.column)
    }
}

/// Evaluated properties of one project
///
/// The property mapping preserves the evaluation engine's insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluatedPropertiesData {
    /// Full path of the evaluated project file
    pub project_file_path: String,
    properties: Vec<(String, EvaluatedProperty)>,
}

impl EvaluatedPropertiesData {
    pub fn new(project_file_path: &str) -> Self {
        Self {
            project_file_path: project_file_path.to_string(),
            properties: Vec::new(),
        }
    }

    /// Append a property record, preserving order
    pub fn with_property(mut self, name: &str, property: EvaluatedProperty) -> Self {
        self.properties.push((name.to_string(), property));
        self
    }

    /// Look up a property by name (first match wins)
    pub fn property(&self, name: &str) -> Option<&EvaluatedProperty> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Iterate properties in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EvaluatedProperty)> {
        self.properties.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_lookup() {
        let data = EvaluatedPropertiesData::new("/src/a/a.proj")
            .with_property("OutputPath", EvaluatedProperty::new("bin", "a.proj", 3, 5))
            .with_property("Other", EvaluatedProperty::new("x", "a.proj", 4, 5));

        assert_eq!(data.property("OutputPath").unwrap().value, "bin");
        assert!(data.property("Missing").is_none());
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let data = EvaluatedPropertiesData::new("/src/a/a.proj")
            .with_property("B", EvaluatedProperty::new("2", "a.proj", 1, 1))
            .with_property("A", EvaluatedProperty::new("1", "a.proj", 2, 1));

        let names: Vec<&str> = data.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_property_location() {
        let prop = EvaluatedProperty::new("bin", "/src/a/a.proj", 3, 5);
        let loc = prop.location();
        assert_eq!(loc.line, 3);
        assert_eq!(loc.column, 5);
        assert_eq!(loc.file, PathBuf::from("/src/a/a.proj"));
    }
}
