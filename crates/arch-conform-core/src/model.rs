//! Structural model of a codebase: declarations, namespaces, markers.
//!
//! This module contains no syn, no I/O dependencies. Providers materialize
//! [`Declaration`] snapshots before evaluation begins; rules only ever read
//! them.

use crate::types::SourceLocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Errors constructing model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Namespace path string was empty.
    #[error("namespace path must not be empty")]
    EmptyNamespace,

    /// Namespace path contained an empty segment.
    #[error("namespace path `{path}` contains an empty segment")]
    EmptySegment {
        /// The offending path string.
        path: String,
    },

    /// Marker name was empty.
    #[error("marker name must not be empty")]
    EmptyMarker,
}

/// A hierarchical namespace path — an ordered sequence of segments.
///
/// Prefix matching is segment-wise: `crate::logging` is a prefix of
/// `crate::logging::access`, but not of `crate::loggingutils`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespacePath(Vec<String>);

impl NamespacePath {
    /// Creates a path from owned segments.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment list is empty or any segment is
    /// empty. An empty path would prefix-match every other path.
    pub fn new(segments: Vec<String>) -> Result<Self, ModelError> {
        if segments.is_empty() {
            return Err(ModelError::EmptyNamespace);
        }
        if segments.iter().any(String::is_empty) {
            return Err(ModelError::EmptySegment {
                path: segments.join("::"),
            });
        }
        Ok(Self(segments))
    }

    /// Parses a `::` separated path string (e.g., `crate::location`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or contains empty segments.
    pub fn parse(path: &str) -> Result<Self, ModelError> {
        if path.is_empty() {
            return Err(ModelError::EmptyNamespace);
        }
        let segments: Vec<String> = path.split("::").map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ModelError::EmptySegment {
                path: path.to_string(),
            });
        }
        Ok(Self(segments))
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Tests whether this path starts with `prefix`, segment-wise.
    ///
    /// Every segment of the prefix must match the corresponding segment
    /// exactly; substring matches do not count.
    #[must_use]
    pub fn starts_with(&self, prefix: &NamespacePath) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("::"))
    }
}

/// A validated marker name used to select declarations for a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerName(String);

impl MarkerName {
    /// Creates a new marker name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn new(name: &str) -> Result<Self, ModelError> {
        if name.is_empty() {
            return Err(ModelError::EmptyMarker);
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarkerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable snapshot of a named structural unit in a codebase.
///
/// Produced by a model provider at evaluation time; rules never mutate it.
/// Callable declarations carry a parameter count; structs, enums and other
/// non-callable declarations do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    name: String,
    namespace: NamespacePath,
    markers: BTreeSet<String>,
    parameter_count: Option<usize>,
    location: Option<SourceLocation>,
}

impl Declaration {
    /// Creates a new declaration with the given fully-qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: NamespacePath) -> Self {
        Self {
            name: name.into(),
            namespace,
            markers: BTreeSet::new(),
            parameter_count: None,
            location: None,
        }
    }

    /// Attaches a marker to this declaration.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.insert(marker.into());
        self
    }

    /// Marks this declaration as callable with `count` parameters.
    #[must_use]
    pub fn with_parameter_count(mut self, count: usize) -> Self {
        self.parameter_count = Some(count);
        self
    }

    /// Attaches a source location to this declaration.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Returns the fully-qualified name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace path.
    #[must_use]
    pub fn namespace(&self) -> &NamespacePath {
        &self.namespace
    }

    /// Returns the attached markers.
    #[must_use]
    pub fn markers(&self) -> &BTreeSet<String> {
        &self.markers
    }

    /// Tests whether this declaration carries the given marker.
    #[must_use]
    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    /// Returns the parameter count, or `None` for non-callable declarations.
    #[must_use]
    pub fn parameter_count(&self) -> Option<usize> {
        self.parameter_count
    }

    /// Returns the source location, if the provider supplied one.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }
}
