//! Declarative conformance rules driven by TOML configuration.
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! RuleSectionsDto
//!   ↓ validate + convert
//! rule instances, exclusion-wrapped
//!   ↓ load_rules_from_toml()
//! Vec<RuleBox>
//! ```
//!
//! Rule configuration is plain data: marker names, arity bounds, and
//! excluded namespace prefixes all come from `[[marker-arity]]` and
//! `[[exclude-namespace]]` sections, never from constants in the engine.

use arch_conform_core::{ModelError, NamespacePath, RuleBox, Severity};
use serde::Deserialize;
use tracing::debug;

use crate::marker_arity::MarkerArityRule;
use crate::namespace_exclusion::NamespaceExclusion;

/// Raw TOML representation of the declarative rule sections.
///
/// Shares a file with the base `Config`; both parsers skip the sections
/// they do not own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleSectionsDto {
    /// Marker arity rules.
    #[serde(rename = "marker-arity", default)]
    pub marker_arity: Vec<MarkerArityDto>,

    /// Namespace exclusions applied over the rules above.
    #[serde(rename = "exclude-namespace", default)]
    pub exclude_namespace: Vec<ExcludeNamespaceDto>,
}

/// TOML representation of a marker arity rule.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerArityDto {
    /// Rule instance name (e.g., "location-streamer-arity").
    pub name: String,
    /// Marker that selects declarations for scrutiny.
    pub marker: String,
    /// Inclusive lower bound on argument count.
    pub min_args: usize,
    /// Inclusive upper bound on argument count.
    pub max_args: usize,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
    /// Document reference.
    #[serde(default)]
    pub doc: Option<String>,
}

/// TOML representation of a namespace exclusion.
#[derive(Debug, Clone, Deserialize)]
pub struct ExcludeNamespaceDto {
    /// Excluded namespace prefixes (e.g., `"crate::logging"`).
    pub namespaces: Vec<String>,
    /// Names of the rule instances to wrap; all rules when omitted.
    #[serde(default)]
    pub rules: Option<Vec<String>>,
}

fn default_severity_str() -> String {
    "error".to_string()
}

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., "marker-arity 'foo'.marker").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// `min_args` exceeds `max_args`.
    #[error("marker-arity '{rule}': min_args {min_args} exceeds max_args {max_args}")]
    InvertedBounds {
        /// The offending rule instance.
        rule: String,
        /// Configured lower bound.
        min_args: usize,
        /// Configured upper bound.
        max_args: usize,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// An exclusion referenced a rule instance that is not defined.
    #[error("{context}: unknown rule `{name}`")]
    UnknownRule {
        /// Where the error occurred.
        context: String,
        /// The unresolved rule name.
        name: String,
    },

    /// An exclusion section listed no namespaces.
    #[error("exclude-namespace[{index}]: at least one namespace is required")]
    EmptyExclusion {
        /// Index of the offending section.
        index: usize,
    },
}

/// Parses TOML content and creates all configured rules, with namespace
/// exclusions already applied as wrappers.
///
/// Returns `Ok(vec![])` if no rule sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<RuleBox>, LoadError> {
    let dto: RuleSectionsDto = toml::from_str(content)?;
    create_rules(dto)
}

/// Creates all configured rules from a parsed [`RuleSectionsDto`].
///
/// # Errors
///
/// Returns an error if validation fails.
pub fn create_rules(dto: RuleSectionsDto) -> Result<Vec<RuleBox>, LoadError> {
    let mut named: Vec<(String, RuleBox)> = dto
        .marker_arity
        .into_iter()
        .map(convert_marker_arity)
        .collect::<Result<Vec<_>, _>>()?;

    for (index, exclusion) in dto.exclude_namespace.iter().enumerate() {
        let prefixes = convert_prefixes(exclusion, index)?;
        validate_rule_refs(exclusion, &named, index)?;

        named = named
            .into_iter()
            .map(|(name, rule)| {
                if applies_to(exclusion, &name) {
                    debug!("Wrapping rule `{name}` with namespace exclusion");
                    let wrapped: RuleBox =
                        Box::new(NamespaceExclusion::wrap(rule, prefixes.clone()));
                    (name, wrapped)
                } else {
                    (name, rule)
                }
            })
            .collect();
    }

    Ok(named.into_iter().map(|(_, rule)| rule).collect())
}

fn convert_marker_arity(dto: MarkerArityDto) -> Result<(String, RuleBox), LoadError> {
    if dto.min_args > dto.max_args {
        return Err(LoadError::InvertedBounds {
            rule: dto.name,
            min_args: dto.min_args,
            max_args: dto.max_args,
        });
    }

    let severity = parse_severity(&dto.severity, &format!("marker-arity '{}'", dto.name))?;

    let mut rule = MarkerArityRule::new(&dto.name, &dto.marker, dto.min_args, dto.max_args)
        .map_err(|e| LoadError::Validation {
            context: format!("marker-arity '{}'.marker", dto.name),
            source: e,
        })?
        .with_severity(severity);
    if let Some(doc) = dto.doc {
        rule = rule.with_doc_ref(doc);
    }

    Ok((dto.name, Box::new(rule)))
}

fn convert_prefixes(
    dto: &ExcludeNamespaceDto,
    index: usize,
) -> Result<Vec<NamespacePath>, LoadError> {
    if dto.namespaces.is_empty() {
        return Err(LoadError::EmptyExclusion { index });
    }

    dto.namespaces
        .iter()
        .enumerate()
        .map(|(i, ns)| {
            NamespacePath::parse(ns).map_err(|e| LoadError::Validation {
                context: format!("exclude-namespace[{index}].namespaces[{i}]"),
                source: e,
            })
        })
        .collect()
}

fn validate_rule_refs(
    dto: &ExcludeNamespaceDto,
    named: &[(String, RuleBox)],
    index: usize,
) -> Result<(), LoadError> {
    let Some(refs) = &dto.rules else {
        return Ok(());
    };

    for name in refs {
        if !named.iter().any(|(defined, _)| defined == name) {
            return Err(LoadError::UnknownRule {
                context: format!("exclude-namespace[{index}].rules"),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

fn applies_to(dto: &ExcludeNamespaceDto, rule_name: &str) -> bool {
    dto.rules
        .as_ref()
        .map_or(true, |refs| refs.iter().any(|r| r == rule_name))
}

fn parse_severity(value: &str, context: &str) -> Result<Severity, LoadError> {
    match value {
        "error" => Ok(Severity::Error),
        "warning" => Ok(Severity::Warning),
        "info" => Ok(Severity::Info),
        _ => Err(LoadError::UnknownSeverity {
            context: context.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arch_conform_core::{Declaration, Rule};

    fn marked(namespace: &str, count: usize) -> Declaration {
        Declaration::new(
            format!("{namespace}::send"),
            NamespacePath::parse(namespace).unwrap(),
        )
        .with_marker("location_info_streamer")
        .with_parameter_count(count)
    }

    // -- Happy path --

    #[test]
    fn load_empty_content() {
        let rules = load_rules_from_toml("").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn load_ignores_base_config_sections() {
        let rules = load_rules_from_toml(
            r#"
fail_on = "error"

[model]
root = "src"
"#,
        )
        .unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn load_marker_arity_rule() {
        let rules = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "location-streamer-arity"
marker = "location_info_streamer"
min_args = 1
max_args = 3
doc = "CONVENTIONS.md L12"
"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name(), "marker-arity");

        let violation = rules[0]
            .evaluate(&marked("crate::location", 0))
            .unwrap()
            .unwrap();
        assert_eq!(violation.rule, "location-streamer-arity");
        assert_eq!(violation.doc_ref.as_deref(), Some("CONVENTIONS.md L12"));
    }

    #[test]
    fn load_applies_exclusion_to_all_rules_by_default() {
        let rules = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "location-streamer-arity"
marker = "location_info_streamer"
min_args = 1
max_args = 3

[[exclude-namespace]]
namespaces = ["crate::logging"]
"#,
        )
        .unwrap();

        assert!(rules[0]
            .evaluate(&marked("crate::logging", 0))
            .unwrap()
            .is_none());
        assert!(rules[0]
            .evaluate(&marked("crate::location", 0))
            .unwrap()
            .is_some());
    }

    #[test]
    fn load_applies_exclusion_to_named_rules_only() {
        let rules = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "streamer-arity"
marker = "location_info_streamer"
min_args = 1
max_args = 3

[[marker-arity]]
name = "audit-arity"
marker = "location_info_streamer"
min_args = 1
max_args = 3

[[exclude-namespace]]
namespaces = ["crate::logging"]
rules = ["streamer-arity"]
"#,
        )
        .unwrap();

        // Rule order follows section order
        let excluded = marked("crate::logging", 0);
        assert!(rules[0].evaluate(&excluded).unwrap().is_none());
        assert!(rules[1].evaluate(&excluded).unwrap().is_some());
    }

    #[test]
    fn load_severity_override() {
        let rules = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "soft"
marker = "location_info_streamer"
min_args = 1
max_args = 3
severity = "warning"
"#,
        )
        .unwrap();

        let violation = rules[0]
            .evaluate(&marked("crate::location", 0))
            .unwrap()
            .unwrap();
        assert_eq!(violation.severity, Severity::Warning);
    }

    // -- Error cases --

    #[test]
    fn load_rejects_inverted_bounds() {
        let result = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "bad"
marker = "m"
min_args = 3
max_args = 1
"#,
        );
        assert!(matches!(result, Err(LoadError::InvertedBounds { .. })));
    }

    #[test]
    fn load_rejects_empty_marker() {
        let result = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "bad"
marker = ""
min_args = 1
max_args = 3
"#,
        );
        assert!(matches!(result, Err(LoadError::Validation { .. })));
    }

    #[test]
    fn load_rejects_unknown_severity() {
        let result = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "bad"
marker = "m"
min_args = 1
max_args = 3
severity = "critical"
"#,
        );
        assert!(matches!(result, Err(LoadError::UnknownSeverity { .. })));
    }

    #[test]
    fn load_rejects_unknown_rule_reference() {
        let result = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "streamer-arity"
marker = "m"
min_args = 1
max_args = 3

[[exclude-namespace]]
namespaces = ["crate::logging"]
rules = ["nonexistent"]
"#,
        );
        assert!(matches!(result, Err(LoadError::UnknownRule { .. })));
    }

    #[test]
    fn load_rejects_empty_exclusion() {
        let result = load_rules_from_toml(
            r#"
[[exclude-namespace]]
namespaces = []
"#,
        );
        assert!(matches!(result, Err(LoadError::EmptyExclusion { .. })));
    }

    #[test]
    fn load_rejects_invalid_namespace() {
        let result = load_rules_from_toml(
            r#"
[[marker-arity]]
name = "streamer-arity"
marker = "m"
min_args = 1
max_args = 3

[[exclude-namespace]]
namespaces = ["crate::::logging"]
"#,
        );
        assert!(matches!(result, Err(LoadError::Validation { .. })));
    }
}
