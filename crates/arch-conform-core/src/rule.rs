//! Rule trait for defining conformance rules.

use crate::model::Declaration;
use crate::types::{Severity, Violation};

/// An unexpected failure while evaluating a rule.
///
/// Faults signal a rule/model misconfiguration, not a codebase defect.
/// They are propagated to the caller unmodified and abort the run;
/// violations, by contrast, are collected and returned.
#[derive(Debug, thiserror::Error)]
pub enum RuleFault {
    /// A rule was applied to a declaration shape it cannot evaluate.
    #[error("rule `{rule}` cannot evaluate `{declaration}`: {reason}")]
    InapplicableTarget {
        /// Configured name of the rule that faulted.
        rule: String,
        /// Fully-qualified name of the declaration.
        declaration: String,
        /// Why the rule does not apply to this declaration.
        reason: String,
    },
}

/// A conformance rule evaluated against individual declarations.
///
/// Implementations must be pure: no side effects, no mutable state across
/// declarations, so concurrent evaluation runs need no synchronization.
///
/// # Example
///
/// ```ignore
/// use arch_conform_core::{Declaration, Rule, RuleFault, Severity, Violation};
///
/// pub struct NoMarkers;
///
/// impl Rule for NoMarkers {
///     fn name(&self) -> &'static str { "no-markers" }
///     fn code(&self) -> &'static str { "AC900" }
///
///     fn evaluate(&self, declaration: &Declaration) -> Result<Option<Violation>, RuleFault> {
///         if declaration.markers().is_empty() {
///             Ok(None)
///         } else {
///             Ok(Some(Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 declaration.name(),
///                 "declarations must not carry markers",
///             )))
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule kind (e.g., "marker-arity").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "AC001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Evaluates a single declaration.
    ///
    /// Returns `Ok(None)` when the declaration passes or the rule does not
    /// apply, `Ok(Some(violation))` when the declaration fails the rule's
    /// structural check.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleFault`] when the rule cannot evaluate the
    /// declaration at all — a configuration error, not a violation.
    fn evaluate(&self, declaration: &Declaration) -> Result<Option<Violation>, RuleFault>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NamespacePath;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn evaluate(&self, declaration: &Declaration) -> Result<Option<Violation>, RuleFault> {
            Ok(Some(Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                declaration.name(),
                "test violation",
            )))
        }
    }

    #[test]
    fn rule_trait_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Error);
    }

    #[test]
    fn rule_evaluate_produces_violation() {
        let rule = TestRule;
        let declaration = Declaration::new(
            "crate::demo::thing",
            NamespacePath::parse("crate::demo").unwrap(),
        );
        let violation = rule.evaluate(&declaration).unwrap().unwrap();
        assert_eq!(violation.declaration, "crate::demo::thing");
    }
}
