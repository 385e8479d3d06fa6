//! Evaluator for orchestrating rule execution over a model snapshot.

use crate::config::Config;
use crate::model::Declaration;
use crate::rule::{Rule, RuleBox, RuleFault};
use crate::types::ConformanceReport;

use tracing::{debug, info};

/// Builder for configuring an [`Evaluator`].
#[derive(Default)]
pub struct EvaluatorBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
}

impl EvaluatorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the evaluator.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the evaluator.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds multiple boxed rules to the evaluator.
    #[must_use]
    pub fn rule_boxes<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the evaluator.
    #[must_use]
    pub fn build(self) -> Evaluator {
        Evaluator {
            rules: self.rules,
            config: self.config.unwrap_or_default(),
        }
    }
}

/// Runs a configured list of rules against a model snapshot.
///
/// Each evaluation run is a pure function of its (rules, declarations)
/// inputs: no state is held across declarations, and running twice over the
/// same inputs yields identical reports.
pub struct Evaluator {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Evaluator {
    /// Creates a new builder for configuring an evaluator.
    #[must_use]
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluates every (rule, declaration) pair and collects violations.
    ///
    /// Output order is deterministic: rule-major, then declaration order,
    /// exactly matching the input sequences. Violations never stop
    /// evaluation; a [`RuleFault`] aborts the run immediately.
    ///
    /// Empty rules or declarations yield an empty report, not an error.
    ///
    /// # Errors
    ///
    /// Surfaces the first [`RuleFault`] raised by any rule, unmodified.
    pub fn evaluate(&self, declarations: &[Declaration]) -> Result<ConformanceReport, RuleFault> {
        info!(
            "Evaluating {} rule(s) over {} declaration(s)",
            self.rules.len(),
            declarations.len()
        );

        let mut report = ConformanceReport::new();
        report.declarations_checked = declarations.len();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let severity_override = self.config.rule_severity(rule.name());

            for declaration in declarations {
                if let Some(mut violation) = rule.evaluate(declaration)? {
                    if let Some(severity) = severity_override {
                        violation.severity = severity;
                    }
                    debug!(
                        "Violation: {} on `{}`",
                        violation.rule, violation.declaration
                    );
                    report.violations.push(violation);
                }
            }
        }

        info!(
            "Evaluation complete: {} violation(s) in {} declaration(s)",
            report.violations.len(),
            report.declarations_checked
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NamespacePath;
    use crate::types::{Severity, Violation};

    /// Flags every declaration whose name contains the given needle.
    struct NeedleRule {
        code: &'static str,
        needle: &'static str,
    }

    impl Rule for NeedleRule {
        fn name(&self) -> &'static str {
            "needle"
        }
        fn code(&self) -> &'static str {
            self.code
        }
        fn evaluate(&self, declaration: &Declaration) -> Result<Option<Violation>, RuleFault> {
            if declaration.name().contains(self.needle) {
                Ok(Some(Violation::new(
                    self.code,
                    self.name(),
                    Severity::Error,
                    declaration.name(),
                    format!("name contains `{}`", self.needle),
                )))
            } else {
                Ok(None)
            }
        }
    }

    /// Faults on every declaration it sees.
    struct FaultingRule;

    impl Rule for FaultingRule {
        fn name(&self) -> &'static str {
            "faulting"
        }
        fn code(&self) -> &'static str {
            "TEST999"
        }
        fn evaluate(&self, declaration: &Declaration) -> Result<Option<Violation>, RuleFault> {
            Err(RuleFault::InapplicableTarget {
                rule: self.name().to_string(),
                declaration: declaration.name().to_string(),
                reason: "always faults".to_string(),
            })
        }
    }

    fn decl(name: &str) -> Declaration {
        Declaration::new(name, NamespacePath::parse("crate::demo").unwrap())
    }

    #[test]
    fn empty_inputs_yield_empty_report() {
        let evaluator = Evaluator::builder()
            .rule(NeedleRule {
                code: "T1",
                needle: "x",
            })
            .build();
        let report = evaluator.evaluate(&[]).unwrap();
        assert!(report.violations.is_empty());
        assert_eq!(report.declarations_checked, 0);

        let no_rules = Evaluator::builder().build();
        let report = no_rules.evaluate(&[decl("crate::demo::x")]).unwrap();
        assert!(report.violations.is_empty());
        assert_eq!(report.declarations_checked, 1);
    }

    #[test]
    fn output_order_is_rule_major_then_declaration_order() {
        let evaluator = Evaluator::builder()
            .rule(NeedleRule {
                code: "T1",
                needle: "a",
            })
            .rule(NeedleRule {
                code: "T2",
                needle: "b",
            })
            .build();

        // Both declarations match both rules
        let declarations = vec![decl("crate::demo::ab_first"), decl("crate::demo::ba_second")];
        let report = evaluator.evaluate(&declarations).unwrap();

        let order: Vec<(&str, &str)> = report
            .violations
            .iter()
            .map(|v| (v.code.as_str(), v.declaration.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("T1", "crate::demo::ab_first"),
                ("T1", "crate::demo::ba_second"),
                ("T2", "crate::demo::ab_first"),
                ("T2", "crate::demo::ba_second"),
            ]
        );
    }

    #[test]
    fn violation_does_not_stop_evaluation() {
        let evaluator = Evaluator::builder()
            .rule(NeedleRule {
                code: "T1",
                needle: "send",
            })
            .build();
        let declarations = vec![
            decl("crate::demo::send_one"),
            decl("crate::demo::keep"),
            decl("crate::demo::send_two"),
        ];
        let report = evaluator.evaluate(&declarations).unwrap();
        assert_eq!(report.violations.len(), 2);
    }

    #[test]
    fn fault_aborts_the_run() {
        let evaluator = Evaluator::builder().rule(FaultingRule).build();
        let result = evaluator.evaluate(&[decl("crate::demo::x")]);
        assert!(matches!(
            result,
            Err(RuleFault::InapplicableTarget { .. })
        ));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let declarations = vec![decl("crate::demo::send_one"), decl("crate::demo::keep")];
        let evaluator = Evaluator::builder()
            .rule(NeedleRule {
                code: "T1",
                needle: "send",
            })
            .build();

        let first = evaluator.evaluate(&declarations).unwrap();
        let second = evaluator.evaluate(&declarations).unwrap();
        let ids = |r: &ConformanceReport| {
            r.violations
                .iter()
                .map(|v| v.declaration.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let config = Config::parse(
            r#"
[rules.needle]
enabled = false
"#,
        )
        .unwrap();
        let evaluator = Evaluator::builder()
            .rule(NeedleRule {
                code: "T1",
                needle: "send",
            })
            .config(config)
            .build();
        let report = evaluator.evaluate(&[decl("crate::demo::send_one")]).unwrap();
        assert!(report.violations.is_empty());
    }

    #[test]
    fn severity_override_is_applied() {
        let config = Config::parse(
            r#"
[rules.needle]
severity = "warning"
"#,
        )
        .unwrap();
        let evaluator = Evaluator::builder()
            .rule(NeedleRule {
                code: "T1",
                needle: "send",
            })
            .config(config)
            .build();
        let report = evaluator.evaluate(&[decl("crate::demo::send_one")]).unwrap();
        assert_eq!(report.violations[0].severity, Severity::Warning);
    }
}
