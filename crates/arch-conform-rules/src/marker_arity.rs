//! Marker arity rule: marked declarations must take an allowed number of
//! arguments.

use arch_conform_core::{Declaration, MarkerName, Rule, RuleFault, Severity, Violation};

/// Rule code for marker-arity.
pub const CODE: &str = "AC001";

/// Rule name for marker-arity.
pub const NAME: &str = "marker-arity";

/// Checks that every declaration carrying a marker takes a number of
/// arguments within an inclusive `[min_args, max_args]` range.
///
/// Declarations without the marker trivially pass. Applying this rule to a
/// marked declaration that is not callable is a model/configuration
/// mismatch and faults rather than violates.
///
/// Bounds are per-instance data, not constants:
///
/// ```
/// use arch_conform_rules::MarkerArityRule;
///
/// let rule = MarkerArityRule::new("location-streamer-arity", "location_info_streamer", 1, 3)
///     .expect("valid marker");
/// ```
pub struct MarkerArityRule {
    rule_name: String,
    marker: MarkerName,
    min_args: usize,
    max_args: usize,
    severity: Severity,
    doc_ref: Option<String>,
}

impl MarkerArityRule {
    /// Creates a new marker arity rule with inclusive bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker name is empty.
    pub fn new(
        rule_name: impl Into<String>,
        marker: &str,
        min_args: usize,
        max_args: usize,
    ) -> Result<Self, arch_conform_core::ModelError> {
        Ok(Self {
            rule_name: rule_name.into(),
            marker: MarkerName::new(marker)?,
            min_args,
            max_args,
            severity: Severity::Error,
            doc_ref: None,
        })
    }

    /// Sets the severity for violations from this instance.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches a design document reference to violations from this instance.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Returns the configured instance name.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    /// Returns the marker this rule selects on.
    #[must_use]
    pub fn marker(&self) -> &MarkerName {
        &self.marker
    }
}

impl Rule for MarkerArityRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Marked declarations must take an allowed number of arguments"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn evaluate(&self, declaration: &Declaration) -> Result<Option<Violation>, RuleFault> {
        if !declaration.has_marker(self.marker.as_str()) {
            return Ok(None);
        }

        let Some(count) = declaration.parameter_count() else {
            return Err(RuleFault::InapplicableTarget {
                rule: self.rule_name.clone(),
                declaration: declaration.name().to_string(),
                reason: format!(
                    "declaration carries marker `{}` but is not callable",
                    self.marker
                ),
            });
        };

        if count >= self.min_args && count <= self.max_args {
            return Ok(None);
        }

        let mut violation = Violation::new(
            CODE,
            &self.rule_name,
            self.severity,
            declaration.name(),
            format!(
                "marked `{}` but takes {} argument(s): {} not in [{},{}]",
                self.marker, count, count, self.min_args, self.max_args
            ),
        );
        if let Some(location) = declaration.location() {
            violation = violation.with_location(location.clone());
        }
        if let Some(doc_ref) = &self.doc_ref {
            violation = violation.with_doc_ref(doc_ref.clone());
        }
        Ok(Some(violation))
    }
}
