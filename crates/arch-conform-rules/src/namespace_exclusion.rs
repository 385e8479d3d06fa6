//! Namespace exclusion: a decorator that skips declarations under
//! configured namespace prefixes.

use arch_conform_core::{Declaration, NamespacePath, Rule, RuleBox, RuleFault, Severity, Violation};

/// Wraps any rule so that declarations under excluded namespace prefixes
/// are never evaluated by it.
///
/// Exclusion short-circuits: for an excluded declaration the inner rule's
/// `evaluate` is not invoked at all, so no inner side effect or fault can
/// escape on excluded paths. Non-excluded declarations get the inner
/// result unmodified.
///
/// Prefix matching is segment-wise; excluding `crate::logging` does not
/// exclude `crate::loggingutils`. Wrapping a rule more than once unions
/// the exclusions.
pub struct NamespaceExclusion {
    inner: RuleBox,
    prefixes: Vec<NamespacePath>,
}

impl NamespaceExclusion {
    /// Wraps `inner` with no exclusions yet; add them with [`exclude`].
    ///
    /// [`exclude`]: NamespaceExclusion::exclude
    #[must_use]
    pub fn new(inner: RuleBox) -> Self {
        Self {
            inner,
            prefixes: Vec::new(),
        }
    }

    /// Wraps `inner` with the given excluded prefixes.
    #[must_use]
    pub fn wrap(inner: RuleBox, prefixes: Vec<NamespacePath>) -> Self {
        Self { inner, prefixes }
    }

    /// Adds an excluded namespace prefix.
    #[must_use]
    pub fn exclude(mut self, prefix: NamespacePath) -> Self {
        self.prefixes.push(prefix);
        self
    }

    /// Returns the configured excluded prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[NamespacePath] {
        &self.prefixes
    }

    fn is_excluded(&self, namespace: &NamespacePath) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| namespace.starts_with(prefix))
    }
}

impl Rule for NamespaceExclusion {
    // Identity delegates to the wrapped rule; exclusion is transparent
    // in reports.
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn code(&self) -> &'static str {
        self.inner.code()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }

    fn default_severity(&self) -> Severity {
        self.inner.default_severity()
    }

    fn evaluate(&self, declaration: &Declaration) -> Result<Option<Violation>, RuleFault> {
        if self.is_excluded(declaration.namespace()) {
            return Ok(None);
        }
        self.inner.evaluate(declaration)
    }
}
