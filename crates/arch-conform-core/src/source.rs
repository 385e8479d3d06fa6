//! Source model provider: materializes declarations from Rust sources.
//!
//! [`SourceModel`] discovers `*.rs` files under a root, parses them with
//! `syn`, and produces an immutable [`Declaration`] snapshot: free functions
//! and impl methods as callable declarations, structs and enums as
//! non-callable ones. Markers are the attribute paths on the item; the
//! namespace is the file's module path extended by inline `mod` nesting.

use crate::config::ModelConfig;
use crate::model::{Declaration, NamespacePath};
use crate::types::SourceLocation;

use std::path::{Path, PathBuf};
use syn::visit::Visit;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Supplies an enumerable snapshot of all declarations in a codebase.
///
/// The evaluator consumes the returned sequence read-only; how a provider
/// parses source or loads declarations is its own concern.
pub trait ModelProvider {
    /// Materializes the declaration snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be produced.
    fn snapshot(&self) -> Result<Vec<Declaration>, ProviderError>;
}

/// Errors that can occur while materializing a model snapshot.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a Rust source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A file path produced an invalid namespace.
    #[error("Invalid namespace: {0}")]
    Model(#[from] crate::model::ModelError),
}

/// Builder for configuring a [`SourceModel`].
#[derive(Default)]
pub struct SourceModelBuilder {
    root: Option<PathBuf>,
    exclude_patterns: Option<Vec<String>>,
    fail_on_parse_error: bool,
}

impl SourceModelBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to snapshot.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns
            .get_or_insert_with(Vec::new)
            .push(pattern.into());
        self
    }

    /// Sets the exclude glob patterns. An empty set opts out of the
    /// default `**/target/**` and `**/vendor/**` excludes.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the source model.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved.
    pub fn build(self) -> Result<SourceModel, ProviderError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        // Defaults apply only when no excludes were configured at all; an
        // explicit empty set opts out.
        let exclude_patterns = self.exclude_patterns.unwrap_or_else(|| {
            vec!["**/target/**".to_string(), "**/vendor/**".to_string()]
        });

        Ok(SourceModel {
            root,
            exclude_patterns,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// A [`ModelProvider`] backed by Rust source files on disk.
///
/// Use [`SourceModel::builder()`] to construct an instance.
pub struct SourceModel {
    root: PathBuf,
    exclude_patterns: Vec<String>,
    fail_on_parse_error: bool,
}

impl SourceModel {
    /// Creates a new builder for configuring a source model.
    #[must_use]
    pub fn builder() -> SourceModelBuilder {
        SourceModelBuilder::new()
    }

    /// Creates a source model from a [`ModelConfig`], resolving the
    /// configured root against `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved.
    pub fn from_config(base: &Path, config: &ModelConfig) -> Result<Self, ProviderError> {
        Self::builder()
            .root(base.join(&config.root))
            .excludes(config.exclude.clone())
            .build()
    }

    /// Returns the root directory being snapshotted.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discovers all Rust source files under the root.
    fn discover_files(&self) -> Result<Vec<PathBuf>, ProviderError> {
        let pattern = format!("{}/**/*.rs", self.root.display());
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| ProviderError::Io(e.into_error()))?;

            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Also check as substring for patterns like "**/target/**"
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }

    /// Extracts the declarations from a single file.
    fn extract_file(&self, path: &Path) -> Result<Vec<Declaration>, ProviderError> {
        debug!("Extracting: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let ast = syn::parse_file(&content).map_err(|e| ProviderError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let relative_path = path
            .strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let namespace = NamespacePath::new(compute_module_path(&relative_path))?;

        let mut collector = DeclarationCollector {
            file: &relative_path,
            content: &content,
            namespace,
            impl_type: None,
            declarations: Vec::new(),
        };
        collector.visit_file(&ast);

        Ok(collector.declarations)
    }
}

impl ModelProvider for SourceModel {
    fn snapshot(&self) -> Result<Vec<Declaration>, ProviderError> {
        info!("Snapshotting source model at {:?}", self.root);

        let files = self.discover_files()?;
        let mut declarations = Vec::new();

        for path in &files {
            match self.extract_file(path) {
                Ok(found) => declarations.extend(found),
                Err(ProviderError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(ProviderError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Snapshot complete: {} declaration(s) in {} file(s)",
            declarations.len(),
            files.len()
        );

        Ok(declarations)
    }
}

/// Computes the module path from a relative file path.
///
/// `location/canada.rs` becomes `["crate", "location", "canada"]`; a
/// leading `src` component and trailing `mod`/`lib`/`main` stems are
/// dropped so the namespace reads like a Rust module path.
fn compute_module_path(relative_path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = relative_path
        .with_extension("")
        .components()
        .filter_map(|c| {
            if let std::path::Component::Normal(s) = c {
                s.to_str().map(String::from)
            } else {
                None
            }
        })
        .collect();

    if parts.first().is_some_and(|p| p == "src") {
        parts.remove(0);
    }

    if let Some(last) = parts.last() {
        if last == "mod" || last == "lib" || last == "main" {
            parts.pop();
        }
    }

    parts.insert(0, "crate".to_string());
    parts
}

/// Calculates the byte offset for a 1-indexed line and column.
fn offset_for(content: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line_content) in content.lines().enumerate() {
        if i + 1 == line {
            return offset + column.saturating_sub(1);
        }
        offset += line_content.len() + 1; // +1 for newline
    }

    offset
}

/// Renders an attribute path as a `::` joined marker string.
fn marker_name(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// Collects markers from item attributes. Doc comments surface as
/// `#[doc = "..."]` attributes and are not markers.
fn collect_markers(attrs: &[syn::Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| !attr.path().is_ident("doc"))
        .map(|attr| marker_name(attr.path()))
        .collect()
}

/// Counts the parameters of a signature, excluding any `self` receiver.
fn count_parameters(sig: &syn::Signature) -> usize {
    sig.inputs
        .iter()
        .filter(|input| matches!(input, syn::FnArg::Typed(_)))
        .count()
}

struct DeclarationCollector<'a> {
    file: &'a Path,
    content: &'a str,
    namespace: NamespacePath,
    impl_type: Option<String>,
    declarations: Vec<Declaration>,
}

impl DeclarationCollector<'_> {
    fn location(&self, ident: &syn::Ident) -> SourceLocation {
        let span = ident.span();
        let start = span.start();
        let offset = offset_for(self.content, start.line, start.column + 1);
        SourceLocation::from_span(self.file.to_path_buf(), span)
            .with_span(offset, ident.to_string().len())
    }

    fn record(
        &mut self,
        local_name: String,
        attrs: &[syn::Attribute],
        parameter_count: Option<usize>,
        ident: &syn::Ident,
    ) {
        let name = format!("{}::{}", self.namespace, local_name);
        let mut declaration = Declaration::new(name, self.namespace.clone())
            .with_location(self.location(ident));
        for marker in collect_markers(attrs) {
            declaration = declaration.with_marker(marker);
        }
        if let Some(count) = parameter_count {
            declaration = declaration.with_parameter_count(count);
        }
        self.declarations.push(declaration);
    }
}

impl<'ast> Visit<'ast> for DeclarationCollector<'_> {
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        self.record(
            node.sig.ident.to_string(),
            &node.attrs,
            Some(count_parameters(&node.sig)),
            &node.sig.ident,
        );
        syn::visit::visit_item_fn(self, node);
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        let parent = self.namespace.clone();
        self.namespace = parent.child(node.ident.to_string());
        syn::visit::visit_item_mod(self, node);
        self.namespace = parent;
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let previous = self.impl_type.take();
        if let syn::Type::Path(type_path) = &*node.self_ty {
            self.impl_type = type_path
                .path
                .segments
                .last()
                .map(|seg| seg.ident.to_string());
        }
        syn::visit::visit_item_impl(self, node);
        self.impl_type = previous;
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        let local_name = match &self.impl_type {
            Some(ty) => format!("{ty}::{}", node.sig.ident),
            None => node.sig.ident.to_string(),
        };
        self.record(
            local_name,
            &node.attrs,
            Some(count_parameters(&node.sig)),
            &node.sig.ident,
        );
        syn::visit::visit_impl_item_fn(self, node);
    }

    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.record(node.ident.to_string(), &node.attrs, None, &node.ident);
        syn::visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        self.record(node.ident.to_string(), &node.attrs, None, &node.ident);
        syn::visit::visit_item_enum(self, node);
    }
}
