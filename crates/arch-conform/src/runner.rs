//! Runner for `cargo test` integration.
//!
//! Wires configuration, declarative rules, the source model, and the
//! evaluator together, and panics with a formatted report when the
//! codebase does not conform.

use arch_conform_core::{
    Config, Evaluator, ModelProvider, RuleBox, Severity, SourceModel,
};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["arch-conform.toml", ".arch-conform.toml"];

static INIT_TRACING: Once = Once::new();

/// Runs conformance checks as part of `cargo test`.
///
/// Reads `arch-conform.toml` from the project root (or `config_path` when
/// given), builds the configured rules, snapshots the source model, and
/// evaluates. `fail_on` overrides the config's severity threshold.
///
/// # Panics
///
/// Panics if violations at or above the `fail_on` severity are found, or
/// if the configuration, model, or a rule faults.
pub fn run_check(config_path: Option<&str>, fail_on: Option<&str>) {
    init_tracing();

    let root = find_project_root();
    let content = read_config_content(&root, config_path);
    let config = parse_config(&content);

    let effective_fail_on = resolve_fail_on(fail_on, &config);
    let rules = load_rules(&content);

    let model = SourceModel::from_config(&root, &config.model).unwrap_or_else(|e| {
        panic!("arch-conform: failed to build source model: {e}");
    });
    let declarations = model.snapshot().unwrap_or_else(|e| {
        panic!("arch-conform: failed to snapshot source model: {e}");
    });

    let evaluator = Evaluator::builder()
        .config(config)
        .rule_boxes(rules)
        .build();

    let report = evaluator.evaluate(&declarations).unwrap_or_else(|fault| {
        panic!("arch-conform: evaluation faulted: {fault}");
    });

    if report.has_violations_at(effective_fail_on) {
        let text = report.format_test_report(effective_fail_on);
        panic!("{text}");
    }
}

/// Initializes the tracing subscriber once, honoring `RUST_LOG`.
fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .try_init();
    });
}

/// Reads the raw TOML content from the config file.
///
/// Returns an empty string if no config file is found.
fn read_config_content(root: &Path, explicit_path: Option<&str>) -> String {
    if let Some(path) = explicit_path {
        let full_path = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            root.join(path)
        };
        return std::fs::read_to_string(&full_path).unwrap_or_else(|e| {
            panic!(
                "arch-conform: failed to read config from {}: {e}",
                full_path.display()
            );
        });
    }

    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.exists() {
            return std::fs::read_to_string(&path).unwrap_or_else(|e| {
                panic!(
                    "arch-conform: failed to read config from {}: {e}",
                    path.display()
                );
            });
        }
    }

    String::new()
}

/// Parses a `Config` from TOML content.
fn parse_config(content: &str) -> Config {
    if content.is_empty() {
        return Config::default();
    }
    Config::parse(content).unwrap_or_else(|e| {
        panic!("arch-conform: failed to parse config: {e}");
    })
}

/// Loads declarative rules from TOML content.
fn load_rules(content: &str) -> Vec<RuleBox> {
    if content.is_empty() {
        return vec![];
    }
    arch_conform_rules::load_rules_from_toml(content)
        .unwrap_or_else(|e| panic!("arch-conform: rule config error: {e}"))
}

/// Checks whether a `Cargo.toml` file defines a `[workspace]` section
/// by parsing as TOML, avoiding false positives from comments or strings.
fn has_workspace_section(cargo_toml: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cargo_toml) else {
        return false;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        return false;
    };
    table.contains_key("workspace")
}

/// Finds the project root by looking for `Cargo.toml` from `CARGO_MANIFEST_DIR`.
fn find_project_root() -> PathBuf {
    // CARGO_MANIFEST_DIR points to the crate containing the test,
    // which may be a workspace member. Walk up to find workspace root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let manifest_path = PathBuf::from(&manifest_dir);

        let mut candidate = manifest_path.as_path();
        loop {
            let cargo_toml = candidate.join("Cargo.toml");
            if cargo_toml.exists() && has_workspace_section(&cargo_toml) {
                return candidate.to_path_buf();
            }
            match candidate.parent() {
                Some(parent) => candidate = parent,
                None => break,
            }
        }

        // No workspace root found — use manifest dir itself
        return manifest_path;
    }

    // Fallback: current directory
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolves the effective `fail_on` severity from arg > config > default.
fn resolve_fail_on(arg: Option<&str>, config: &Config) -> Severity {
    let name = arg.or(config.fail_on.as_deref()).unwrap_or("error");

    match name {
        "error" => Severity::Error,
        "warning" => Severity::Warning,
        "info" => Severity::Info,
        other => {
            panic!("arch-conform: unknown severity `{other}`. Valid values: error, warning, info")
        }
    }
}
