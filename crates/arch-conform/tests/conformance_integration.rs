//! Integration test: declarative rules end-to-end via the source model
//! and evaluator.
//!
//! Uses fixture files under `tests/fixtures/conference/` to verify the
//! full TOML → rules → snapshot → evaluation pipeline: marked
//! declarations with bad arity are reported, the excluded `crate::logging`
//! namespace is skipped entirely (including a marked non-callable that
//! would otherwise fault), and `crate::loggingutils` is not accidentally
//! excluded by the prefix.

use arch_conform::{
    Config, ConformanceReport, Evaluator, ModelProvider, Severity, SourceModel, Violation,
};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/conference")
}

fn run_fixture() -> ConformanceReport {
    let root = fixture_root();
    let content = std::fs::read_to_string(root.join("arch-conform.toml"))
        .expect("fixture TOML should exist");

    let config = Config::parse(&content).expect("fixture config should parse");
    let rules =
        arch_conform::rules::load_rules_from_toml(&content).expect("fixture rules should load");

    let model =
        SourceModel::from_config(&root, &config.model).expect("source model should build");
    let declarations = model.snapshot().expect("snapshot should succeed");

    Evaluator::builder()
        .config(config)
        .rule_boxes(rules)
        .build()
        .evaluate(&declarations)
        .expect("evaluation should not fault: the excluded namespace holds a marked non-callable")
}

fn find<'a>(report: &'a ConformanceReport, suffix: &str) -> &'a Violation {
    report
        .violations
        .iter()
        .find(|v| v.declaration.ends_with(suffix))
        .unwrap_or_else(|| panic!("missing violation for `{suffix}`: {:#?}", report.violations))
}

#[test]
fn detects_exactly_the_arity_violations() {
    let report = run_fixture();

    assert_eq!(
        report.violations.len(),
        3,
        "expected 3 violations, got {}: {:#?}",
        report.violations.len(),
        report
            .violations
            .iter()
            .map(|v| v.declaration.as_str())
            .collect::<Vec<_>>()
    );

    assert!(report.violations.iter().all(|v| v.code == "AC001"));
    assert!(report
        .violations
        .iter()
        .all(|v| v.rule == "location-streamer-arity"));
    assert!(report.has_errors());
}

#[test]
fn zero_argument_violation_details() {
    let report = run_fixture();
    let violation = find(&report, "Canada::send_location_ping");

    assert_eq!(violation.severity, Severity::Error);
    assert!(violation.message.contains("0 not in [1,3]"));
    assert_eq!(violation.doc_ref.as_deref(), Some("CONVENTIONS.md L12"));

    let location = violation.location.as_ref().expect("should carry a location");
    assert!(location.file.to_string_lossy().contains("location/canada.rs"));
    assert!(location.line > 1);
}

#[test]
fn four_argument_violation_details() {
    let report = run_fixture();
    let violation = find(&report, "Canada::send_location_agreement");
    assert!(violation.message.contains("4 not in [1,3]"));
}

#[test]
fn valid_arities_pass() {
    let report = run_fixture();
    for passing in [
        "send_location_information",
        "send_location_history",
        "send_location_contract",
        "unmarked_helper",
    ] {
        assert!(
            !report
                .violations
                .iter()
                .any(|v| v.declaration.ends_with(passing)),
            "`{passing}` should not violate"
        );
    }
}

#[test]
fn excluded_namespace_is_skipped_wholesale() {
    let report = run_fixture();
    assert!(
        !report
            .violations
            .iter()
            .any(|v| v.declaration.starts_with("crate::logging::")),
        "declarations under crate::logging must never be evaluated"
    );
}

#[test]
fn lookalike_namespace_is_not_excluded() {
    let report = run_fixture();
    let violation = find(&report, "loggingutils::audit::audit_ping");
    assert!(violation.message.contains("0 not in [1,3]"));
}

#[test]
fn report_is_identical_across_runs() {
    let first = run_fixture();
    let second = run_fixture();

    let ids = |r: &ConformanceReport| {
        r.violations
            .iter()
            .map(|v| v.declaration.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.declarations_checked, second.declarations_checked);
}

#[test]
fn test_report_formats_all_violations() {
    let report = run_fixture();
    let text = report.format_test_report(Severity::Error);

    assert!(text.contains("3 violation(s)"));
    assert!(text.contains("location-streamer-arity [AC001]"));
    assert!(text.contains("= see: CONVENTIONS.md L12"));
    assert!(text.contains("3 error(s)"));
}
