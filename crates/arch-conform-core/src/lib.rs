//! # arch-conform-core
//!
//! Core framework for architecture conformance checking over a structural
//! model of a codebase.
//!
//! This crate provides the foundational traits and types for building
//! conformance checkers. It includes:
//!
//! - [`Declaration`] and [`NamespacePath`] — the structural model
//! - [`Rule`] trait for declaration-level conformance rules
//! - [`Evaluator`] for running rules over a model snapshot
//! - [`SourceModel`] — a [`ModelProvider`] backed by Rust sources
//! - [`Violation`] and [`ConformanceReport`] for findings
//!
//! ## Example
//!
//! ```ignore
//! use arch_conform_core::{Evaluator, ModelProvider, SourceModel};
//!
//! let model = SourceModel::builder().root("./src").build()?;
//! let declarations = model.snapshot()?;
//!
//! let evaluator = Evaluator::builder().rule(MyRule::new()).build();
//! let report = evaluator.evaluate(&declarations)?;
//! report.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod evaluator;
mod model;
mod rule;
mod source;
mod types;

pub use config::{Config, ConfigError, ModelConfig, RuleConfig};
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use model::{Declaration, MarkerName, ModelError, NamespacePath};
pub use rule::{Rule, RuleBox, RuleFault};
pub use source::{ModelProvider, ProviderError, SourceModel, SourceModelBuilder};
pub use types::{ConformanceReport, Severity, SourceLocation, Violation, ViolationDiagnostic};
