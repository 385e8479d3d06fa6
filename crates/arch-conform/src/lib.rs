//! # arch-conform
//!
//! Rule-based architecture conformance checks over a structural model of a
//! codebase.
//!
//! This is the main facade crate that re-exports the core framework and
//! built-in rules.
//!
//! ## Quick Start — `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! arch-conform = "0.1"
//! ```
//!
//! ```rust,ignore
//! // tests/architecture.rs
//! #[test]
//! fn architecture_conforms() {
//!     arch_conform::run_check(None, None);
//! }
//! ```
//!
//! Configure via `arch-conform.toml` at the project root:
//!
//! ```toml
//! [[marker-arity]]
//! name = "location-streamer-arity"
//! marker = "location_info_streamer"
//! min_args = 1
//! max_args = 3
//!
//! [[exclude-namespace]]
//! namespaces = ["crate::logging"]
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use arch_conform::{Evaluator, ModelProvider, SourceModel};
//! use arch_conform::rules::MarkerArityRule;
//!
//! let model = SourceModel::builder().root("./src").build()?;
//! let declarations = model.snapshot()?;
//!
//! let rule = MarkerArityRule::new("streamer-arity", "location_info_streamer", 1, 3)?;
//! let report = Evaluator::builder().rule(rule).build().evaluate(&declarations)?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use arch_conform_core::*;

/// Built-in rules and the declarative rule loader.
pub mod rules {
    pub use arch_conform_rules::*;
}

mod runner;

pub use runner::run_check;
