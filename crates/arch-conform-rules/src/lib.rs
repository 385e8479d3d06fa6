//! # arch-conform-rules
//!
//! Built-in conformance rules for arch-conform:
//!
//! - [`MarkerArityRule`] — marked declarations must take an allowed number
//!   of arguments
//! - [`NamespaceExclusion`] — a decorator that skips declarations under
//!   excluded namespace prefixes
//!
//! plus [`load_rules_from_toml`], which builds rule instances from the
//! `[[marker-arity]]` and `[[exclude-namespace]]` sections of an
//! `arch-conform.toml`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod loader;
pub mod marker_arity;
pub mod namespace_exclusion;

pub use loader::{load_rules_from_toml, LoadError};
pub use marker_arity::MarkerArityRule;
pub use namespace_exclusion::NamespaceExclusion;
