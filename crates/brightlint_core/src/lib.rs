//! # brightlint_core
//!
//! Core linter engine for brightlint.
//!
//! This crate provides:
//! - The `Rule` contract, the rule registry and the built-in rules
//! - Selector policy tables for configurable rules
//! - Single-pass rule dispatch over a syntax tree
//! - Fix application and the lint/fix re-check loop
//! - Configuration loading and file discovery
//! - The `Linter` orchestrator with parallel file processing
//!
//! ## Example
//!
//! ```rust,ignore
//! use brightlint_core::{Linter, LinterConfig};
//!
//! let config = LinterConfig::from_file(".brightlint.json")?;
//! let linter = Linter::new(config)?;
//!
//! let (results, failures) = linter.lint_patterns(&["src".to_string()])?;
//! for result in results {
//!     println!("{}: {} issues", result.path.display(), result.diagnostics.len());
//! }
//! ```

mod config;
mod diagnostic;
mod error;
pub mod file_finder;
mod file_linter;
mod fix;
mod fixer;
mod linter;
pub mod policy;
mod registry;
mod result;
pub mod rule;
pub mod rules;
mod runner;

pub use config::{CONFIG_FILES, DEFAULT_EXTENSIONS, LinterConfig, RuleSetting};
pub use diagnostic::{Diagnostic, Fix, Severity};
pub use error::LinterError;
pub use file_finder::FileFinder;
pub use file_linter::{FixOutcome, MAX_FILE_SIZE, RuleTimings};
pub use fix::{DEFAULT_MAX_ITERATIONS, FixCoordinator, FixResult};
pub use fixer::{FixerResult, apply_fixes_to_content};
pub use linter::{LintFilesResult, Linter};
pub use policy::{Directive, PolicyTable, pair_directives};
pub use registry::{RuleFactory, RuleRegistry};
pub use result::{LintResult, LintSummary};
pub use rule::{Rule, RuleContext, RuleMeta};
pub use runner::{ConfiguredRule, RuleRunner};
