//! Core linter engine.

use std::fs;
use std::path::{Path, PathBuf};

use brightlint_parser::JavaScriptParser;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::file_finder::FileFinder;
use crate::file_linter::{FixOutcome, fix_source, lint_source, read_source};
use crate::registry::RuleRegistry;
use crate::runner::{ConfiguredRule, RuleRunner};
use crate::{LintResult, LinterConfig, LinterError};

/// Result type for lint_files and lint_patterns methods.
///
/// Contains a tuple of:
/// - Successful lint results
/// - Failed files with their errors (path and error)
pub type LintFilesResult = Result<(Vec<LintResult>, Vec<(PathBuf, LinterError)>), LinterError>;

/// The core linter engine.
///
/// Orchestrates file discovery, parsing, rule execution, and fixing. Rules
/// are built once from the configuration and shared by every file.
pub struct Linter {
    /// Linter configuration.
    config: LinterConfig,
    /// Enabled rules and their dispatch table.
    runner: RuleRunner,
    parser: JavaScriptParser,
    finder: FileFinder,
}

impl Linter {
    /// Creates a new linter with the built-in rules.
    pub fn new(config: LinterConfig) -> Result<Self, LinterError> {
        Self::with_registry(config, &RuleRegistry::builtin())
    }

    /// Creates a new linter resolving rule names through `registry`.
    pub fn with_registry(
        config: LinterConfig,
        registry: &RuleRegistry,
    ) -> Result<Self, LinterError> {
        let mut rules = Vec::new();
        for (name, severity, options) in config.enabled_rules()? {
            let rule = registry.create(name, options)?;
            debug!("Enabled rule '{}' as {}", name, severity.as_str());
            rules.push(ConfiguredRule::new(rule, severity));
        }

        if rules.is_empty() {
            warn!("No rules enabled");
        }

        let finder = FileFinder::new(&config.include, &config.exclude, &config.extensions)?;

        Ok(Self {
            config,
            runner: RuleRunner::new(rules),
            parser: JavaScriptParser::new(),
            finder,
        })
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn runner(&self) -> &RuleRunner {
        &self.runner
    }

    /// Discovers files matching the given patterns, relative to the
    /// working directory.
    pub fn discover_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>, LinterError> {
        self.finder.discover_files(patterns, Path::new("."))
    }

    /// Lints files matching the given patterns.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_patterns(&self, patterns: &[String]) -> LintFilesResult {
        let files = self.discover_files(patterns)?;
        self.lint_files(&files)
    }

    /// Lints a list of files in parallel using rayon.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_files(&self, paths: &[PathBuf]) -> LintFilesResult {
        let results: Vec<Result<LintResult, (PathBuf, LinterError)>> = paths
            .par_iter()
            .map(|path| self.lint_file(path).map_err(|e| (path.clone(), e)))
            .collect();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(lint_result) => successes.push(lint_result),
                Err((path, error)) => {
                    warn!("Failed to lint {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }

        info!(
            "Linted {} files ({} failed)",
            successes.len(),
            failures.len()
        );
        Ok((successes, failures))
    }

    /// Lints a single file.
    pub fn lint_file(&self, path: &Path) -> Result<LintResult, LinterError> {
        debug!("Linting {}", path.display());
        let content = read_source(path)?;
        self.lint_content(&content, path)
    }

    /// Lints content held in memory, reporting it under `path`.
    pub fn lint_content(&self, content: &str, path: &Path) -> Result<LintResult, LinterError> {
        let (diagnostics, timings) =
            lint_source(&self.parser, &self.runner, content, self.config.timings)?;

        let result = LintResult::new(path.to_path_buf(), diagnostics);
        Ok(match timings {
            Some(timings) => result.with_timings(timings),
            None => result,
        })
    }

    /// Fixes content held in memory until no rule has anything left to fix.
    pub fn fix_content(&self, content: &str) -> Result<FixOutcome, LinterError> {
        fix_source(&self.parser, &self.runner, content)
    }

    /// Fixes a file in place. With `dry_run` the file is left untouched.
    pub fn fix_file(&self, path: &Path, dry_run: bool) -> Result<FixOutcome, LinterError> {
        let content = read_source(path)?;
        let outcome = self.fix_content(&content)?;

        if !outcome.status.is_converged() {
            warn!("Fixes for {} did not converge: {:?}", path.display(), outcome.status);
        }

        if outcome.is_modified() && !dry_run {
            fs::write(path, &outcome.content).map_err(|e| {
                LinterError::file(format!("Failed to write {}: {}", path.display(), e))
            })?;
            info!("Applied {} fixes to {}", outcome.fixes_applied, path.display());
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleSetting;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn config_with(rules: &[(&str, serde_json::Value)]) -> LinterConfig {
        let mut config = LinterConfig::new();
        for (name, setting) in rules {
            config
                .rules
                .insert(name.to_string(), RuleSetting::from(setting.clone()));
        }
        config
    }

    #[test]
    fn test_new_rejects_unknown_rule() {
        let config = config_with(&[("no-such-rule", json!("error"))]);
        let err = Linter::new(config).err().unwrap();

        assert!(err.to_string().contains("Unknown rule 'no-such-rule'"));
    }

    #[test]
    fn test_disabled_rules_are_not_built() {
        let config = config_with(&[
            ("no-undefined-return", json!("off")),
            ("no-such-rule", json!("off")),
        ]);
        let linter = Linter::new(config).unwrap();

        assert!(linter.runner().is_empty());
    }

    #[test]
    fn test_lint_content_applies_severity() {
        let config = config_with(&[("no-undefined-return", json!("warn"))]);
        let linter = Linter::new(config).unwrap();

        let result = linter
            .lint_content("function f() { return undefined; }", Path::new("a.js"))
            .unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].severity, crate::Severity::Warning);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_lint_files_separates_failures() {
        let temp_dir = tempdir().unwrap();
        let good = temp_dir.path().join("good.js");
        let broken = temp_dir.path().join("broken.js");
        fs::write(&good, "function f() { return undefined; }").unwrap();
        fs::write(&broken, "function (").unwrap();

        let config = config_with(&[("no-undefined-return", json!("error"))]);
        let linter = Linter::new(config).unwrap();

        let (results, failures) = linter.lint_files(&[good.clone(), broken.clone()]).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, good);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, broken);
    }

    #[test]
    fn test_fix_file_dry_run_leaves_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("a.js");
        let source = "function f() { return undefined; }";
        fs::write(&path, source).unwrap();

        let config = config_with(&[("no-undefined-return", json!("error"))]);
        let linter = Linter::new(config).unwrap();

        let outcome = linter.fix_file(&path, true).unwrap();
        assert_eq!(outcome.content, "function f() { return; }");
        assert_eq!(fs::read_to_string(&path).unwrap(), source);

        linter.fix_file(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "function f() { return; }");
    }
}
