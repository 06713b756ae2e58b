//! Rules command implementation

use brightlint_core::RuleRegistry;
use miette::Result;

use super::load_config;
use crate::cli::Cli;

/// Prints every built-in rule with its configured severity.
pub fn run_rules(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let registry = RuleRegistry::builtin();

    for meta in registry.metas() {
        let severity = match config.rules.get(meta.name).map(|setting| setting.severity()) {
            Some(Ok(Some(severity))) => severity.as_str(),
            Some(Err(_)) => "invalid",
            _ => "off",
        };
        let fixable = if meta.fixable { "fixable" } else { "" };

        println!(
            "{:<28} {:<8} {:<8} {}",
            meta.name, severity, fixable, meta.description
        );
    }

    Ok(())
}
