//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::{LinterError, Severity};

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration file names, in lookup order.
pub const CONFIG_FILES: &[&str] = &[".brightlint.jsonc", ".brightlint.json"];

/// Extensions linted when no `extensions` are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx"];

/// Configuration for the linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Rule name to severity and options.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,

    /// File patterns to include.
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Extensions picked up when walking directories.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether to record per-rule timings.
    #[serde(default)]
    pub timings: bool,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

/// Configuration for a single rule: `"error"` or `["error", ...options]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    Severity(String),
    WithOptions(Vec<Value>),
}

impl RuleSetting {
    fn severity_name(&self) -> Option<&str> {
        match self {
            RuleSetting::Severity(severity) => Some(severity),
            RuleSetting::WithOptions(items) => items.first().and_then(Value::as_str),
        }
    }

    /// The configured severity, `None` when the rule is off.
    pub fn severity(&self) -> Result<Option<Severity>, LinterError> {
        let name = self.severity_name().unwrap_or_default();
        Severity::from_config(name)
            .ok_or_else(|| LinterError::config(format!("Unknown severity '{}'", name)))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.severity(), Ok(Some(_)))
    }

    /// Options following the severity.
    pub fn options(&self) -> &[Value] {
        match self {
            RuleSetting::Severity(_) => &[],
            RuleSetting::WithOptions(items) => items.get(1..).unwrap_or_default(),
        }
    }
}

impl From<Value> for RuleSetting {
    fn from(value: Value) -> Self {
        match value {
            Value::String(severity) => RuleSetting::Severity(severity),
            Value::Array(items) => RuleSetting::WithOptions(items),
            other => RuleSetting::WithOptions(vec![other]),
        }
    }
}

/// Operators written without surrounding whitespace in the preset.
const TIGHT_OPERATORS: &[&str] = &[
    ">", ">=", "<", "<=", "==", "===", "!=", "!==", "!", "+", "-", "--", "++", "~",
];

/// Operators written with whitespace on both sides in the preset.
const SPACED_OPERATORS: &[&str] = &[
    "?", ":", "&&", "||", "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "|=",
    "^=", "&=",
];

fn recommended_spacing() -> RuleSetting {
    let mut items = vec![
        json!("error"),
        json!("catch"),
        json!({"after": false}),
        json!("function"),
        json!({"after": false}),
        json!("try"),
        json!({"after": true}),
    ];
    for operator in TIGHT_OPERATORS {
        items.push(json!(operator));
        items.push(json!({"before": false, "after": false}));
    }
    for operator in SPACED_OPERATORS {
        items.push(json!(operator));
        items.push(json!({"before": true, "after": true}));
    }
    RuleSetting::WithOptions(items)
}

impl LinterConfig {
    /// Creates a configuration with no rules enabled.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            extensions: default_extensions(),
            timings: false,
            base_dir: None,
        }
    }

    /// The preset written by `brightlint init`.
    pub fn recommended() -> Self {
        let mut config = Self::new();
        let rules = [
            (
                "curly-brace-manage",
                json!([
                    "error",
                    "IfStatement", {"start": "new"},
                    "ForStatement", {"start": "new"},
                    "ForInStatement", {"start": "new"},
                    "ForOfStatement", {"start": "new"},
                    "WhileStatement", {"start": "new"},
                    "TryStatement", {"start": "same"},
                    "CatchClause", {"start": "same"},
                    "FinalStatement", {"start": "same"},
                    "FunctionDeclaration", {"start": "new_for_long_declaration"},
                    "ArrowFunctionExpression", {"start": "same"},
                    "ObjectExpression", {"start": "same"}
                ]),
            ),
            ("default-exports-alias", json!(["error", "E"])),
            ("exports-alias", json!(["error", "E"])),
            ("no-undefined-return", json!("error")),
            (
                "prefer-simple-null-checks",
                json!(["error", {"zeroEq": true, "strictZeroEq": true}]),
            ),
        ];

        for (name, setting) in rules {
            config.rules.insert(name.to_string(), setting.into());
        }
        config
            .rules
            .insert("spacing-manage".to_string(), recommended_spacing());
        config
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.brightlint.jsonc` and `.brightlint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from JSON (comments and trailing commas allowed)
    /// with schema validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema_json)
                    .map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(|e| LinterError::internal(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Finds the nearest configuration file in `start` or its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Enabled rules with their severity and options, by name.
    pub fn enabled_rules(&self) -> Result<Vec<(&str, Severity, &[Value])>, LinterError> {
        let mut enabled = Vec::new();
        for (name, setting) in &self.rules {
            if let Some(severity) = setting.severity()? {
                enabled.push((name.as_str(), severity, setting.options()));
            }
        }
        Ok(enabled)
    }

    /// Serializes the configuration for writing to disk.
    pub fn to_json_pretty(&self) -> Result<String, LinterError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LinterError::internal(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_config_new() {
        let config = LinterConfig::new();
        assert!(config.rules.is_empty());
        assert_eq!(config.extensions, vec!["js", "mjs", "cjs", "jsx"]);
        assert!(!config.timings);
    }

    #[test]
    fn test_config_from_jsonc() {
        let json = r#"{
            // layout rules
            "rules": {
                "no-undefined-return": "warn",
                "spacing-manage": ["error", "=", {"before": true}],
                "exports-alias": "off",
            },
            "exclude": ["**/vendor/**"]
        }"#;

        let config = LinterConfig::from_json(json).unwrap();
        let enabled = config.enabled_rules().unwrap();

        assert_eq!(enabled.len(), 2);
        assert_eq!(enabled[0].0, "no-undefined-return");
        assert_eq!(enabled[0].1, Severity::Warning);
        assert_eq!(enabled[1].0, "spacing-manage");
        assert_eq!(enabled[1].2, &[json!("="), json!({"before": true})]);
        assert_eq!(config.exclude, vec!["**/vendor/**"]);
    }

    #[test]
    fn test_empty_document() {
        let config = LinterConfig::from_json("").unwrap();
        assert_eq!(config, LinterConfig::new());
    }

    #[rstest]
    #[case(RuleSetting::Severity("off".into()), None)]
    #[case(RuleSetting::Severity("info".into()), Some(Severity::Info))]
    #[case(RuleSetting::WithOptions(vec![json!("warning"), json!("E")]), Some(Severity::Warning))]
    #[case(RuleSetting::WithOptions(vec![json!("error")]), Some(Severity::Error))]
    fn test_rule_setting_severity(#[case] setting: RuleSetting, #[case] expected: Option<Severity>) {
        assert_eq!(setting.severity().unwrap(), expected);
        assert_eq!(setting.is_enabled(), expected.is_some());
    }

    #[test]
    fn test_rule_setting_options() {
        let setting = RuleSetting::WithOptions(vec![json!("error"), json!("F")]);
        assert_eq!(setting.options(), &[json!("F")]);
        assert!(RuleSetting::Severity("error".into()).options().is_empty());
    }

    #[test]
    fn test_unknown_severity_in_code() {
        let setting = RuleSetting::Severity("loud".into());
        assert!(setting.severity().is_err());
        assert!(!setting.is_enabled());
    }

    #[rstest]
    #[case::unknown_property(r#"{ "ruless": {} }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "timings": "yes" }"#, "Config validation failed")]
    #[case::invalid_severity(r#"{ "rules": { "rule-id": "loud" } }"#, "Config validation failed")]
    #[case::missing_severity(r#"{ "rules": { "rule-id": [] } }"#, "Config validation failed")]
    #[case::options_without_severity(r#"{ "rules": { "rule-id": [{"a": 1}] } }"#, "Config validation failed")]
    #[case::syntax(r#"{ "rules": "#, "Invalid JSON")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let result = LinterConfig::from_json(json);
        assert!(result.is_err(), "Expected error for JSON: {}", json);
        let err = result.unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "Error message '{}' should contain '{}'",
            err,
            expected_error_part
        );
    }

    #[test]
    fn test_recommended_round_trips_through_validation() {
        let recommended = LinterConfig::recommended();
        let json = recommended.to_json_pretty().unwrap();
        let parsed = LinterConfig::from_json(&json).unwrap();

        assert_eq!(parsed, recommended);
        assert_eq!(parsed.enabled_rules().unwrap().len(), 6);
    }

    #[test]
    fn test_discover_walks_up() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("src").join("lib");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join(".brightlint.json"), "{}").unwrap();

        let found = LinterConfig::discover(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join(".brightlint.json"));
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join(".brightlint.json"), "{}").unwrap();
        fs::write(temp_dir.path().join(".brightlint.jsonc"), "{}").unwrap();

        let found = LinterConfig::discover(temp_dir.path()).unwrap();
        assert!(found.ends_with(".brightlint.jsonc"));
    }

    #[test]
    fn test_from_file_sets_base_dir() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".brightlint.jsonc");
        fs::write(&path, r#"{ "timings": true }"#).unwrap();

        let config = LinterConfig::from_file(&path).unwrap();
        assert!(config.timings);
        assert_eq!(config.base_dir.as_deref(), Some(temp_dir.path()));
    }
}
