//! Built-in rules.

pub mod adjacency;
pub mod curly_brace_manage;
pub mod default_exports_alias;
pub mod exports_alias;
pub mod no_undefined_return;
pub mod prefer_simple_null_checks;
pub mod spacing_manage;

#[cfg(test)]
pub(crate) mod test_support;

pub use curly_brace_manage::{BraceEffect, CurlyBraceManage, Placement};
pub use default_exports_alias::DefaultExportsAlias;
pub use exports_alias::ExportsAlias;
pub use no_undefined_return::NoUndefinedReturn;
pub use prefer_simple_null_checks::{NullCheckOptions, PreferSimpleNullChecks};
pub use spacing_manage::{SpacingEffect, SpacingManage};

use serde_json::Value;
use tracing::warn;

/// Alias used for `exports` when none is configured.
pub const DEFAULT_EXPORTS_ALIAS: &str = "E";

/// Reads the alias name from the first option.
pub(crate) fn alias_option(rule: &str, options: &[Value]) -> String {
    match options.first() {
        None => DEFAULT_EXPORTS_ALIAS.to_string(),
        Some(Value::String(alias)) if !alias.is_empty() => alias.clone(),
        Some(other) => {
            warn!(rule, value = %other, "Expected an alias name, using the default");
            DEFAULT_EXPORTS_ALIAS.to_string()
        }
    }
}
