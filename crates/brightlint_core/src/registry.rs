//! Name to constructor table for the built-in rules.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::LinterError;
use crate::rule::{Rule, RuleMeta};
use crate::rules::{
    CurlyBraceManage, DefaultExportsAlias, ExportsAlias, NoUndefinedReturn,
    PreferSimpleNullChecks, SpacingManage, curly_brace_manage, default_exports_alias,
    exports_alias, no_undefined_return, prefer_simple_null_checks, spacing_manage,
};

/// Builds a rule from its configured option list.
pub type RuleFactory = fn(&[Value]) -> Box<dyn Rule>;

struct RegisteredRule {
    meta: &'static RuleMeta,
    create: RuleFactory,
}

/// Maps rule names to their metadata and constructors.
#[derive(Default)]
pub struct RuleRegistry {
    rules: BTreeMap<&'static str, RegisteredRule>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in rule.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(&curly_brace_manage::META, |options| {
            Box::new(CurlyBraceManage::from_options(options))
        });
        registry.register(&default_exports_alias::META, |options| {
            Box::new(DefaultExportsAlias::from_options(options))
        });
        registry.register(&exports_alias::META, |options| {
            Box::new(ExportsAlias::from_options(options))
        });
        registry.register(&no_undefined_return::META, |_| Box::new(NoUndefinedReturn));
        registry.register(&prefer_simple_null_checks::META, |options| {
            Box::new(PreferSimpleNullChecks::from_options(options))
        });
        registry.register(&spacing_manage::META, |options| {
            Box::new(SpacingManage::from_options(options))
        });
        registry
    }

    /// Registers a rule, replacing any rule of the same name.
    pub fn register(&mut self, meta: &'static RuleMeta, create: RuleFactory) {
        if self
            .rules
            .insert(meta.name, RegisteredRule { meta, create })
            .is_some()
        {
            debug!("Replaced rule '{}'", meta.name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Instantiates the rule `name` with `options`.
    pub fn create(&self, name: &str, options: &[Value]) -> Result<Box<dyn Rule>, LinterError> {
        let registered = self
            .rules
            .get(name)
            .ok_or_else(|| LinterError::config(format!("Unknown rule '{}'", name)))?;
        Ok((registered.create)(options))
    }

    /// Metadata of every registered rule, ordered by name.
    pub fn metas(&self) -> impl Iterator<Item = &'static RuleMeta> + '_ {
        self.rules.values().map(|registered| registered.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brightlint_ast::{NodeId, NodeKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::rule::RuleContext;

    #[test]
    fn test_builtin_names_are_sorted() {
        let registry = RuleRegistry::builtin();
        let names: Vec<_> = registry.metas().map(|meta| meta.name).collect();

        assert_eq!(
            names,
            vec![
                "curly-brace-manage",
                "default-exports-alias",
                "exports-alias",
                "no-undefined-return",
                "prefer-simple-null-checks",
                "spacing-manage",
            ]
        );
    }

    #[test]
    fn test_create_passes_options() {
        let registry = RuleRegistry::builtin();
        let rule = registry
            .create("spacing-manage", &[json!("catch"), json!({"after": true})])
            .unwrap();

        assert_eq!(rule.meta().name, "spacing-manage");
        assert_eq!(rule.node_kinds(), vec![NodeKind::CatchClause]);
    }

    #[test]
    fn test_create_unknown_rule() {
        let registry = RuleRegistry::builtin();
        let err = registry.create("no-such-rule", &[]).err().unwrap();

        assert!(matches!(err, LinterError::Config(_)));
        assert!(err.to_string().contains("no-such-rule"));
    }

    static CUSTOM: RuleMeta = RuleMeta {
        name: "custom",
        description: "Never reports",
        fixable: false,
    };

    struct Silent;

    impl Rule for Silent {
        fn meta(&self) -> &'static RuleMeta {
            &CUSTOM
        }

        fn node_kinds(&self) -> Vec<NodeKind> {
            Vec::new()
        }

        fn check(&self, _node: NodeId, _ctx: &mut RuleContext<'_, '_>) {}
    }

    #[test]
    fn test_register_custom_rule() {
        let mut registry = RuleRegistry::new();
        assert!(!registry.contains("custom"));

        registry.register(&CUSTOM, |_| Box::new(Silent));

        assert!(registry.contains("custom"));
        assert_eq!(registry.create("custom", &[]).unwrap().meta().name, "custom");
    }
}
