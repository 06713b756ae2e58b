//! Selector to effect tables built from rule option lists.
//!
//! Options arrive either as a flat list that alternates selectors and
//! effects (`"IfStatement", {"start": "new-line-required"}, ...`) or as
//! explicit `{"selector": ..., "effect": ...}` records. Both forms are paired
//! into [`Directive`]s first, then collected into a [`PolicyTable`] where the
//! last directive for a selector wins.

use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// A selector paired with its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<E> {
    pub selector: String,
    pub effect: E,
}

impl<E> Directive<E> {
    pub fn new(selector: impl Into<String>, effect: E) -> Self {
        Self {
            selector: selector.into(),
            effect,
        }
    }
}

/// Immutable selector lookup built once per configuration.
#[derive(Debug, Clone)]
pub struct PolicyTable<E> {
    entries: HashMap<String, E>,
}

impl<E> PolicyTable<E> {
    /// Returns the effect configured for `selector`.
    pub fn lookup(&self, selector: &str) -> Option<&E> {
        self.entries.get(selector)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &E)> {
        self.entries.iter().map(|(selector, effect)| (selector.as_str(), effect))
    }
}

impl<E> Default for PolicyTable<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E> FromIterator<Directive<E>> for PolicyTable<E> {
    fn from_iter<I: IntoIterator<Item = Directive<E>>>(iter: I) -> Self {
        let mut entries = HashMap::new();
        for directive in iter {
            entries.insert(directive.selector, directive.effect);
        }
        Self { entries }
    }
}

#[derive(Deserialize)]
struct DirectiveRecord {
    selector: String,
    effect: Value,
}

/// Pairs a rule's option list into directives, in input order.
///
/// A selector that is not followed by an effect object is dropped, as is
/// any effect that fails to deserialize. Both cases are logged.
pub fn pair_directives<E: DeserializeOwned>(rule: &str, options: &[Value]) -> Vec<Directive<E>> {
    let mut directives = Vec::new();
    let mut index = 0;

    while index < options.len() {
        match &options[index] {
            Value::String(selector) => match options.get(index + 1) {
                Some(effect @ Value::Object(_)) => {
                    if let Some(effect) = parse_effect(rule, selector, effect) {
                        directives.push(Directive::new(selector.clone(), effect));
                    }
                    index += 2;
                }
                _ => {
                    warn!(rule, selector = %selector, "Selector has no effect, skipping");
                    index += 1;
                }
            },
            Value::Object(map) if map.contains_key("selector") => {
                match serde_json::from_value::<DirectiveRecord>(options[index].clone()) {
                    Ok(record) => {
                        if let Some(effect) = parse_effect(rule, &record.selector, &record.effect) {
                            directives.push(Directive::new(record.selector, effect));
                        }
                    }
                    Err(e) => warn!(rule, "Malformed directive record: {}", e),
                }
                index += 1;
            }
            other => {
                warn!(rule, entry = %other, "Effect without a selector, skipping");
                index += 1;
            }
        }
    }

    directives
}

fn parse_effect<E: DeserializeOwned>(rule: &str, selector: &str, effect: &Value) -> Option<E> {
    match serde_json::from_value(effect.clone()) {
        Ok(effect) => Some(effect),
        Err(e) => {
            warn!(rule, selector, "Ignoring malformed effect: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
    struct Effect {
        before: Option<bool>,
        after: Option<bool>,
    }

    fn options(value: Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_pairs_flat_list() {
        let opts = options(json!(["=", {"before": true}, "&&", {"after": false}]));
        let directives: Vec<Directive<Effect>> = pair_directives("spacing-manage", &opts);

        assert_eq!(
            directives,
            vec![
                Directive::new("=", Effect { before: Some(true), after: None }),
                Directive::new("&&", Effect { before: None, after: Some(false) }),
            ]
        );
    }

    #[test]
    fn test_last_occurrence_wins() {
        let opts = options(json!(["=", {"before": true}, "=", {"before": false}]));
        let table: PolicyTable<Effect> = pair_directives("spacing-manage", &opts)
            .into_iter()
            .collect();

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("=").and_then(|e| e.before), Some(false));
    }

    #[test]
    fn test_dangling_selector_is_skipped() {
        let opts = options(json!(["=", {"before": true}, "&&"]));
        let table: PolicyTable<Effect> = pair_directives("spacing-manage", &opts)
            .into_iter()
            .collect();

        assert_eq!(table.len(), 1);
        assert!(table.lookup("&&").is_none());
    }

    #[test]
    fn test_selector_followed_by_selector() {
        let opts = options(json!(["if", "else", {"after": true}]));
        let directives: Vec<Directive<Effect>> = pair_directives("spacing-manage", &opts);

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].selector, "else");
    }

    #[test]
    fn test_record_form() {
        let opts = options(json!([
            {"selector": "IfStatement", "effect": {"after": true}},
            "=", {"before": true}
        ]));
        let directives: Vec<Directive<Effect>> = pair_directives("spacing-manage", &opts);

        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].selector, "IfStatement");
        assert_eq!(directives[1].selector, "=");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let opts = options(json!(["=", {"before": true, "around": 3}]));
        let directives: Vec<Directive<Effect>> = pair_directives("spacing-manage", &opts);

        assert_eq!(directives[0].effect.before, Some(true));
    }

    #[test]
    fn test_malformed_effect_is_skipped() {
        let opts = options(json!(["=", {"before": "yes"}, "&&", {"before": true}]));
        let directives: Vec<Directive<Effect>> = pair_directives("spacing-manage", &opts);

        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].selector, "&&");
    }

    #[test]
    fn test_stray_effect_is_skipped() {
        let opts = options(json!([{"before": true}, 42, "=", {"after": true}]));
        let directives: Vec<Directive<Effect>> = pair_directives("spacing-manage", &opts);

        assert_eq!(directives.len(), 1);
    }

    #[test]
    fn test_empty_options() {
        let table: PolicyTable<Effect> = pair_directives("spacing-manage", &[])
            .into_iter()
            .collect();
        assert!(table.is_empty());
    }
}
