//! Single-pass rule dispatch over a syntax tree.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use brightlint_ast::visitor::{VisitResult, Visitor, walk_tree};
use brightlint_ast::{NodeId, NodeKind, SyntaxTree};

use crate::rule::{Rule, RuleContext};
use crate::{Diagnostic, Severity};

/// A rule instance together with its configured severity.
pub struct ConfiguredRule {
    pub rule: Box<dyn Rule>,
    pub severity: Severity,
}

impl ConfiguredRule {
    pub fn new(rule: Box<dyn Rule>, severity: Severity) -> Self {
        Self { rule, severity }
    }

    pub fn name(&self) -> &'static str {
        self.rule.meta().name
    }
}

/// Runs a fixed set of rules over trees.
///
/// The node-kind dispatch table is built once; each run walks the tree once
/// and calls only the rules listening to the visited node's kind.
pub struct RuleRunner {
    rules: Vec<ConfiguredRule>,
    dispatch: HashMap<NodeKind, Vec<usize>>,
}

impl RuleRunner {
    pub fn new(rules: Vec<ConfiguredRule>) -> Self {
        let mut dispatch: HashMap<NodeKind, Vec<usize>> = HashMap::new();
        for (index, configured) in rules.iter().enumerate() {
            let mut kinds = configured.rule.node_kinds();
            kinds.sort();
            kinds.dedup();
            for kind in kinds {
                dispatch.entry(kind).or_default().push(index);
            }
        }
        Self { rules, dispatch }
    }

    pub fn rules(&self) -> &[ConfiguredRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule over `tree` and returns the raw diagnostics.
    pub fn run(&self, tree: &SyntaxTree<'_>) -> Vec<Diagnostic> {
        let mut pass = Pass {
            runner: self,
            diagnostics: Vec::new(),
            timings: None,
        };
        let _ = walk_tree(&mut pass, tree);
        pass.diagnostics
    }

    /// Like [`RuleRunner::run`], also measuring time spent in each rule.
    pub fn run_timed(&self, tree: &SyntaxTree<'_>) -> (Vec<Diagnostic>, HashMap<String, Duration>) {
        let mut pass = Pass {
            runner: self,
            diagnostics: Vec::new(),
            timings: Some(HashMap::new()),
        };
        let _ = walk_tree(&mut pass, tree);
        let timings = pass
            .timings
            .unwrap_or_default()
            .into_iter()
            .map(|(name, elapsed)| (name.to_string(), elapsed))
            .collect();
        (pass.diagnostics, timings)
    }
}

struct Pass<'r> {
    runner: &'r RuleRunner,
    diagnostics: Vec<Diagnostic>,
    timings: Option<HashMap<&'static str, Duration>>,
}

impl<'a> Visitor<'a> for Pass<'_> {
    fn enter_node(&mut self, tree: &SyntaxTree<'a>, id: NodeId) -> VisitResult {
        let runner = self.runner;
        let Some(indices) = runner.dispatch.get(&tree.kind(id)) else {
            return ControlFlow::Continue(());
        };

        for &index in indices {
            let configured = &runner.rules[index];
            let name = configured.name();
            let started = self.timings.as_ref().map(|_| Instant::now());

            let mut ctx = RuleContext::new(tree, name, configured.severity, &mut self.diagnostics);
            configured.rule.check(id, &mut ctx);

            if let (Some(timings), Some(started)) = (self.timings.as_mut(), started) {
                *timings.entry(name).or_default() += started.elapsed();
            }
        }

        ControlFlow::Continue(())
    }
}
