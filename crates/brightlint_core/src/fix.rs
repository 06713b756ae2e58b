//! Multi-pass fix loop.
//!
//! Fixes from one pass can enable or change fixes in the next (a brace moved
//! onto its own line changes which spacing applies around it), so fixing
//! re-lints the output until nothing changes. Content hashes of every pass
//! are kept to stop on fixes that undo each other.

use blake3::Hash;

/// Default number of passes before giving up.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixResult {
    /// A pass produced no change.
    Converged { iterations: usize },
    /// The pass limit was hit while fixes were still being produced.
    MaxIterationsReached { iterations: usize },
    /// A pass reproduced the content of an earlier one.
    CycleDetected { cycle_length: usize },
}

impl FixResult {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

pub struct FixCoordinator {
    max_iterations: usize,
}

impl FixCoordinator {
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// Repeatedly replaces `content` with the output of `apply_fix`.
    ///
    /// `apply_fix` returns `None` when it has nothing more to change.
    pub fn apply_fixes_iterative<F>(&self, content: &mut String, mut apply_fix: F) -> FixResult
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut history: Vec<Hash> = vec![hash_content(content)];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            let Some(fixed) = apply_fix(content) else {
                return FixResult::Converged { iterations };
            };

            *content = fixed;
            let current = hash_content(content);
            if let Some(previous) = history.iter().position(|hash| *hash == current) {
                return FixResult::CycleDetected {
                    cycle_length: history.len() - previous,
                };
            }
            history.push(current);
        }

        FixResult::MaxIterationsReached { iterations }
    }
}

impl Default for FixCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_content(content: &str) -> Hash {
    blake3::hash(content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cycle_detection() {
        let coordinator = FixCoordinator::new();
        let mut content = "a".to_string();
        let mut call_count = 0;

        let result = coordinator.apply_fixes_iterative(&mut content, |_| {
            call_count += 1;
            if call_count % 2 == 1 {
                Some("b".to_string())
            } else {
                Some("a".to_string())
            }
        });

        assert_eq!(result, FixResult::CycleDetected { cycle_length: 2 });
    }

    #[test]
    fn test_convergence() {
        let coordinator = FixCoordinator::new();
        let mut content = "a=1".to_string();

        let result = coordinator.apply_fixes_iterative(&mut content, |current| {
            (current.len() < 5).then(|| format!("{current} "))
        });

        assert_eq!(result, FixResult::Converged { iterations: 3 });
        assert!(result.is_converged());
        assert_eq!(content, "a=1  ");
    }

    #[test]
    fn test_max_iterations() {
        let coordinator = FixCoordinator::with_max_iterations(3);
        let mut content = String::new();

        let result = coordinator.apply_fixes_iterative(&mut content, |current| Some(format!("{current}x")));

        assert_eq!(result, FixResult::MaxIterationsReached { iterations: 3 });
        assert_eq!(content, "xxx");
    }
}
