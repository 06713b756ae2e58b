//! Applying diagnostic fixes to source text.

use tracing::{debug, warn};

use crate::{Diagnostic, Fix};

/// Result of applying one batch of fixes.
#[derive(Debug)]
pub struct FixerResult {
    /// Number of fixes applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    pub fn new(fixes_applied: usize, fixed_content: String, modified: bool) -> Self {
        Self {
            fixes_applied,
            fixed_content,
            modified,
        }
    }

    /// A result with no changes made.
    pub fn unchanged(content: String) -> Self {
        Self {
            fixes_applied: 0,
            fixed_content: content,
            modified: false,
        }
    }
}

/// Applies the fixes carried by `diagnostics` to `content`.
///
/// Fixes are applied from the end of the file to the beginning so earlier
/// offsets stay valid. A fix that overlaps one already accepted is skipped
/// and left for the next pass.
pub fn apply_fixes_to_content(content: &str, diagnostics: &[Diagnostic]) -> FixerResult {
    let mut fixes: Vec<&Fix> = diagnostics.iter().filter_map(|d| d.fix.as_ref()).collect();

    if fixes.is_empty() {
        return FixerResult::unchanged(content.to_string());
    }

    fixes.sort_by(|a, b| b.span.start.cmp(&a.span.start).then(b.span.end.cmp(&a.span.end)));
    let fixes = filter_overlapping_fixes(fixes);

    let mut result = content.to_string();
    let mut applied = 0;

    for fix in &fixes {
        let start = fix.span.start as usize;
        let end = fix.span.end as usize;

        if start > end
            || end > result.len()
            || !result.is_char_boundary(start)
            || !result.is_char_boundary(end)
        {
            warn!(start, end, content_len = result.len(), "Invalid fix span");
            continue;
        }

        debug!("Applying fix: replace [{}..{}] with {:?}", start, end, fix.text);

        result.replace_range(start..end, &fix.text);
        applied += 1;
    }

    let modified = result != content;
    FixerResult::new(applied, result, modified)
}

/// Drops fixes that overlap an already accepted one.
///
/// Expects `fixes` sorted by start offset, descending. Two insertions at the
/// same offset count as overlapping.
pub(crate) fn filter_overlapping_fixes(fixes: Vec<&Fix>) -> Vec<&Fix> {
    if fixes.len() <= 1 {
        return fixes;
    }

    #[cfg(debug_assertions)]
    {
        for window in fixes.windows(2) {
            debug_assert!(
                window[0].span.start >= window[1].span.start,
                "Fixes must be sorted by start descending for filter_overlapping_fixes"
            );
        }
    }

    let mut result: Vec<&Fix> = Vec::with_capacity(fixes.len());

    for fix in fixes {
        // `result` stays sorted descending, so only its last entry can overlap.
        let overlaps = result.last().is_some_and(|last| {
            let same_insertion =
                fix.span.is_empty() && last.span.is_empty() && fix.span.start == last.span.start;
            same_insertion || !(fix.span.end <= last.span.start || fix.span.start >= last.span.end)
        });

        if overlaps {
            warn!(
                "Skipping overlapping fix at [{}, {}]",
                fix.span.start, fix.span.end
            );
        } else {
            result.push(fix);
        }
    }

    result
}
