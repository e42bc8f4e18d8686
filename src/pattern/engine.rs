//! Matching engines for compiled patterns.

use crate::pattern::{Pattern, Step};
use crate::{SpanRef, Token};

/// Scans a token sequence for a compiled pattern.
///
/// Implementations may return overlapping spans; callers reduce them with
/// [`filter_spans`].
pub trait MatchEngine {
    fn find(&self, pattern: &Pattern, tokens: &[Token]) -> Vec<SpanRef>;
}

/// Backtracking engine returning the longest match at every start position.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceEngine;

impl MatchEngine for SequenceEngine {
    fn find(&self, pattern: &Pattern, tokens: &[Token]) -> Vec<SpanRef> {
        (0..tokens.len())
            .filter_map(|start| {
                longest_match(pattern.steps(), tokens, start)
                    .filter(|end| *end > start)
                    .map(|end| SpanRef::new(start, end))
            })
            .collect()
    }
}

/// End of the longest match of `steps` starting at `pos`.
fn longest_match(steps: &[Step], tokens: &[Token], pos: usize) -> Option<usize> {
    let (step, rest) = match steps.split_first() {
        Some(split) => split,
        None => return Some(pos),
    };
    let (min, max) = step.quantifier.bounds();

    let mut available = 0;
    while pos + available < tokens.len()
        && max.map_or(true, |max| available < max)
        && step.test.matches(&tokens[pos + available])
    {
        available += 1;
    }
    if available < min {
        return None;
    }

    (min..=available)
        .rev()
        .filter_map(|taken| longest_match(rest, tokens, pos + taken))
        .max()
}

/// Reduce spans to a non-overlapping set.
///
/// Longer spans win; among equal lengths the earlier one wins. The result is
/// ordered by start.
pub fn filter_spans(mut spans: Vec<SpanRef>) -> Vec<SpanRef> {
    spans.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.start.cmp(&b.start)));

    let mut kept: Vec<SpanRef> = Vec::with_capacity(spans.len());
    for span in spans {
        if !kept.iter().any(|k| k.overlaps(&span)) {
            kept.push(span);
        }
    }
    kept.sort();
    kept
}
