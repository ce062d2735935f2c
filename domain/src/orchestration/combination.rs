//! Pure combination and selection rules
//!
//! The backend-calling strategies (synthesis, critique-then-improve) live in
//! the application layer; everything here is a pure function over
//! contributions.

use crate::core::model::ModelDescriptor;
use crate::core::string::char_prefix;
use crate::orchestration::value_objects::{Contribution, successful_texts};
use std::collections::HashMap;

/// Number of leading characters compared by [`vote`].
pub const VOTE_PREFIX_CHARS: usize = 100;

/// Separator used by [`merge`].
pub const MERGE_SEPARATOR: &str = "\n\n";

/// Concatenate successful contribution texts, separated by a blank line.
pub fn merge(contributions: &[Contribution]) -> String {
    successful_texts(contributions).join(MERGE_SEPARATOR)
}

/// Approximate majority vote over the first [`VOTE_PREFIX_CHARS`] characters.
///
/// Answers that differ anywhere within the prefix are counted separately;
/// near-duplicates are not grouped. Ties go to the prefix seen first.
/// Returns the full text of the first contribution in the winning group.
pub fn vote(contributions: &[Contribution]) -> Option<String> {
    let texts = successful_texts(contributions);

    // prefix -> (count, index of first occurrence)
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();
    for (i, text) in texts.iter().enumerate() {
        let entry = tally
            .entry(char_prefix(text, VOTE_PREFIX_CHARS))
            .or_insert((0, i));
        entry.0 += 1;
    }

    let (_, first) = tally
        .values()
        .copied()
        .max_by(|(count_a, first_a), (count_b, first_b)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })?;

    texts.get(first).map(|t| t.to_string())
}

/// Index of the successful contribution maximising `confidence × weight`.
///
/// `models` must be the descriptors the contributions were produced from, in
/// the same order. Ties resolve to the earliest index.
pub fn select_weighted(contributions: &[Contribution], models: &[&ModelDescriptor]) -> Option<usize> {
    debug_assert_eq!(contributions.len(), models.len());
    let mut best: Option<(usize, f64)> = None;

    for (i, (contribution, model)) in contributions.iter().zip(models).enumerate() {
        if !contribution.is_success() {
            continue;
        }
        let score = contribution.confidence * model.weight;
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((i, score)),
        }
    }

    best.map(|(i, _)| i)
}

/// Text of the first successful contribution.
pub fn first_text(contributions: &[Contribution]) -> Option<&str> {
    contributions.iter().find_map(Contribution::content)
}

/// Text of the last successful contribution.
pub fn last_text(contributions: &[Contribution]) -> Option<&str> {
    contributions.iter().rev().find_map(Contribution::content)
}
