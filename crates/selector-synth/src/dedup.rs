//! Similarity and near-duplicate suppression
//!
//! Candidates are visited best-first. A candidate resolving to exactly the
//! same node set as a kept one survives only when both carry a protected
//! flag; a merely similar one survives when it scores high or is flagged.

use tracing::debug;

use crate::path::{Segment, SelectorPath};
use crate::rank;
use crate::types::{Evaluated, SynthOptions};

const TAG_WEIGHT: f64 = 1.0;
const ID_WEIGHT: f64 = 2.0;
const CLASS_WEIGHT: f64 = 1.5;
const ATTRIBUTE_WEIGHT: f64 = 1.5;
const PSEUDO_WEIGHT: f64 = 1.0;
const COMBINATOR_WEIGHT: f64 = 0.5;

/// |a ∩ b| / |a ∪ b|; two empty sets are identical.
pub fn jaccard<N: PartialEq>(a: &[N], b: &[N]) -> f64 {
    let mut union: Vec<&N> = Vec::with_capacity(a.len() + b.len());
    for item in a.iter().chain(b.iter()) {
        if !union.contains(&item) {
            union.push(item);
        }
    }
    if union.is_empty() {
        return 1.0;
    }
    let intersection = union
        .iter()
        .filter(|&&item| a.contains(item) && b.contains(item))
        .count();
    intersection as f64 / union.len() as f64
}

fn same_set<N: PartialEq>(a: &[N], b: &[N]) -> bool {
    a.iter().all(|item| b.contains(item)) && b.iter().all(|item| a.contains(item))
}

/// Right-aligned, segment-by-segment similarity in 0.0..=1.0.
pub fn path_similarity(a: &SelectorPath, b: &SelectorPath) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    let total: f64 = a
        .segments
        .iter()
        .rev()
        .zip(b.segments.iter().rev())
        .map(|(left, right)| segment_similarity(left, right))
        .sum();
    total / longest as f64
}

fn segment_similarity(a: &Segment, b: &Segment) -> f64 {
    let mut earned = 0.0;
    let mut possible = COMBINATOR_WEIGHT;
    if a.combinator == b.combinator {
        earned += COMBINATOR_WEIGHT;
    }
    if a.tag.is_some() || b.tag.is_some() {
        possible += TAG_WEIGHT;
        if a.tag == b.tag {
            earned += TAG_WEIGHT;
        }
    }
    if a.id.is_some() || b.id.is_some() {
        possible += ID_WEIGHT;
        if a.id == b.id {
            earned += ID_WEIGHT;
        }
    }
    if !a.classes.is_empty() || !b.classes.is_empty() {
        possible += CLASS_WEIGHT;
        earned += CLASS_WEIGHT * jaccard(&a.classes, &b.classes);
    }
    if !a.attributes.is_empty() || !b.attributes.is_empty() {
        possible += ATTRIBUTE_WEIGHT;
        earned += ATTRIBUTE_WEIGHT * jaccard(&a.attributes, &b.attributes);
    }
    if !a.pseudos.is_empty() || !b.pseudos.is_empty() {
        possible += PSEUDO_WEIGHT;
        earned += PSEUDO_WEIGHT * jaccard(&a.pseudos, &b.pseudos);
    }
    earned / possible
}

/// Path similarity, only for expressions sharing a shape key.
fn structurally_similar(a: &str, b: &str) -> f64 {
    match (SelectorPath::parse(a), SelectorPath::parse(b)) {
        (Some(left), Some(right)) if left.shape_key() == right.shape_key() => {
            path_similarity(&left, &right)
        }
        _ => 0.0,
    }
}

/// Suppress duplicates; output is best-first.
pub fn dedup<N: PartialEq>(
    mut candidates: Vec<Evaluated<N>>,
    options: &SynthOptions,
) -> Vec<Evaluated<N>> {
    candidates.sort_by(rank::compare);
    let mut kept: Vec<Evaluated<N>> = Vec::with_capacity(candidates.len());

    'candidates: for candidate in candidates {
        let tags = candidate.candidate.tags;
        for existing in &kept {
            if same_set(&candidate.matches, &existing.matches) {
                if tags.is_protected() && existing.candidate.tags.is_protected() {
                    continue;
                }
                debug!(
                    expression = %candidate.candidate.expression,
                    kept = %existing.candidate.expression,
                    "Dropping candidate with identical node set"
                );
                continue 'candidates;
            }

            let overlap = jaccard(&candidate.matches, &existing.matches);
            let similar = overlap >= options.similarity_threshold
                || structurally_similar(
                    &candidate.candidate.expression,
                    &existing.candidate.expression,
                ) >= options.similarity_threshold;
            if similar
                && candidate.candidate.score <= options.keep_similar_above
                && !tags.is_protected()
            {
                debug!(
                    expression = %candidate.candidate.expression,
                    kept = %existing.candidate.expression,
                    "Dropping similar candidate"
                );
                continue 'candidates;
            }
        }
        kept.push(candidate);
    }
    kept
}
