//! Ranking & selection

use std::cmp::Ordering;

use crate::types::{Candidate, Evaluated, RankedSelector};

/// Score descending, then shorter expression, then generation order.
pub fn compare<N>(a: &Evaluated<N>, b: &Evaluated<N>) -> Ordering {
    b.candidate
        .score
        .cmp(&a.candidate.score)
        .then_with(|| {
            a.candidate
                .expression
                .chars()
                .count()
                .cmp(&b.candidate.expression.chars().count())
        })
        .then_with(|| a.order.cmp(&b.order))
}

/// Sort and cap the list.
pub fn rank<N>(mut candidates: Vec<Evaluated<N>>, max_candidates: usize) -> Vec<Candidate> {
    candidates.sort_by(compare);
    candidates.truncate(max_candidates);
    candidates.into_iter().map(|e| e.candidate).collect()
}

pub fn to_ranked(candidates: &[Candidate]) -> Vec<RankedSelector> {
    candidates.iter().map(Candidate::to_ranked).collect()
}
