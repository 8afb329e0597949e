//! Uniqueness check and stability scoring
//!
//! One weight table, applied only to expressions that identify the target.
//! Query failures never escape: a rejected expression is simply not unique.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::classifier::StabilityClassifier;
use crate::path::SelectorPath;
use crate::tree::DomTree;
use crate::types::{RawCandidate, StrategyTags};

pub const TEST_ATTRIBUTE_BONUS: i32 = 40;
pub const BARE_ID_BONUS: i32 = 35;
pub const ID_BONUS: i32 = 25;
pub const STABLE_ATTRIBUTE_BONUS: i32 = 20;
pub const ANCHORED_SEGMENT_BONUS: f64 = 20.0;
pub const BEM_ELEMENT_BONUS: i32 = 5;
pub const BEM_ELEMENT_CAP: i32 = 15;
pub const BEM_MODIFIER_BONUS: i32 = 4;
pub const BEM_MODIFIER_CAP: i32 = 12;
pub const SIMPLE_IDENTIFIER_BONUS: i32 = 15;
pub const SHORT_EXPRESSION_BONUS: i32 = 12;
pub const SHORT_EXPRESSION_LEN: usize = 40;
pub const NON_POSITIONAL_BONUS: i32 = 10;

pub const LONG_EXPRESSION_PENALTY: i32 = 10;
pub const LONG_EXPRESSION_LEN: usize = 100;
pub const COMBINATOR_PENALTY: i32 = 7;
pub const MAX_COMBINATORS: usize = 5;
pub const BARE_TAG_PAIR_PENALTY: i32 = 20;
pub const POSITIONAL_PENALTY: i32 = 5;
pub const DEEP_CHAIN_PENALTY: i32 = 5;
pub const DEEP_CHAIN_FREE_SEGMENTS: usize = 3;
pub const DEEP_CHAIN_CAP: i32 = 25;
pub const DEEP_CHAIN_CAP_WITH_TEST_ATTRIBUTE: i32 = 15;

static SIMPLE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[a-z][a-z0-9]*(?:(?:-{1,2}|_{1,2})[a-z0-9]+)*|[a-z]+(?:[A-Z][a-z0-9]*)+)$")
        .expect("identifier pattern compiles")
});

/// Result of evaluating one expression against one target.
#[derive(Debug, Clone)]
pub struct Evaluation<N> {
    pub score: u8,
    pub is_unique: bool,
    pub tags: StrategyTags,
    /// Resolved node set, document order
    pub matches: Vec<N>,
}

impl<N> Evaluation<N> {
    fn rejected() -> Self {
        Self {
            score: 0,
            is_unique: false,
            tags: StrategyTags::default(),
            matches: Vec::new(),
        }
    }
}

pub struct Evaluator<'a, T: DomTree> {
    tree: &'a T,
    classifier: &'a StabilityClassifier,
}

impl<'a, T: DomTree> Evaluator<'a, T> {
    pub fn new(tree: &'a T, classifier: &'a StabilityClassifier) -> Self {
        Self { tree, classifier }
    }

    pub fn evaluate(&self, expression: &str, target: T::Node) -> Evaluation<T::Node> {
        let Some(path) = SelectorPath::parse(expression) else {
            debug!(expression, "unreadable candidate expression");
            return Evaluation::rejected();
        };
        let matches = match self.tree.query(expression) {
            Ok(matches) => matches,
            Err(err) => {
                debug!(expression, error = %err, "query rejected candidate");
                return Evaluation::rejected();
            }
        };

        let tags = self.tags(&path);
        let is_unique = self.is_unique(&path, &matches, target);
        let score = if is_unique {
            self.score(expression, &path)
        } else {
            0
        };
        Evaluation {
            score,
            is_unique,
            tags,
            matches,
        }
    }

    /// Evaluate a strategy output, carrying its chain flag into the tags.
    pub fn evaluate_raw(&self, raw: &RawCandidate, target: T::Node) -> Evaluation<T::Node> {
        let mut evaluation = self.evaluate(&raw.expression, target);
        evaluation.tags.is_smart_chain = raw.smart_chain;
        evaluation
    }

    /// Exactly `{target}`, or the relaxed form: target is the first match
    /// of a qualified (non bare-tag) expression carrying an id, class or
    /// stable data-attribute.
    // NOTE: the relaxed branch lets an expression matching several nodes
    // count as unique. Ranking output depends on it, so it is pinned by
    // `relaxed_rule_accepts_first_match` rather than tightened here.
    fn is_unique(&self, path: &SelectorPath, matches: &[T::Node], target: T::Node) -> bool {
        match matches {
            [only] => *only == target,
            [first, ..] if *first == target => {
                !path.is_bare_tag()
                    && (path.has_id() || path.has_class() || self.has_stable_attribute(path))
            }
            _ => false,
        }
    }

    fn tags(&self, path: &SelectorPath) -> StrategyTags {
        StrategyTags {
            is_class_chain: path.is_class_chain(),
            is_smart_chain: false,
            is_test_attribute: self.has_test_attribute(path),
        }
    }

    fn has_test_attribute(&self, path: &SelectorPath) -> bool {
        path.attributes()
            .any(|attr| self.classifier.is_test_attribute(&attr.name))
    }

    fn has_stable_attribute(&self, path: &SelectorPath) -> bool {
        path.attributes()
            .any(|attr| self.classifier.is_stable_attribute(&attr.name))
    }

    /// Weighted score for a unique expression, clamped to 0..=100.
    pub fn score(&self, expression: &str, path: &SelectorPath) -> u8 {
        let length = expression.chars().count();
        let has_test_attribute = self.has_test_attribute(path);
        let has_stable_attribute = path.attributes().any(|attr| {
            !self.classifier.is_test_attribute(&attr.name)
                && self.classifier.is_stable_attribute(&attr.name)
        });

        let mut score: i32 = 0;

        if has_test_attribute {
            score += TEST_ATTRIBUTE_BONUS;
        }
        if path.is_bare_id() {
            score += BARE_ID_BONUS;
        } else if path.has_id() {
            score += ID_BONUS;
        }
        if has_stable_attribute {
            score += STABLE_ATTRIBUTE_BONUS;
        }
        score += (path.anchored_ratio() * ANCHORED_SEGMENT_BONUS).round() as i32;

        let names: Vec<&str> = path
            .segments
            .iter()
            .flat_map(|seg| seg.id.iter().chain(seg.classes.iter()))
            .map(String::as_str)
            .collect();
        let elements = names.iter().filter(|name| name.contains("__")).count() as i32;
        let modifiers = names.iter().filter(|name| name.contains("--")).count() as i32;
        score += (elements * BEM_ELEMENT_BONUS).min(BEM_ELEMENT_CAP);
        score += (modifiers * BEM_MODIFIER_BONUS).min(BEM_MODIFIER_CAP);

        let tokens = path.identifier_tokens();
        if !tokens.is_empty() && tokens.iter().all(|token| SIMPLE_IDENTIFIER.is_match(token)) {
            score += SIMPLE_IDENTIFIER_BONUS;
        }
        if length < SHORT_EXPRESSION_LEN {
            score += SHORT_EXPRESSION_BONUS;
        }
        let positional = path.has_positional();
        if !positional {
            score += NON_POSITIONAL_BONUS;
        }

        if length > LONG_EXPRESSION_LEN {
            score -= LONG_EXPRESSION_PENALTY;
        }
        if path.combinator_count() > MAX_COMBINATORS {
            score -= COMBINATOR_PENALTY;
        }
        if path.is_bare_tag_pair() {
            score -= BARE_TAG_PAIR_PENALTY;
        }
        if positional && !has_test_attribute {
            score -= POSITIONAL_PENALTY;
        }
        let excess = path.len().saturating_sub(DEEP_CHAIN_FREE_SEGMENTS) as i32;
        if excess > 0 {
            let cap = if has_test_attribute {
                DEEP_CHAIN_CAP_WITH_TEST_ATTRIBUTE
            } else {
                DEEP_CHAIN_CAP
            };
            score -= (excess * DEEP_CHAIN_PENALTY).min(cap);
        }

        score.clamp(0, 100) as u8
    }
}
