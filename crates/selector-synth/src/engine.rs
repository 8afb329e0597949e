//! Synthesis orchestration: generate, evaluate, dedup, rank

use tracing::{debug, info, warn};

use crate::classifier::StabilityClassifier;
use crate::dedup::dedup;
use crate::errors::{SynthError, SynthResult};
use crate::evaluator::Evaluation;
use crate::patterns::{PatternOverrides, PatternTable};
use crate::rank::{rank, to_ranked};
use crate::strategies::{strategy_for, SynthContext};
use crate::tree::DomTree;
use crate::types::{Candidate, Evaluated, RankedSelector, RawCandidate, StrategyKind, SynthOptions};

/// Selector synthesis engine.
///
/// Holds only immutable configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct SelectorSynth {
    classifier: StabilityClassifier,
    options: SynthOptions,
}

impl SelectorSynth {
    /// Create an engine over the built-in pattern table
    pub fn new(options: SynthOptions) -> Self {
        Self {
            classifier: StabilityClassifier::default(),
            options,
        }
    }

    pub fn with_classifier(options: SynthOptions, classifier: StabilityClassifier) -> Self {
        Self {
            classifier,
            options,
        }
    }

    /// Validate options and compile host pattern overrides.
    pub fn with_patterns(options: SynthOptions, overrides: &PatternOverrides) -> SynthResult<Self> {
        options.validate()?;
        let table = PatternTable::with_overrides(overrides)?;
        Ok(Self::with_classifier(options, StabilityClassifier::new(table)))
    }

    pub fn options(&self) -> &SynthOptions {
        &self.options
    }

    pub fn classifier(&self) -> &StabilityClassifier {
        &self.classifier
    }

    /// Ranked `{expression, score}` records for `target`.
    pub fn suggest<T: DomTree>(&self, tree: &T, target: T::Node) -> Vec<RankedSelector> {
        to_ranked(&self.generate(tree, target))
    }

    /// Ranked candidates with their flags. Empty when the target is detached
    /// or nothing qualifies.
    pub fn generate<T: DomTree>(&self, tree: &T, target: T::Node) -> Vec<Candidate> {
        if !tree.is_attached(target) {
            let err = SynthError::DetachedTarget(format!("{:?}", target));
            warn!(error = %err, "Skipping selector synthesis");
            return Vec::new();
        }

        let ctx = SynthContext::new(tree, &self.classifier, &self.options);
        let raw = self.collect(&ctx, target);
        let evaluator = ctx.evaluator();

        let evaluated: Vec<Evaluated<T::Node>> = raw
            .iter()
            .enumerate()
            .filter_map(|(order, candidate)| {
                let evaluation = evaluator.evaluate_raw(candidate, target);
                if !evaluation.is_unique {
                    debug!(expression = %candidate.expression, "Candidate is not unique");
                    return None;
                }
                Some(Evaluated {
                    candidate: Candidate {
                        expression: candidate.expression.clone(),
                        score: evaluation.score,
                        is_unique: true,
                        tags: evaluation.tags,
                    },
                    matches: evaluation.matches,
                    order,
                })
            })
            .collect();
        let unique = evaluated.len();

        let kept = dedup(evaluated, &self.options);
        let ranked = rank(kept, self.options.max_candidates);
        info!(
            generated = raw.len(),
            unique,
            returned = ranked.len(),
            best = ranked.first().map(|c| c.expression.as_str()).unwrap_or("-"),
            "Selector synthesis complete"
        );
        ranked
    }

    /// Evaluate an arbitrary expression against `target` with this engine's
    /// classifier.
    pub fn evaluate<T: DomTree>(
        &self,
        tree: &T,
        expression: &str,
        target: T::Node,
    ) -> Evaluation<T::Node> {
        SynthContext::new(tree, &self.classifier, &self.options)
            .evaluator()
            .evaluate(expression, target)
    }

    /// Run every strategy; a failing strategy is logged and skipped.
    fn collect<T: DomTree>(&self, ctx: &SynthContext<'_, T>, target: T::Node) -> Vec<RawCandidate> {
        let mut raw: Vec<RawCandidate> = Vec::new();
        for kind in StrategyKind::generation_order() {
            let strategy = strategy_for::<T>(kind);
            match strategy.generate(ctx, target) {
                Ok(candidates) => {
                    debug!(
                        "Strategy {} produced {} candidates",
                        strategy.name(),
                        candidates.len()
                    );
                    let chain = kind.is_chain();
                    for candidate in candidates {
                        let candidate = if chain {
                            RawCandidate::chain(candidate.expression)
                        } else {
                            candidate
                        };
                        merge(&mut raw, candidate);
                    }
                }
                Err(e) => {
                    warn!(
                        recoverable = e.is_recoverable(),
                        severity = e.severity(),
                        "Strategy {} failed: {}",
                        strategy.name(),
                        e
                    );
                }
            }
        }
        raw
    }
}

/// Keep first-seen order; a repeated expression only adds its chain flag.
fn merge(into: &mut Vec<RawCandidate>, candidate: RawCandidate) {
    match into
        .iter_mut()
        .find(|existing| existing.expression == candidate.expression)
    {
        Some(existing) => existing.smart_chain |= candidate.smart_chain,
        None => into.push(candidate),
    }
}
