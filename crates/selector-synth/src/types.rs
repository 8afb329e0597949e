//! Core types for selector synthesis

use serde::{Deserialize, Serialize};

use crate::errors::{SynthError, SynthResult};

/// Candidate generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// `#id` / `tag#id`
    Id,

    /// `[data-*="value"]`
    DataAttribute,

    /// Single, compound and parent-context class selectors
    Class,

    /// Ancestor local selector combined with an own-node variant
    Hierarchy,

    /// Level-by-level minimal disambiguator chain
    SmartChain,

    /// Positional path up to the nearest ancestor id
    Hybrid,

    /// `tag:nth-child(i)` path from `body`
    Fallback,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Id => "id",
            StrategyKind::DataAttribute => "data-attr",
            StrategyKind::Class => "class",
            StrategyKind::Hierarchy => "hierarchy",
            StrategyKind::SmartChain => "smart-chain",
            StrategyKind::Hybrid => "hybrid",
            StrategyKind::Fallback => "fallback",
        }
    }

    /// All strategies in generation order
    pub fn generation_order() -> Vec<StrategyKind> {
        vec![
            StrategyKind::Id,
            StrategyKind::DataAttribute,
            StrategyKind::Class,
            StrategyKind::Hierarchy,
            StrategyKind::SmartChain,
            StrategyKind::Hybrid,
            StrategyKind::Fallback,
        ]
    }

    /// Output of this strategy is a structural chain rather than a single
    /// attribute lookup.
    pub fn is_chain(&self) -> bool {
        matches!(
            self,
            StrategyKind::SmartChain | StrategyKind::Hybrid | StrategyKind::Fallback
        )
    }
}

/// Unscored expression emitted by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub expression: String,
    pub smart_chain: bool,
}

impl RawCandidate {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            smart_chain: false,
        }
    }

    pub fn chain(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            smart_chain: true,
        }
    }
}

/// Flags carried by a candidate through dedup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyTags {
    pub is_class_chain: bool,
    pub is_smart_chain: bool,
    pub is_test_attribute: bool,
}

impl StrategyTags {
    /// Survives similarity suppression on its own merit.
    pub fn is_protected(&self) -> bool {
        self.is_smart_chain || self.is_test_attribute
    }
}

/// Scored selector candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub expression: String,

    /// Stability score (0-100)
    pub score: u8,

    pub is_unique: bool,

    pub tags: StrategyTags,
}

impl Candidate {
    pub fn to_ranked(&self) -> RankedSelector {
        RankedSelector {
            expression: self.expression.clone(),
            score: self.score,
        }
    }
}

/// Candidate plus the node set it resolved to at generation time.
#[derive(Debug, Clone)]
pub struct Evaluated<N> {
    pub candidate: Candidate,
    pub matches: Vec<N>,
    /// Position in generation order, used as the final tie-breaker
    pub order: usize,
}

/// Output record handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSelector {
    pub expression: String,
    pub score: u8,
}

/// Tunable bounds for one synthesis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthOptions {
    /// Length of the returned list
    pub max_candidates: usize,
    /// Jaccard / path similarity at which two candidates count as similar
    pub similarity_threshold: f64,
    /// Ancestors considered by the hierarchical strategy
    pub max_ancestor_depth: usize,
    /// Classes emitted individually by the class strategy
    pub max_classes: usize,
    /// A smart-chain class must match fewer nodes than this tree-wide
    pub class_match_ceiling: usize,
    /// Levels a smart chain may climb; the shortest acceptable chain wins
    pub smart_chain_max_depth: usize,
    /// Hierarchical combinations must score above this
    pub combination_min_score: u8,
    /// Smart chains must score above this
    pub chain_acceptable_score: u8,
    /// Similar candidates scoring above this are kept anyway
    pub keep_similar_above: u8,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            max_candidates: 8,
            similarity_threshold: 0.7,
            max_ancestor_depth: 5,
            max_classes: 10,
            class_match_ceiling: 5,
            smart_chain_max_depth: 6,
            combination_min_score: 30,
            chain_acceptable_score: 25,
            keep_similar_above: 60,
        }
    }
}

impl SynthOptions {
    pub fn validate(&self) -> SynthResult<()> {
        if self.max_candidates == 0 {
            return Err(SynthError::InvalidOptions(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(SynthError::InvalidOptions(format!(
                "similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.smart_chain_max_depth == 0 {
            return Err(SynthError::InvalidOptions(
                "smart_chain_max_depth must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("combination_min_score", self.combination_min_score),
            ("chain_acceptable_score", self.chain_acceptable_score),
            ("keep_similar_above", self.keep_similar_above),
        ] {
            if value > 100 {
                return Err(SynthError::InvalidOptions(format!(
                    "{name} must be a score in 0..=100, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_are_stable() {
        let names: Vec<_> = StrategyKind::generation_order()
            .iter()
            .map(StrategyKind::name)
            .collect();
        assert_eq!(
            names,
            ["id", "data-attr", "class", "hierarchy", "smart-chain", "hybrid", "fallback"]
        );
    }

    #[test]
    fn default_options_validate() {
        assert!(SynthOptions::default().validate().is_ok());
        let bad = SynthOptions {
            smart_chain_max_depth: 0,
            ..SynthOptions::default()
        };
        assert!(matches!(bad.validate(), Err(SynthError::InvalidOptions(_))));
        let bad = SynthOptions {
            similarity_threshold: 1.5,
            ..SynthOptions::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn partial_options_fill_defaults() {
        let options: SynthOptions = serde_yaml::from_str("max_candidates: 3\n").unwrap();
        assert_eq!(options.max_candidates, 3);
        assert_eq!(options.smart_chain_max_depth, 6);
    }
}
