use super::{Strategy, SynthContext};
use crate::errors::SynthResult;
use crate::tree::DomTree;
use crate::types::{RawCandidate, StrategyKind};

/// Positional walk that anchors on the first ancestor id it meets
pub struct HybridStrategy;

impl<T: DomTree> Strategy<T> for HybridStrategy {
    fn generate(
        &self,
        ctx: &SynthContext<'_, T>,
        target: T::Node,
    ) -> SynthResult<Vec<RawCandidate>> {
        let expression = ctx.positional_path(StrategyKind::Hybrid, target, true)?;
        Ok(vec![RawCandidate::new(expression)])
    }

    fn strategy_type(&self) -> StrategyKind {
        StrategyKind::Hybrid
    }
}
