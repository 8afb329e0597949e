use tracing::debug;

use super::{Strategy, SynthContext};
use crate::errors::SynthResult;
use crate::tree::DomTree;
use crate::types::{RawCandidate, StrategyKind};

/// `#id` and `tag#id` for a usable id that is unique tree-wide
pub struct IdStrategy;

impl<T: DomTree> Strategy<T> for IdStrategy {
    fn generate(
        &self,
        ctx: &SynthContext<'_, T>,
        target: T::Node,
    ) -> SynthResult<Vec<RawCandidate>> {
        let Some(selector) = ctx.unique_id_selector(target) else {
            debug!("No usable unique id on target");
            return Ok(Vec::new());
        };
        let tag = ctx.tree.tag_name(target);
        Ok(vec![
            RawCandidate::new(selector.clone()),
            RawCandidate::new(format!("{tag}{selector}")),
        ])
    }

    fn strategy_type(&self) -> StrategyKind {
        StrategyKind::Id
    }
}
