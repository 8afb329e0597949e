use super::{class_selector, Strategy, SynthContext};
use crate::errors::SynthResult;
use crate::tree::DomTree;
use crate::types::{RawCandidate, StrategyKind};

/// Classes that get `parent > .class` variants
const PARENT_CONTEXT_CLASSES: usize = 3;

/// Single-class, compound and parent-context class selectors
pub struct ClassStrategy;

impl<T: DomTree> Strategy<T> for ClassStrategy {
    fn generate(
        &self,
        ctx: &SynthContext<'_, T>,
        target: T::Node,
    ) -> SynthResult<Vec<RawCandidate>> {
        let classes = ctx.usable_classes(target);
        if classes.is_empty() {
            return Ok(Vec::new());
        }
        let tag = ctx.tree.tag_name(target);
        let mut out = Vec::new();

        for class in classes.iter().take(ctx.options.max_classes) {
            let Some(selector) = class_selector(class) else {
                continue;
            };
            let tagged = format!("{tag}{selector}");
            out.push(RawCandidate::new(selector));
            out.push(RawCandidate::new(tagged));
        }

        if classes.len() > 1 {
            let compound: Option<String> = classes.iter().map(|c| class_selector(c)).collect();
            if let Some(compound) = compound {
                out.push(RawCandidate::new(compound.clone()));
                out.push(RawCandidate::new(format!("{tag}{compound}")));
            }
        }

        if let Some(parent) = ctx.tree.parent(target) {
            let parent_local = ctx.local_selector(parent);
            for class in classes.iter().take(PARENT_CONTEXT_CLASSES) {
                let Some(selector) = class_selector(class) else {
                    continue;
                };
                out.push(RawCandidate::new(format!("{parent_local} > {selector}")));
                out.push(RawCandidate::new(format!(
                    "{parent_local} > {tag}{selector}"
                )));
            }
        }

        Ok(out)
    }

    fn strategy_type(&self) -> StrategyKind {
        StrategyKind::Class
    }
}
