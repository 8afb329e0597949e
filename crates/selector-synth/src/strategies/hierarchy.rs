use tracing::debug;

use super::{class_selector, Strategy, SynthContext};
use crate::errors::SynthResult;
use crate::tree::{self, DomTree};
use crate::types::{RawCandidate, StrategyKind};

/// Own-node classes offered as combination variants
const VARIANT_CLASSES: usize = 3;

/// Ancestor local selector combined with each own-node variant
pub struct HierarchyStrategy;

impl<T: DomTree> Strategy<T> for HierarchyStrategy {
    fn generate(
        &self,
        ctx: &SynthContext<'_, T>,
        target: T::Node,
    ) -> SynthResult<Vec<RawCandidate>> {
        let evaluator = ctx.evaluator();
        // variants that already identify the target alone gain nothing
        let variants: Vec<String> = own_variants(ctx, target)
            .into_iter()
            .filter(|variant| !evaluator.evaluate(variant, target).is_unique)
            .collect();
        if variants.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        let ancestors = tree::ancestors(ctx.tree, target);
        for (depth, ancestor) in ancestors
            .into_iter()
            .take(ctx.options.max_ancestor_depth)
            .enumerate()
        {
            let local = ctx.local_selector(ancestor);
            let combinator = if depth == 0 { " > " } else { " " };
            for variant in &variants {
                let expression = format!("{local}{combinator}{variant}");
                let evaluation = evaluator.evaluate(&expression, target);
                if evaluation.is_unique && evaluation.score > ctx.options.combination_min_score {
                    out.push(RawCandidate::new(expression));
                } else {
                    debug!(
                        expression = %expression,
                        unique = evaluation.is_unique,
                        score = evaluation.score,
                        "Combination rejected"
                    );
                }
            }
        }
        Ok(out)
    }

    fn strategy_type(&self) -> StrategyKind {
        StrategyKind::Hierarchy
    }
}

/// Tag, first classes, class compound and stable data attributes.
fn own_variants<T: DomTree>(ctx: &SynthContext<'_, T>, target: T::Node) -> Vec<String> {
    let mut variants = vec![ctx.tree.tag_name(target)];
    let classes = ctx.usable_classes(target);
    variants.extend(
        classes
            .iter()
            .take(VARIANT_CLASSES)
            .filter_map(|class| class_selector(class)),
    );
    if classes.len() > 1 {
        let compound: Option<String> = classes.iter().map(|c| class_selector(c)).collect();
        variants.extend(compound);
    }
    variants.extend(
        ctx.data_attributes(target)
            .iter()
            .filter(|attr| attr.stable)
            .filter_map(|attr| attr.selector()),
    );
    variants.dedup();
    variants
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use crate::strategies::test_support::run;
    use crate::types::StrategyKind;

    #[test]
    fn scopes_ambiguous_variants_under_ancestors() {
        let html = r#"<html><body>
            <section id="now-playing"><span class="title">A</span></section>
            <section id="up-next"><span class="title">B</span></section>
        </body></html>"#;
        assert_eq!(
            run(StrategyKind::Hierarchy, html, "#up-next span"),
            vec!["#up-next > span", "#up-next > .title"]
        );
    }

    #[test]
    fn unique_variants_are_not_combined() {
        let html = r#"<html><body><div id="app">
            <button data-testid="submit-btn">Go</button>
        </div></body></html>"#;
        assert!(run(StrategyKind::Hierarchy, html, "button").is_empty());
    }
}
