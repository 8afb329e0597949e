use tracing::debug;

use super::{class_selector, Strategy, SynthContext};
use crate::errors::SynthResult;
use crate::tree::{self, DomTree};
use crate::types::{RawCandidate, StrategyKind};

/// Shortest chain of per-level disambiguators that is unique and scores
/// above the acceptable threshold
pub struct SmartChainStrategy;

impl<T: DomTree> Strategy<T> for SmartChainStrategy {
    fn generate(
        &self,
        ctx: &SynthContext<'_, T>,
        target: T::Node,
    ) -> SynthResult<Vec<RawCandidate>> {
        let options = ctx.options;
        let mut levels: Vec<String> = Vec::new();
        let mut current = Some(target);

        for depth in 1..=options.smart_chain_max_depth {
            let Some(node) = current else {
                break;
            };
            levels.push(disambiguator(ctx, node));

            let expression = levels
                .iter()
                .rev()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" > ");
            let evaluation = ctx.evaluator().evaluate(&expression, target);
            if evaluation.is_unique && evaluation.score > options.chain_acceptable_score {
                debug!(depth, expression = %expression, score = evaluation.score, "Smart chain accepted");
                return Ok(vec![RawCandidate::new(expression)]);
            }
            current = ctx.tree.parent(node);
        }

        debug!("No acceptable smart chain within depth limit");
        Ok(Vec::new())
    }

    fn strategy_type(&self) -> StrategyKind {
        StrategyKind::SmartChain
    }
}

/// Best single-level selector: unique id, then a rare class no sibling
/// shares, then a stable data attribute no sibling shares, then position.
fn disambiguator<T: DomTree>(ctx: &SynthContext<'_, T>, node: T::Node) -> String {
    if let Some(id) = ctx.unique_id_selector(node) {
        return id;
    }

    let others: Vec<T::Node> = tree::siblings(ctx.tree, node)
        .into_iter()
        .filter(|sibling| *sibling != node)
        .collect();

    let classes = ctx.usable_classes(node);
    for class in &classes {
        if others
            .iter()
            .any(|sibling| ctx.tree.classes(*sibling).contains(class))
        {
            continue;
        }
        let Some(selector) = class_selector(class) else {
            continue;
        };
        match ctx.match_count(&selector) {
            Ok(count) if count < ctx.options.class_match_ceiling => return selector,
            Ok(_) => {}
            Err(err) => debug!(expression = %selector, error = %err, "class count query failed"),
        }
    }

    for attr in ctx.data_attributes(node).iter().filter(|attr| attr.stable) {
        let shared = others.iter().any(|sibling| {
            tree::attribute(ctx.tree, *sibling, &attr.name).as_deref() == Some(attr.value.as_str())
        });
        if shared {
            continue;
        }
        if let Some(selector) = attr.selector() {
            return selector;
        }
    }

    if let Some(selector) = classes.iter().find_map(|class| class_selector(class)) {
        return format!("{selector}:nth-child({})", tree::child_index(ctx.tree, node));
    }
    format!(
        "{}:nth-of-type({})",
        ctx.tree.tag_name(node),
        tree::type_index(ctx.tree, node)
    )
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use crate::strategies::test_support::{run, run_with};
    use crate::types::{StrategyKind, SynthOptions};

    const QUEUE: &str = r#"<html><body><ul>
        <li class="item">One</li>
        <li class="item">Two</li>
    </ul></body></html>"#;

    #[test]
    fn positional_disambiguator_for_lookalike_siblings() {
        assert_eq!(
            run(StrategyKind::SmartChain, QUEUE, "li"),
            vec![".item:nth-child(1)"]
        );
        assert_eq!(
            run(StrategyKind::SmartChain, QUEUE, "li + li"),
            vec![".item:nth-child(2)"]
        );
    }

    const HISTORY: &str = r#"<html><body>
            <section class="playlist"><ol class="songs">
                <li class="song">a</li><li class="song">b</li>
            </ol></section>
            <section class="history"><ol class="songs">
                <li class="song">c</li><li class="song">d</li>
            </ol></section>
        </body></html>"#;

    #[test]
    fn climbs_until_the_chain_is_unique() {
        assert_eq!(
            run(StrategyKind::SmartChain, HISTORY, ".history li"),
            vec![".history > .songs > .song:nth-child(1)"]
        );
    }

    #[test]
    fn gives_up_at_the_depth_limit() {
        let options = SynthOptions {
            smart_chain_max_depth: 2,
            ..SynthOptions::default()
        };
        assert!(run_with(StrategyKind::SmartChain, HISTORY, ".history li", options).is_empty());
    }

    #[test]
    fn rare_class_wins_over_position() {
        let html = r#"<html><body><ul>
            <li class="item now-playing">One</li>
            <li class="item">Two</li>
        </ul></body></html>"#;
        assert_eq!(
            run(StrategyKind::SmartChain, html, "li"),
            vec![".now-playing"]
        );
    }
}
