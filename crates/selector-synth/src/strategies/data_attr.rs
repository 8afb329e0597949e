use super::{Strategy, SynthContext};
use crate::errors::SynthResult;
use crate::tree::DomTree;
use crate::types::{RawCandidate, StrategyKind};

/// `[data-*="value"]` for every non-blocked data attribute
pub struct DataAttributeStrategy;

impl<T: DomTree> Strategy<T> for DataAttributeStrategy {
    fn generate(
        &self,
        ctx: &SynthContext<'_, T>,
        target: T::Node,
    ) -> SynthResult<Vec<RawCandidate>> {
        Ok(ctx
            .data_attributes(target)
            .iter()
            .filter_map(|attr| attr.selector())
            .map(RawCandidate::new)
            .collect())
    }

    fn strategy_type(&self) -> StrategyKind {
        StrategyKind::DataAttribute
    }
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use crate::strategies::test_support::run;
    use crate::types::StrategyKind;

    #[test]
    fn stable_hooks_come_first() {
        let html = r#"<html><body>
            <button data-song="intro" data-role="play" data-testid="play-btn"
                    data-reactid=".0.1" data-tracking-id="abc" data-empty="">Play</button>
        </body></html>"#;
        assert_eq!(
            run(StrategyKind::DataAttribute, html, "button"),
            vec![
                r#"[data-testid="play-btn"]"#,
                r#"[data-role="play"]"#,
                r#"[data-song="intro"]"#,
            ]
        );
    }

    #[test]
    fn values_are_escaped() {
        let html = r#"<html><body><i data-label='say "hi"'>x</i></body></html>"#;
        assert_eq!(
            run(StrategyKind::DataAttribute, html, "i"),
            vec![r#"[data-label="say \"hi\""]"#]
        );
    }
}
