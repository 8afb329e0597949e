use super::{Strategy, SynthContext};
use crate::errors::SynthResult;
use crate::tree::DomTree;
use crate::types::{RawCandidate, StrategyKind};

/// Full `tag:nth-child(i)` path; unique by construction
pub struct FallbackStrategy;

impl<T: DomTree> Strategy<T> for FallbackStrategy {
    fn generate(
        &self,
        ctx: &SynthContext<'_, T>,
        target: T::Node,
    ) -> SynthResult<Vec<RawCandidate>> {
        let expression = ctx.positional_path(StrategyKind::Fallback, target, false)?;
        Ok(vec![RawCandidate::new(expression)])
    }

    fn strategy_type(&self) -> StrategyKind {
        StrategyKind::Fallback
    }
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use crate::strategies::test_support::run;
    use crate::types::StrategyKind;

    #[test]
    fn numeric_path_from_body() {
        let html = r#"<html><body><div id="app">
            <section><button>Go</button></section>
        </div></body></html>"#;
        assert_eq!(
            run(StrategyKind::Fallback, html, "button"),
            vec!["body > div:nth-child(1) > section:nth-child(1) > button:nth-child(1)"]
        );
    }

    #[test]
    fn body_and_root_are_bare() {
        let html = "<html><body><p>x</p></body></html>";
        assert_eq!(run(StrategyKind::Fallback, html, "body"), vec!["body"]);
        assert_eq!(run(StrategyKind::Fallback, html, "html"), vec!["html"]);
        assert_eq!(run(StrategyKind::Fallback, html, "p"), vec!["body > p:nth-child(1)"]);
    }
}
