//! Candidate generation strategies
//!
//! Seven independent strategies in generation order:
//! 1. Id - `#id`, `tag#id`
//! 2. Data attribute - `[data-*="value"]`, test hooks first
//! 3. Class - single, compound and parent-context class selectors
//! 4. Hierarchy - ancestor local selector + own-node variant
//! 5. Smart chain - minimal per-level disambiguators
//! 6. Hybrid - positional path up to the nearest ancestor id
//! 7. Fallback - `tag:nth-child(i)` path from `body`

mod class;
mod data_attr;
mod fallback;
mod hierarchy;
mod hybrid;
mod id;
mod smart_chain;

pub use class::ClassStrategy;
pub use data_attr::DataAttributeStrategy;
pub use fallback::FallbackStrategy;
pub use hierarchy::HierarchyStrategy;
pub use hybrid::HybridStrategy;
pub use id::IdStrategy;
pub use smart_chain::SmartChainStrategy;

use tracing::debug;

use crate::classifier::StabilityClassifier;
use crate::errors::{QueryError, SynthError, SynthResult};
use crate::escape::{escape_attr_value, escape_ident, is_plain_attr_name, is_plain_tag_name};
use crate::evaluator::Evaluator;
use crate::tree::{self, DomTree};
use crate::types::{RawCandidate, StrategyKind, SynthOptions};

/// Strategy trait for candidate generation
pub trait Strategy<T: DomTree> {
    /// Produce raw expressions for `target`. An error skips this strategy
    /// only.
    fn generate(&self, ctx: &SynthContext<'_, T>, target: T::Node)
        -> SynthResult<Vec<RawCandidate>>;

    /// Get strategy type
    fn strategy_type(&self) -> StrategyKind;

    /// Get strategy name
    fn name(&self) -> &'static str {
        self.strategy_type().name()
    }
}

/// Get strategy by type
pub fn strategy_for<T: DomTree>(kind: StrategyKind) -> Box<dyn Strategy<T>> {
    match kind {
        StrategyKind::Id => Box::new(IdStrategy),
        StrategyKind::DataAttribute => Box::new(DataAttributeStrategy),
        StrategyKind::Class => Box::new(ClassStrategy),
        StrategyKind::Hierarchy => Box::new(HierarchyStrategy),
        StrategyKind::SmartChain => Box::new(SmartChainStrategy),
        StrategyKind::Hybrid => Box::new(HybridStrategy),
        StrategyKind::Fallback => Box::new(FallbackStrategy),
    }
}

/// Everything a strategy may consult during one call.
pub struct SynthContext<'a, T: DomTree> {
    pub tree: &'a T,
    pub classifier: &'a StabilityClassifier,
    pub options: &'a SynthOptions,
    evaluator: Evaluator<'a, T>,
}

impl<'a, T: DomTree> SynthContext<'a, T> {
    pub fn new(
        tree: &'a T,
        classifier: &'a StabilityClassifier,
        options: &'a SynthOptions,
    ) -> Self {
        Self {
            tree,
            classifier,
            options,
            evaluator: Evaluator::new(tree, classifier),
        }
    }

    pub fn evaluator(&self) -> &Evaluator<'a, T> {
        &self.evaluator
    }

    pub fn match_count(&self, expression: &str) -> Result<usize, QueryError> {
        Ok(self.tree.query(expression)?.len())
    }

    /// `#id` when the node's id is usable and unique tree-wide. A failed
    /// uniqueness query counts as "not unique".
    pub fn unique_id_selector(&self, node: T::Node) -> Option<String> {
        let id = self.tree.element_id(node)?;
        if !self.classifier.is_usable_id(&id) {
            return None;
        }
        let selector = format!("#{}", escape_ident(&id)?);
        match self.match_count(&selector) {
            Ok(1) => Some(selector),
            Ok(_) => None,
            Err(err) => {
                debug!(expression = %selector, error = %err, "id uniqueness query failed");
                None
            }
        }
    }

    /// Usable classes, raw (unescaped), document order.
    pub fn usable_classes(&self, node: T::Node) -> Vec<String> {
        self.classifier.usable_classes(&self.tree.classes(node))
    }

    /// Non-blocked `data-*` attributes with a value, test hooks first, then
    /// stable hooks, then the rest; alphabetical within a group.
    pub fn data_attributes(&self, node: T::Node) -> Vec<DataAttribute> {
        let mut attrs: Vec<DataAttribute> = self
            .tree
            .attributes(node)
            .into_iter()
            .filter_map(|(name, value)| {
                let name = name.to_ascii_lowercase();
                if !name.starts_with("data-") || value.is_empty() {
                    return None;
                }
                let verdict = self.classifier.classify_data_attr(&name, &value);
                if verdict.blocked {
                    return None;
                }
                Some(DataAttribute {
                    name,
                    value,
                    stable: verdict.stable,
                    test_hook: verdict.test_hook,
                })
            })
            .collect();
        attrs.sort_by(|a, b| {
            a.rank()
                .cmp(&b.rank())
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.value.cmp(&b.value))
        });
        attrs
    }

    /// Best selector for a node on its own: id > stable data attribute >
    /// non-generic class > tag.
    pub fn local_selector(&self, node: T::Node) -> String {
        if let Some(id) = self.unique_id_selector(node) {
            return id;
        }
        if let Some(attr) = self
            .data_attributes(node)
            .iter()
            .filter(|attr| attr.stable)
            .find_map(DataAttribute::selector)
        {
            return attr;
        }
        if let Some(class) = self
            .usable_classes(node)
            .iter()
            .find_map(|class| class_selector(class))
        {
            return class;
        }
        self.tree.tag_name(node)
    }

    /// `tag:nth-child(i)`
    pub fn nth_child(&self, node: T::Node) -> String {
        format!(
            "{}:nth-child({})",
            self.tree.tag_name(node),
            tree::child_index(self.tree, node)
        )
    }

    /// Ancestors at or below `body`, nearest first. Walks to the root when
    /// there is no `body`.
    pub fn ancestors_to_body(&self, node: T::Node) -> Vec<T::Node> {
        let mut out = Vec::new();
        if self.is_body(node) {
            return out;
        }
        for ancestor in tree::ancestors(self.tree, node) {
            out.push(ancestor);
            if self.is_body(ancestor) {
                break;
            }
        }
        out
    }

    pub fn is_body(&self, node: T::Node) -> bool {
        self.tree.tag_name(node) == "body"
    }

    /// `tag:nth-child(i)` path from `target` up to `body` (written bare) or
    /// the root element. With `anchor_on_id` the walk stops at the first
    /// ancestor with a usable unique id, written `tag#id`.
    ///
    /// Fails with [`SynthError::StrategyFailed`] when a tag on the path
    /// cannot be written into a selector.
    pub fn positional_path(
        &self,
        kind: StrategyKind,
        target: T::Node,
        anchor_on_id: bool,
    ) -> SynthResult<String> {
        let ancestors = self.ancestors_to_body(target);
        for node in std::iter::once(target).chain(ancestors.iter().copied()) {
            let tag = self.tree.tag_name(node);
            if !is_plain_tag_name(&tag) {
                return Err(SynthError::StrategyFailed {
                    strategy: kind.name().to_string(),
                    reason: format!("tag name '{tag}' cannot be written into a selector"),
                });
            }
        }
        if self.is_body(target) || self.tree.parent(target).is_none() {
            return Ok(self.top_segment(target));
        }
        let mut segments = vec![self.nth_child(target)];
        let last = ancestors.len().saturating_sub(1);
        for (idx, ancestor) in ancestors.into_iter().enumerate() {
            if anchor_on_id {
                if let Some(id) = self.unique_id_selector(ancestor) {
                    segments.push(format!("{}{id}", self.tree.tag_name(ancestor)));
                    break;
                }
            }
            if idx == last {
                segments.push(self.top_segment(ancestor));
            } else {
                segments.push(self.nth_child(ancestor));
            }
        }
        segments.reverse();
        Ok(segments.join(" > "))
    }

    fn top_segment(&self, node: T::Node) -> String {
        let tag = self.tree.tag_name(node);
        match tag.as_str() {
            "body" | "html" => tag,
            _ => format!("{tag}:root"),
        }
    }
}

/// A `data-*` attribute that survived classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAttribute {
    pub name: String,
    pub value: String,
    pub stable: bool,
    pub test_hook: bool,
}

impl DataAttribute {
    fn rank(&self) -> u8 {
        match (self.test_hook, self.stable) {
            (true, _) => 0,
            (false, true) => 1,
            (false, false) => 2,
        }
    }

    /// `[name="value"]`, or `None` when the pair cannot be written safely.
    pub fn selector(&self) -> Option<String> {
        attribute_selector(&self.name, &self.value)
    }
}

pub fn class_selector(class: &str) -> Option<String> {
    escape_ident(class).map(|escaped| format!(".{escaped}"))
}

pub fn attribute_selector(name: &str, value: &str) -> Option<String> {
    if !is_plain_attr_name(name) {
        return None;
    }
    escape_attr_value(value).map(|escaped| format!("[{name}=\"{escaped}\"]"))
}

#[cfg(all(test, feature = "html"))]
pub(crate) mod test_support {
    use crate::classifier::StabilityClassifier;
    use crate::html::{HtmlDocument, HtmlTree};
    use crate::types::{RawCandidate, StrategyKind, SynthOptions};

    use super::{strategy_for, SynthContext};

    /// Run one strategy against the first node matching `target`.
    pub fn run(kind: StrategyKind, html: &str, target: &str) -> Vec<String> {
        run_with(kind, html, target, SynthOptions::default())
    }

    pub fn run_with(
        kind: StrategyKind,
        html: &str,
        target: &str,
        options: SynthOptions,
    ) -> Vec<String> {
        let doc = HtmlDocument::parse_document(html);
        let tree = HtmlTree::new(&doc);
        let classifier = StabilityClassifier::default();
        let ctx = SynthContext::new(&tree, &classifier, &options);
        let node = tree.select_first(target).unwrap().unwrap();
        let out = strategy_for(kind)
            .generate(&ctx, node)
            .unwrap()
            .into_iter()
            .map(|raw: RawCandidate| raw.expression)
            .collect();
        out
    }
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use crate::html::{HtmlDocument, HtmlTree};

    const PAGE: &str = r#"<html><body><div id="app">
        <nav data-role="menu" class="wrapper nav-bar">
            <a class="css-1x2y3z nav-link" data-testid="home" data-song="intro" data-timestamp="1700000000">Home</a>
        </nav>
        <p class="row">x</p>
    </div></body></html>"#;

    #[test]
    fn data_attributes_are_grouped() {
        let doc = HtmlDocument::parse_document(PAGE);
        let tree = HtmlTree::new(&doc);
        let classifier = StabilityClassifier::default();
        let options = SynthOptions::default();
        let ctx = SynthContext::new(&tree, &classifier, &options);

        let link = tree.select_first("a").unwrap().unwrap();
        let names: Vec<_> = ctx
            .data_attributes(link)
            .into_iter()
            .map(|attr| attr.name)
            .collect();
        assert_eq!(names, vec!["data-testid", "data-song"]);
    }

    #[test]
    fn local_selector_priority() {
        let doc = HtmlDocument::parse_document(PAGE);
        let tree = HtmlTree::new(&doc);
        let classifier = StabilityClassifier::default();
        let options = SynthOptions::default();
        let ctx = SynthContext::new(&tree, &classifier, &options);

        let app = tree.select_first("#app").unwrap().unwrap();
        assert_eq!(ctx.local_selector(app), "#app");
        let nav = tree.select_first("nav").unwrap().unwrap();
        assert_eq!(ctx.local_selector(nav), r#"[data-role="menu"]"#);
        let link = tree.select_first("a").unwrap().unwrap();
        assert_eq!(ctx.local_selector(link), r#"[data-testid="home"]"#);
        let para = tree.select_first("p").unwrap().unwrap();
        assert_eq!(ctx.local_selector(para), "p");
    }

    #[test]
    fn ancestors_stop_at_body() {
        let doc = HtmlDocument::parse_document(PAGE);
        let tree = HtmlTree::new(&doc);
        let classifier = StabilityClassifier::default();
        let options = SynthOptions::default();
        let ctx = SynthContext::new(&tree, &classifier, &options);

        let link = tree.select_first("a").unwrap().unwrap();
        let tags: Vec<_> = ctx
            .ancestors_to_body(link)
            .into_iter()
            .map(|node| tree.tag_name(node))
            .collect();
        assert_eq!(tags, vec!["nav", "div", "body"]);
        assert_eq!(ctx.nth_child(link), "a:nth-child(1)");
    }

    #[test]
    fn selectors_escape_values() {
        assert_eq!(class_selector("md:flex").as_deref(), Some(".md\\:flex"));
        assert_eq!(
            attribute_selector("data-x", "a\"b").as_deref(),
            Some(r#"[data-x="a\"b"]"#)
        );
        assert!(attribute_selector("data x", "v").is_none());
        assert!(attribute_selector("data-x", "").is_none());
    }
}
