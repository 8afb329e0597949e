//! `scraper`-backed [`DomTree`] implementation

use scraper::{ElementRef, Html, Selector};

use crate::errors::QueryError;
use crate::tree::DomTree;

pub use scraper::Html as HtmlDocument;

/// Borrowed view over a parsed HTML document.
#[derive(Clone, Copy)]
pub struct HtmlTree<'a> {
    document: &'a Html,
}

impl<'a> HtmlTree<'a> {
    pub fn new(document: &'a Html) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &'a Html {
        self.document
    }

    /// First element matching `expression`, the usual way a host turns a
    /// user pick into a node handle.
    pub fn select_first(&self, expression: &str) -> Result<Option<ElementRef<'a>>, QueryError> {
        Ok(self.query(expression)?.into_iter().next())
    }

    /// The `index`-th (0-based) element matching `expression`.
    pub fn select_nth(
        &self,
        expression: &str,
        index: usize,
    ) -> Result<Option<ElementRef<'a>>, QueryError> {
        Ok(self.query(expression)?.into_iter().nth(index))
    }
}

impl<'a> DomTree for HtmlTree<'a> {
    type Node = ElementRef<'a>;

    fn tag_name(&self, node: Self::Node) -> String {
        node.value().name().to_ascii_lowercase()
    }

    fn element_id(&self, node: Self::Node) -> Option<String> {
        node.value().attr("id").map(|id| id.to_string())
    }

    fn classes(&self, node: Self::Node) -> Vec<String> {
        let mut classes: Vec<String> = Vec::new();
        if let Some(raw) = node.value().attr("class") {
            for token in raw.split_ascii_whitespace() {
                if !classes.iter().any(|existing| existing == token) {
                    classes.push(token.to_string());
                }
            }
        }
        classes
    }

    fn attributes(&self, node: Self::Node) -> Vec<(String, String)> {
        node.value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    fn parent(&self, node: Self::Node) -> Option<Self::Node> {
        node.parent().and_then(ElementRef::wrap)
    }

    fn children(&self, node: Self::Node) -> Vec<Self::Node> {
        node.children().filter_map(ElementRef::wrap).collect()
    }

    fn root(&self) -> Option<Self::Node> {
        Some(self.document.root_element())
    }

    fn query(&self, expression: &str) -> Result<Vec<Self::Node>, QueryError> {
        let selector = Selector::parse(expression)
            .map_err(|err| QueryError::rejected(expression, format!("{:?}", err)))?;
        Ok(self.document.select(&selector).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{child_index, type_index};

    const PAGE: &str = r#"<html><body>
        <ul id="list"><li class="a b a">one</li><p>x</p><li data-k="v">two</li></ul>
    </body></html>"#;

    #[test]
    fn exposes_element_facts() {
        let doc = Html::parse_document(PAGE);
        let tree = HtmlTree::new(&doc);
        let li = tree.select_first("li").unwrap().unwrap();
        assert_eq!(tree.tag_name(li), "li");
        assert_eq!(tree.classes(li), vec!["a".to_string(), "b".to_string()]);
        let ul = tree.parent(li).unwrap();
        assert_eq!(tree.element_id(ul).as_deref(), Some("list"));
        assert_eq!(tree.children(ul).len(), 3);
        assert!(tree.is_attached(li));
    }

    #[test]
    fn positional_indices_follow_css() {
        let doc = Html::parse_document(PAGE);
        let tree = HtmlTree::new(&doc);
        let second = tree.select_nth("li", 1).unwrap().unwrap();
        assert_eq!(child_index(&tree, second), 3);
        assert_eq!(type_index(&tree, second), 2);
        let hits = tree.query("li:nth-child(3)").unwrap();
        assert_eq!(hits, vec![second]);
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        let doc = Html::parse_document(PAGE);
        let tree = HtmlTree::new(&doc);
        assert!(matches!(
            tree.query("li[data-k="),
            Err(QueryError::Rejected { .. })
        ));
    }
}
