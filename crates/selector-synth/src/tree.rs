//! Tree traversal and query abstraction
//!
//! The engine never owns nodes. It walks the caller's tree through
//! [`DomTree`], which exposes element facts, parent/child links and a
//! fallible selector query.

use std::fmt::Debug;

use crate::errors::QueryError;

/// Read-only view of a queryable document tree.
pub trait DomTree {
    /// Cheap node handle; equality means "same node".
    type Node: Copy + Eq + Debug;

    /// Lowercase tag name
    fn tag_name(&self, node: Self::Node) -> String;

    /// Value of the `id` attribute, if any
    fn element_id(&self, node: Self::Node) -> Option<String>;

    /// Class tokens in document order, without duplicates
    fn classes(&self, node: Self::Node) -> Vec<String>;

    /// All attributes as `(name, value)` pairs
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;

    /// Parent element; `None` for the root element
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children in document order
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// The document's root element
    fn root(&self) -> Option<Self::Node>;

    /// Resolve `expression` to matching nodes in document order.
    fn query(&self, expression: &str) -> Result<Vec<Self::Node>, QueryError>;

    /// Whether `node` is reachable from the root element.
    fn is_attached(&self, node: Self::Node) -> bool {
        let Some(root) = self.root() else {
            return false;
        };
        let mut current = node;
        let mut steps = 0usize;
        while let Some(parent) = self.parent(current) {
            current = parent;
            steps += 1;
            if steps > MAX_WALK {
                return false;
            }
        }
        current == root
    }
}

/// Hard stop for upward walks on malformed trees.
const MAX_WALK: usize = 4096;

/// Ancestors of `node`, nearest first, excluding `node` itself.
pub fn ancestors<T: DomTree>(tree: &T, node: T::Node) -> Vec<T::Node> {
    let mut out = Vec::new();
    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        out.push(parent);
        current = parent;
        if out.len() > MAX_WALK {
            break;
        }
    }
    out
}

/// Element siblings of `node`, including itself, in document order.
pub fn siblings<T: DomTree>(tree: &T, node: T::Node) -> Vec<T::Node> {
    match tree.parent(node) {
        Some(parent) => tree.children(parent),
        None => vec![node],
    }
}

/// 1-based position among all element siblings (`:nth-child`).
pub fn child_index<T: DomTree>(tree: &T, node: T::Node) -> usize {
    siblings(tree, node)
        .iter()
        .position(|sibling| *sibling == node)
        .map(|idx| idx + 1)
        .unwrap_or(1)
}

/// 1-based position among siblings sharing the tag name (`:nth-of-type`).
pub fn type_index<T: DomTree>(tree: &T, node: T::Node) -> usize {
    let tag = tree.tag_name(node);
    let mut index = 0;
    for sibling in siblings(tree, node) {
        if tree.tag_name(sibling) == tag {
            index += 1;
        }
        if sibling == node {
            return index;
        }
    }
    1
}

/// Attribute lookup by name.
pub fn attribute<T: DomTree>(tree: &T, node: T::Node, name: &str) -> Option<String> {
    tree.attributes(node)
        .into_iter()
        .find(|(attr, _)| attr == name)
        .map(|(_, value)| value)
}
