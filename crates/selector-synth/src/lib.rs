//! Selector synthesis & ranking
//!
//! Given one target node in a queryable document tree, produce a short,
//! ranked list of selector expressions that:
//! - uniquely identify the node at generation time
//! - avoid framework-generated ids, hashed classes and volatile attributes
//! - are ordered by estimated long-term stability
//!
//! The tree is reached through [`DomTree`]; the `html` feature (on by
//! default) provides a `scraper`-backed implementation in [`html`].

pub mod classifier;
pub mod dedup;
pub mod engine;
pub mod errors;
pub mod escape;
pub mod evaluator;
#[cfg(feature = "html")]
pub mod html;
pub mod path;
pub mod patterns;
pub mod rank;
pub mod strategies;
pub mod tree;
pub mod types;

pub use classifier::*;
pub use engine::*;
pub use errors::*;
pub use evaluator::{Evaluation, Evaluator};
pub use path::{SelectorPath, ShapeKey};
pub use patterns::{PatternOverrides, PatternRules, PatternTable, PatternTableSpec};
pub use tree::DomTree;
pub use types::*;
