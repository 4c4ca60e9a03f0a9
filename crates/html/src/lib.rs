#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]
//! DOM substrate for page scripts: an arena-backed node tree, the batched
//! update model used to mutate it, and HTML parsing into that tree.

pub mod dom;
pub mod parser;

pub use dom::{DOM, DOMMirror, DOMNode, DOMSubscriber, DOMUpdate, NodeKind};
pub use indextree::NodeId;
pub use parser::parse_html;
