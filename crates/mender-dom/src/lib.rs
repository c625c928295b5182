//! Document tree for the mender parser.
//!
//! Two representations live here:
//!
//! - [`DomTree`], an arena with [`NodeId`] indices. The tree builder grows
//!   this while it parses, because the stack of open elements needs cheap
//!   handles to nodes that are still receiving children.
//! - [`DocumentNode`], the finished, owned tree handed to consumers. Each node
//!   exclusively owns its children, and the root is always a `html` tag node.
//!
//! [`DomTree::into_document_node`] converts the first into the second once
//! parsing is done.

mod node;
pub mod search;
mod tree;

pub use node::{AttributesMap, Descendants, DocumentNode, TagNode, TextNode};
pub use tree::{DomTree, Node, NodeData, NodeId};
