//! Tree construction.
//!
//! The parser pulls tokens from the tokenizer and builds the document in an
//! arena, repairing structure as it goes. Which repair applies to a tag is
//! decided by the static tables in [`tag_rules`].

/// Indented tree dumps.
pub mod dump;
/// Tag classification tables.
pub mod tag_rules;
/// The error-correcting tree builder.
pub mod tree_builder;

pub use dump::{print_tree, tree_to_string, write_tree};
pub use tag_rules::TagCategory;
pub use tree_builder::{ParsedTree, Parser, ROOT_TAG};
