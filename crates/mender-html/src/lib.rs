//! Lenient tokenizer and tree builder for a small HTML subset.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** ([`tokenizer`])
//!   - Text runs and tags, comments skipped
//!   - Raw text inside `<title>`
//!   - Repair of unclosed tags, removal of empty tags
//!   - `key=value` attributes, quoted or bare
//!
//! - **Tree Builder** ([`parser`])
//!   - Stack of open elements rooted at `<html>`
//!   - Table repair (`td` needs `tr` needs `table`)
//!   - List repair (`li` needs `ol`/`ul`, shorthand `li` closing)
//!   - Implicit `p` closing and end tag unwinding
//!   - Whitespace collapsing, preformatted text in `pre`
//!
//! Malformed input never fails. Every repair is recorded as a
//! [`mender_common::ConformanceIssue`] and the document is reported as
//! non-conformant.
//!
//! # Not Implemented
//!
//! - Character entity resolution (entities stay in text verbatim)
//! - Scripting and styling

/// Tree construction.
pub mod parser;
/// Tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{ParsedTree, Parser, TagCategory, print_tree, tree_to_string, write_tree};
pub use tokenizer::{TagToken, Token, TokenKind, Tokenizer};

/// Parse a complete document.
#[must_use]
pub fn parse(input: &str) -> ParsedTree {
    Parser::new(input).run()
}
