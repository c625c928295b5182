//! Tokenizer module.
//!
//! Splits markup into text runs and tags. Comments are skipped, `<title>`
//! content is read as raw text, and unclosed or empty tags are repaired or
//! dropped with a recorded violation. The tokenizer knows nothing about
//! document structure.

/// Pattern helpers for tag markup.
pub mod helpers;
/// The scanning iterator.
pub mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use scanner::Tokenizer;
pub use token::{TagToken, Token, TokenKind};
