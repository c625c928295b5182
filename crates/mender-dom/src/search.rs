//! Find-in-page over a parsed document.

use crate::DocumentNode;

/// Count case-insensitive, non-overlapping occurrences of `term` in the text
/// below `root`.
///
/// Text nodes are joined in document order before searching, so a match may
/// start in one node and finish in the next (`<b>foo</b>bar` contains
/// `"obar"`). An empty term never matches.
#[must_use]
pub fn count_matches(root: &DocumentNode, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    let term = term.to_lowercase();
    root.text_content().to_lowercase().matches(term.as_str()).count()
}
