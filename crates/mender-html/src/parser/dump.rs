//! Indented, human-readable dump of a document tree.

use core::fmt;

use mender_dom::DocumentNode;

/// Write `root` and everything below it, one node per line, two spaces of
/// indentation per level.
///
/// Tags print as `<type k="v">` with attributes sorted by name. Text prints
/// quoted, with newlines escaped and spaces shown as `·` so that whitespace
/// normalization is visible. Non-breaking spaces are shown as `⍽`.
///
/// # Errors
///
/// Propagates errors from `out`.
pub fn write_tree(out: &mut impl fmt::Write, root: &DocumentNode) -> fmt::Result {
    let mut stack = vec![(root, 0_usize)];
    while let Some((node, depth)) = stack.pop() {
        let prefix = "  ".repeat(depth);
        match node {
            DocumentNode::Tag(tag) => {
                let mut attributes: Vec<_> = tag.attributes().iter().collect();
                attributes.sort();
                write!(out, "{prefix}<{}", tag.tag_type())?;
                for (name, value) in attributes {
                    write!(out, " {name}=\"{value}\"")?;
                }
                writeln!(out, ">")?;
            }
            DocumentNode::Text(text) => {
                let display = text
                    .text()
                    .replace('\n', "\\n")
                    .replace(' ', "\u{00B7}")
                    .replace('\u{00A0}', "\u{237D}");
                writeln!(out, "{prefix}\"{display}\"")?;
            }
        }
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
    Ok(())
}

/// [`write_tree`] into a new string.
#[must_use]
pub fn tree_to_string(root: &DocumentNode) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_tree(&mut out, root);
    out
}

/// Print [`write_tree`] output to stdout.
pub fn print_tree(root: &DocumentNode) {
    print!("{}", tree_to_string(root));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_children_and_marks_spaces() {
        let root = DocumentNode::tag(
            "html",
            vec![
                DocumentNode::tag("p", vec![DocumentNode::text("a b\n")]),
                DocumentNode::tag("pre", vec![DocumentNode::text("x\u{00A0}y")]),
            ],
        );
        assert_eq!(
            tree_to_string(&root),
            "<html>\n  <p>\n    \"a\u{00B7}b\\n\"\n  <pre>\n    \"x\u{237D}y\"\n"
        );
    }
}
