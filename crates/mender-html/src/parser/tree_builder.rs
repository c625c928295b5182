//! Error-correcting tree construction.

use mender_common::{ConformanceLog, ViolationKind};
use mender_dom::{AttributesMap, DocumentNode, DomTree, NodeId};

use super::tag_rules::{TagCategory, is_table_container, is_table_structure};
use crate::tokenizer::helpers::is_markup_whitespace;
use crate::tokenizer::{TagToken, Token, Tokenizer};

/// Type of the root element every parse starts from.
pub const ROOT_TAG: &str = "html";

/// Builds a document tree from a token stream.
///
/// Nothing is ever rejected. Misplaced table content is wrapped in synthetic
/// `table`/`tr`/`td` elements, list items without a list get a `ul`, and
/// stray end tags unwind the stack of open elements to the nearest match. Each
/// repair is recorded in the conformance log.
#[derive(Debug)]
pub struct Parser {
    /// Source of tokens. Consumed once.
    tokenizer: Tokenizer,

    /// Arena the document is built in. The root is `<html>`.
    tree: DomTree,

    /// Stack of open elements. Index 0 is the root, which is never popped;
    /// the last entry is where new content goes.
    open_elements: Vec<NodeId>,

    /// The `head` element, created the first time a head tag appears.
    head: Option<NodeId>,

    /// Lexical and structural violations, in the order they occurred.
    issues: ConformanceLog,
}

/// Result of a parse: the finished tree and what had to be repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTree {
    root: DocumentNode,
    issues: ConformanceLog,
}

impl ParsedTree {
    /// The `<html>` root node.
    #[must_use]
    pub const fn root(&self) -> &DocumentNode {
        &self.root
    }

    /// Violations recorded during tokenizing and tree building.
    #[must_use]
    pub const fn issues(&self) -> &ConformanceLog {
        &self.issues
    }

    /// True if the input needed no repair at all.
    #[must_use]
    pub const fn is_conformant(&self) -> bool {
        self.issues.is_conformant()
    }

    /// Split into the root node and the log.
    #[must_use]
    pub fn into_parts(self) -> (DocumentNode, ConformanceLog) {
        (self.root, self.issues)
    }
}

impl Parser {
    /// Create a parser over the complete text of a document.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self::from_tokenizer(Tokenizer::new(input))
    }

    /// Create a parser reading from an existing tokenizer.
    ///
    /// Violations the tokenizer has already recorded carry over.
    #[must_use]
    pub fn from_tokenizer(tokenizer: Tokenizer) -> Self {
        Self {
            tokenizer,
            tree: DomTree::new(ROOT_TAG),
            open_elements: vec![NodeId::ROOT],
            head: None,
            issues: ConformanceLog::new(),
        }
    }

    /// Parse the whole input into an owned document tree.
    #[must_use]
    pub fn run(self) -> ParsedTree {
        let (tree, issues) = self.run_with_arena();
        ParsedTree {
            root: tree.into_document_node(),
            issues,
        }
    }

    /// Parse the whole input, returning the arena itself.
    #[must_use]
    pub fn run_with_arena(mut self) -> (DomTree, ConformanceLog) {
        while let Some(token) = self.tokenizer.next() {
            self.issues.absorb(&mut self.tokenizer.take_issues());
            self.process_token(token);
        }
        self.issues.absorb(&mut self.tokenizer.take_issues());
        self.close_unclosed_elements();

        log::debug!(
            "parsed {} nodes, {} conformance issue(s)",
            self.tree.len(),
            self.issues.len()
        );
        (self.tree, self.issues)
    }

    // =========================================================================
    // Stack of open elements
    // =========================================================================

    /// Where new content is inserted.
    fn current_node(&self) -> NodeId {
        self.open_elements.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn current_type(&self) -> &str {
        self.tree.tag_type(self.current_node()).unwrap_or_default()
    }

    fn current_is(&self, tag_type: &str) -> bool {
        self.current_type() == tag_type
    }

    /// True if any open element is a `pre`.
    fn in_preformatted(&self) -> bool {
        self.open_elements
            .iter()
            .any(|&id| self.tree.tag_type(id) == Some("pre"))
    }

    /// Append a new element under the current node and push it.
    fn open_element(&mut self, tag: TagToken) {
        let id = self.insert_element(tag);
        self.open_elements.push(id);
    }

    /// Append a new element under the current node without pushing it.
    fn insert_element(&mut self, tag: TagToken) -> NodeId {
        let (name, attributes) = tag.into_parts();
        let parent = self.current_node();
        let id = self.tree.alloc_tag(name, attributes);
        self.tree.append_child(parent, id);
        id
    }

    /// Handle an end tag named `tag_type`.
    ///
    /// A match on top of the stack just pops. Otherwise the stack is unwound
    /// down to and including the nearest open element of that type, or left
    /// alone if there is none. The root is never a candidate.
    fn close_element(&mut self, tag_type: &str) {
        if self.open_elements.len() > 1 && self.current_is(tag_type) {
            let _ = self.open_elements.pop();
            return;
        }

        let message = format!(
            "end tag </{tag_type}> does not match open <{}>",
            self.current_type()
        );
        self.issues.record(ViolationKind::MisnestedEndTag, message);

        let matched = self
            .open_elements
            .iter()
            .skip(1)
            .rposition(|&id| self.tree.tag_type(id) == Some(tag_type));
        if let Some(index) = matched {
            self.open_elements.truncate(index + 1);
        }
    }

    /// Pop everything left open when the input runs out.
    fn close_unclosed_elements(&mut self) {
        while self.open_elements.len() > 1 {
            let message = format!(
                "<{}> not closed before end of document",
                self.current_type()
            );
            self.issues.record(ViolationKind::UnclosedAtEof, message);
            let _ = self.open_elements.pop();
        }
    }

    // =========================================================================
    // Token dispatch
    // =========================================================================

    fn process_token(&mut self, token: Token) {
        match token {
            Token::Text(text) => self.process_text(&text),
            Token::Tag(tag) => self.process_tag(tag),
        }
    }

    /// STEP 1: `th` is treated as `td`.
    /// STEP 2: Scaffolding tags are dropped, start or end.
    /// STEP 3: End tags close elements.
    /// STEP 4: Start tags are routed by category. Anything that is not a head
    ///         or table tag first gets a cell if the current node is a `table`
    ///         or `tr`.
    fn process_tag(&mut self, mut tag: TagToken) {
        // STEP 1
        if tag.name() == "th" {
            tag.set_tag_name("td");
        }

        let category = TagCategory::of(tag.name());
        match category {
            // STEP 2
            TagCategory::Ignored => {}
            // STEP 3
            _ if tag.is_end_tag() => self.close_element(tag.name()),
            // STEP 4
            TagCategory::Head => self.open_head_element(tag),
            TagCategory::Table => self.open_table_element(tag),
            TagCategory::List => {
                self.ensure_cell(tag.raw());
                self.open_list_element(tag);
            }
            TagCategory::SinglyNestable => {
                self.ensure_cell(tag.raw());
                if self.open_elements.len() > 1 && self.current_is(tag.name()) {
                    self.issues.record(
                        ViolationKind::ImplicitClose,
                        format!("<{0}> inside <{0}>, closing the open one", tag.name()),
                    );
                    self.close_element(tag.name());
                }
                self.open_element(tag);
            }
            TagCategory::Leaf => {
                self.ensure_cell(tag.raw());
                let _ = self.insert_element(tag);
            }
            TagCategory::Nestable | TagCategory::Unknown => {
                self.ensure_cell(tag.raw());
                self.open_element(tag);
            }
        }
    }

    /// Text is normalized, then appended to the current node.
    ///
    /// Inside `pre` every space becomes U+00A0 and nothing else changes.
    /// Elsewhere whitespace runs collapse to one space, and a text that is
    /// only that space is dropped directly inside table structure.
    fn process_text(&mut self, text: &str) {
        let text = if self.in_preformatted() {
            text.replace(' ', "\u{00A0}")
        } else {
            let collapsed = collapse_whitespace(text);
            if collapsed == " " && is_table_structure(self.current_type()) {
                return;
            }
            collapsed
        };

        self.ensure_cell("text");
        let parent = self.current_node();
        let id = self.tree.alloc_text(text);
        self.tree.append_child(parent, id);
    }

    // =========================================================================
    // Head
    // =========================================================================

    /// Head tags go under a `head` element kept as the root's first child.
    fn open_head_element(&mut self, tag: TagToken) {
        let head = if let Some(head) = self.head {
            head
        } else {
            let head = self.tree.alloc_tag("head", AttributesMap::new());
            self.tree.insert_child(NodeId::ROOT, 0, head);
            self.head = Some(head);
            head
        };

        let (name, attributes) = tag.into_parts();
        let id = self.tree.alloc_tag(name, attributes);
        self.tree.append_child(head, id);
        self.open_elements.push(id);
    }

    // =========================================================================
    // Table repair
    // =========================================================================

    /// Open a `table`, `tr` or `td`, first synthesizing whatever ancestors
    /// it is missing: a `td` needs a `tr`, and a `tr` needs a `table`.
    fn open_table_element(&mut self, tag: TagToken) {
        let required_parent = match tag.name() {
            "td" => Some("tr"),
            "tr" => Some("table"),
            _ => None,
        };
        if let Some(parent) = required_parent
            && !self.current_is(parent)
        {
            self.issues.record(
                ViolationKind::TableRepair,
                format!(
                    "<{}> outside <{parent}>, correcting with new <{parent}>",
                    tag.name()
                ),
            );
            self.open_table_element(TagToken::start(parent));
        }
        self.open_element(tag);
    }

    /// Content other than table tags may not sit directly in a `table` or
    /// `tr`; open a cell for it.
    fn ensure_cell(&mut self, content: &str) {
        if !is_table_container(self.current_type()) {
            return;
        }
        let message = format!(
            "{content} directly inside <{}>, correcting with new <td>",
            self.current_type()
        );
        self.issues.record(ViolationKind::TableRepair, message);
        self.open_table_element(TagToken::start("td"));
    }

    // =========================================================================
    // List repair
    // =========================================================================

    /// `ol` and `ul` open anywhere. An `li` closes a directly open `li`
    /// (shorthand notation) and gets a synthetic `ul` when no list is open
    /// around it.
    fn open_list_element(&mut self, tag: TagToken) {
        if tag.name() == "li" {
            if self.current_is("li") {
                self.issues.record(
                    ViolationKind::ListRepair,
                    "shorthand list notation, closing <li>",
                );
                self.close_element("li");
            } else if !matches!(self.current_type(), "ol" | "ul") {
                self.issues.record(
                    ViolationKind::ListRepair,
                    "<li> outside a list, correcting with new <ul>",
                );
                self.open_element(TagToken::start("ul"));
            }
        }
        self.open_element(tag);
    }
}

/// Collapse every run of whitespace to a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_markup_whitespace(c) {
            if !in_run {
                collapsed.push(' ');
            }
            in_run = true;
        } else {
            collapsed.push(c);
            in_run = false;
        }
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("a \t\r\n b"), "a b");
        assert_eq!(collapse_whitespace("\n\n"), " ");
        assert_eq!(collapse_whitespace("ab"), "ab");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn root_survives_stray_html_type_end_tags() {
        let mut parser = Parser::new("");
        parser.close_element(ROOT_TAG);
        assert_eq!(parser.open_elements, vec![NodeId::ROOT]);
        assert_eq!(parser.issues.count(ViolationKind::MisnestedEndTag), 1);
    }

    #[test]
    fn unwinds_to_nearest_match() {
        let mut parser = Parser::new("");
        for name in ["b", "i", "b", "em"] {
            parser.open_element(TagToken::start(name));
        }
        parser.close_element("b");
        assert_eq!(parser.open_elements.len(), 3);
        assert_eq!(parser.current_type(), "i");
    }
}
