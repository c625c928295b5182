use std::collections::HashMap;
use std::fmt::{self, Write as _};

use serde::Serialize;

/// Map of lower-cased attribute names to values for a tag node.
pub type AttributesMap = HashMap<String, String>;

/// A node of the finished document tree.
///
/// Consumers walk this read-only. Tag types are not restricted to any known
/// set, so renderers must treat unfamiliar types as transparent containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DocumentNode {
    /// An element such as `p` or `table`.
    Tag(TagNode),
    /// A run of text.
    Text(TextNode),
}

/// An element node: a type, its attributes, and its ordered children.
///
/// `Clone`, `PartialEq` and `Drop` walk the subtree with an explicit stack, so
/// arbitrarily deep trees are safe to copy, compare, and free.
#[derive(Debug, Default, Serialize)]
pub struct TagNode {
    #[serde(rename = "type")]
    tag_type: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    attributes: AttributesMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<DocumentNode>,
}

/// A text node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextNode {
    text: String,
}

impl TagNode {
    /// Create a childless tag node with no attributes.
    #[must_use]
    pub fn new(tag_type: impl Into<String>) -> Self {
        Self::with_children(tag_type, AttributesMap::new(), Vec::new())
    }

    /// Create a tag node with the given attributes and children.
    #[must_use]
    pub fn with_children(
        tag_type: impl Into<String>,
        attributes: AttributesMap,
        children: Vec<DocumentNode>,
    ) -> Self {
        Self {
            tag_type: tag_type.into(),
            attributes,
            children,
        }
    }

    /// The tag type, e.g. `"table"`.
    #[must_use]
    pub fn tag_type(&self) -> &str {
        &self.tag_type
    }

    /// All attributes of this node.
    #[must_use]
    pub const fn attributes(&self) -> &AttributesMap {
        &self.attributes
    }

    /// Value of one attribute, or `None` if it is not set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[DocumentNode] {
        &self.children
    }
}

impl Clone for TagNode {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Enter(&'a DocumentNode),
            Exit(&'a TagNode),
        }

        // Copies land on `built` in document order; `Exit` gathers a tag's
        // children off its tail.
        let mut pending: Vec<Step<'_>> = self.children.iter().rev().map(Step::Enter).collect();
        let mut built: Vec<DocumentNode> = Vec::new();
        while let Some(step) = pending.pop() {
            match step {
                Step::Enter(DocumentNode::Text(text)) => {
                    built.push(DocumentNode::Text(text.clone()));
                }
                Step::Enter(DocumentNode::Tag(tag)) => {
                    pending.push(Step::Exit(tag));
                    pending.extend(tag.children.iter().rev().map(Step::Enter));
                }
                Step::Exit(tag) => {
                    let children = built.split_off(built.len() - tag.children.len());
                    built.push(DocumentNode::Tag(Self::with_children(
                        tag.tag_type.clone(),
                        tag.attributes.clone(),
                        children,
                    )));
                }
            }
        }
        Self::with_children(self.tag_type.clone(), self.attributes.clone(), built)
    }
}

impl PartialEq for TagNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.tag_type != right.tag_type
                || left.attributes != right.attributes
                || left.children.len() != right.children.len()
            {
                return false;
            }
            for pair in left.children.iter().zip(&right.children) {
                match pair {
                    (DocumentNode::Tag(left), DocumentNode::Tag(right)) => {
                        pending.push((left, right));
                    }
                    (DocumentNode::Text(left), DocumentNode::Text(right)) if left == right => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for TagNode {}

impl Drop for TagNode {
    fn drop(&mut self) {
        // Each node is emptied before it goes out of scope, so the
        // compiler-generated drop never recurses more than one level.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            if let DocumentNode::Tag(tag) = &mut node {
                pending.append(&mut tag.children);
            }
        }
    }
}

impl TextNode {
    /// Create a text node.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The text of this node.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl DocumentNode {
    /// Shorthand for a tag node with no attributes.
    #[must_use]
    pub fn tag(tag_type: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Tag(TagNode::with_children(tag_type, AttributesMap::new(), children))
    }

    /// Shorthand for a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode::new(text))
    }

    /// The tag node, if this is one.
    #[must_use]
    pub const fn as_tag(&self) -> Option<&TagNode> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Text(_) => None,
        }
    }

    /// The text node, if this is one.
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextNode> {
        match self {
            Self::Text(text) => Some(text),
            Self::Tag(_) => None,
        }
    }

    /// Tag type for tag nodes, `None` for text.
    #[must_use]
    pub fn tag_type(&self) -> Option<&str> {
        self.as_tag().map(TagNode::tag_type)
    }

    /// Children of a tag node; text nodes have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Tag(tag) => tag.children(),
            Self::Text(_) => &[],
        }
    }

    /// Pre-order iterator over this node and everything below it.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All text below this node, concatenated in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.descendants()
            .filter_map(Self::as_text)
            .map(TextNode::text)
            .collect()
    }

    /// Pseudo-HTML rendering for debugging.
    ///
    /// Tags print as `<type k="v">`, each child on its own `\r\n`-terminated
    /// line, then `</type>`. Text prints in square brackets so whitespace-only
    /// nodes stay visible. Attributes are sorted by name.
    #[must_use]
    pub fn to_debug_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_debug(&mut out);
        out
    }

    fn write_debug(&self, out: &mut String) -> fmt::Result {
        enum Step<'a> {
            Open(&'a DocumentNode),
            LineEnd,
            Close(&'a TagNode),
        }

        let mut pending = vec![Step::Open(self)];
        while let Some(step) = pending.pop() {
            match step {
                Step::Open(Self::Text(text)) => write!(out, "[{}]", text.text)?,
                Step::Open(Self::Tag(tag)) => {
                    write!(out, "<{}", tag.tag_type)?;
                    let mut names: Vec<&String> = tag.attributes.keys().collect();
                    names.sort();
                    for name in names {
                        write!(out, " {name}=\"{}\"", tag.attributes[name])?;
                    }
                    out.push_str(">\r\n");
                    pending.push(Step::Close(tag));
                    for child in tag.children.iter().rev() {
                        pending.push(Step::LineEnd);
                        pending.push(Step::Open(child));
                    }
                }
                Step::LineEnd => out.push_str("\r\n"),
                Step::Close(tag) => write!(out, "</{}>", tag.tag_type)?,
            }
        }
        Ok(())
    }
}

/// Iterator returned by [`DocumentNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a DocumentNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DocumentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
