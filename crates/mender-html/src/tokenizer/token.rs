//! Tokens produced by the tokenizer.

use core::fmt;

use mender_dom::AttributesMap;
use strum_macros::Display;

use super::helpers::{end_slash_precedes_name, scan_attributes, tag_name_of};

/// Which of the two lexical units a [`Token`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    /// A run of character data.
    Text,
    /// A start or end tag.
    Tag,
}

/// One lexical unit produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Raw text between tags. Entities are left unresolved.
    Text(String),
    /// A start or end tag.
    Tag(TagToken),
}

impl Token {
    /// The kind of this token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Text(_) => TokenKind::Text,
            Self::Tag(_) => TokenKind::Tag,
        }
    }

    /// Source text: the text run itself, or a tag's full original markup.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Tag(tag) => tag.raw(),
        }
    }

    /// The tag, if this is a tag token.
    #[must_use]
    pub const fn as_tag(&self) -> Option<&TagToken> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Text(_) => None,
        }
    }

    /// Mutable access to the tag, if this is a tag token.
    pub const fn as_tag_mut(&mut self) -> Option<&mut TagToken> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Text(_) => None,
        }
    }

    /// Lower-cased tag name; `None` for text.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.as_tag().map(TagToken::name)
    }

    /// True for an end tag.
    #[must_use]
    pub fn is_end_tag(&self) -> bool {
        self.as_tag().is_some_and(TagToken::is_end_tag)
    }

    /// True for a start tag. Text tokens are neither.
    #[must_use]
    pub fn is_start_tag(&self) -> bool {
        self.as_tag().is_some_and(TagToken::is_start_tag)
    }

    /// Attributes of a tag; `None` for text.
    #[must_use]
    pub fn attributes(&self) -> Option<&AttributesMap> {
        self.as_tag().map(TagToken::attributes)
    }

    /// True if this is a tag with at least one attribute.
    #[must_use]
    pub fn has_attributes(&self) -> bool {
        self.as_tag().is_some_and(TagToken::has_attributes)
    }

    /// Full original markup of a tag; `None` for text.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.as_tag().map(TagToken::raw)
    }

    /// Rename a tag token. Text tokens are left alone.
    pub fn set_tag_name(&mut self, name: &str) {
        if let Some(tag) = self.as_tag_mut() {
            tag.set_tag_name(name);
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A start or end tag with its parsed name and attributes.
///
/// The name and end-tag flag are derived once, from the raw markup, when the
/// token is built. [`TagToken::set_tag_name`] is the only way to change the
/// name afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    name: String,
    is_end: bool,
    attributes: AttributesMap,
    raw: String,
}

impl TagToken {
    /// Classify the full markup of a tag, e.g. `<a href="x">` or `</b>`.
    ///
    /// # Algorithm
    ///
    /// STEP 1: The name is the first run of word characters (ASCII letters,
    /// digits, `_`, `:` and `-`), lower-cased.
    ///
    /// STEP 2: If the name directly follows `<` and is followed by whitespace,
    /// the rest of the tag is scanned for `key=value` pairs. Values may be
    /// double-quoted, single-quoted, or bare. Keys are lower-cased and a
    /// repeated key keeps its last value.
    ///
    /// STEP 3: It is an end tag if the first `/` in the markup comes before
    /// the first occurrence of the name. `<br/>` is therefore a start tag.
    ///
    /// Returns `None` if the markup contains no word character at all.
    #[must_use]
    pub fn from_markup(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        // STEP 1
        let name = tag_name_of(&raw)?;
        // STEP 2
        let attributes = scan_attributes(&raw);
        // STEP 3
        let is_end = end_slash_precedes_name(&raw, &name);
        Some(Self {
            name,
            is_end,
            attributes,
            raw,
        })
    }

    /// A synthesized `<name>` start tag with no attributes.
    #[must_use]
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_end: false,
            attributes: AttributesMap::new(),
            raw: format!("<{name}>"),
        }
    }

    /// A synthesized `</name>` end tag.
    #[must_use]
    pub fn end(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_end: true,
            attributes: AttributesMap::new(),
            raw: format!("</{name}>"),
        }
    }

    /// Lower-cased tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the tag without re-reading the raw markup.
    ///
    /// Used to fold `th` into `td` before classification.
    pub fn set_tag_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// True for `</name>`.
    #[must_use]
    pub const fn is_end_tag(&self) -> bool {
        self.is_end
    }

    /// True for anything that is not an end tag.
    #[must_use]
    pub const fn is_start_tag(&self) -> bool {
        !self.is_end
    }

    /// Parsed attributes.
    #[must_use]
    pub const fn attributes(&self) -> &AttributesMap {
        &self.attributes
    }

    /// True if at least one attribute was parsed.
    #[must_use]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// The tag's original markup, `<` through `>`.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Split into name and attributes, dropping the raw markup.
    #[must_use]
    pub fn into_parts(self) -> (String, AttributesMap) {
        (self.name, self.attributes)
    }
}
