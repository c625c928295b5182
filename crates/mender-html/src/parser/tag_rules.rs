//! Static tag classification tables.
//!
//! Each known tag name belongs to exactly one behaviour category. Names not
//! listed anywhere are [`TagCategory::Unknown`] and are treated as ordinary
//! containers by the tree builder.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Document scaffolding tags. Their start and end tags are dropped.
pub const IGNORED_TAGS: &[&str] = &["html", "body", "head"];

/// Tags placed under the lazily created `head` node.
pub const HEAD_TAGS: &[&str] = &["title"];

/// Tags repaired by the table algorithm. Also the set under which a lone
/// space is dropped.
pub const TABLE_TAGS: &[&str] = &["table", "tr", "td"];

/// Tags repaired by the list algorithm.
pub const LIST_TAGS: &[&str] = &["li", "ol", "ul"];

/// Containers that may nest inside themselves.
pub const NESTABLE_TAGS: &[&str] = &["b", "i", "strong", "em", "pre"];

/// Containers that may not directly nest inside themselves.
pub const SINGLY_NESTABLE_TAGS: &[&str] = &["p"];

/// Tags that never have children and are never pushed.
pub const LEAF_TAGS: &[&str] = &["br", "img", "hr"];

/// Behaviour category of a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TagCategory {
    /// `html`, `body`, `head`.
    Ignored,
    /// `title`.
    Head,
    /// `table`, `tr`, `td`.
    Table,
    /// `li`, `ol`, `ul`.
    List,
    /// `b`, `i`, `strong`, `em`, `pre`.
    Nestable,
    /// `p`.
    SinglyNestable,
    /// `br`, `img`, `hr`.
    Leaf,
    /// Anything else.
    Unknown,
}

impl TagCategory {
    /// Classify a lower-cased tag name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        Self::iter()
            .find(|category| category.members().contains(&name))
            .unwrap_or(Self::Unknown)
    }

    /// The names belonging to this category; empty for [`Self::Unknown`].
    #[must_use]
    pub const fn members(self) -> &'static [&'static str] {
        match self {
            Self::Ignored => IGNORED_TAGS,
            Self::Head => HEAD_TAGS,
            Self::Table => TABLE_TAGS,
            Self::List => LIST_TAGS,
            Self::Nestable => NESTABLE_TAGS,
            Self::SinglyNestable => SINGLY_NESTABLE_TAGS,
            Self::Leaf => LEAF_TAGS,
            Self::Unknown => &[],
        }
    }
}

/// `table` or `tr`: places where content other than a cell may not go.
#[must_use]
pub fn is_table_container(name: &str) -> bool {
    matches!(name, "table" | "tr")
}

/// `table`, `tr` or `td`: places where a lone space is dropped.
#[must_use]
pub fn is_table_structure(name: &str) -> bool {
    TABLE_TAGS.contains(&name)
}
