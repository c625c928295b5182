//! Conformance violations with log output.
//!
//! The tokenizer and the tree builder never reject markup. Whenever either one
//! has to repair its input it appends a [`ConformanceIssue`] to a
//! [`ConformanceLog`]; a document is conformant exactly when its log is empty.
//! Each record is mirrored to the [`LOG_TARGET`] log target at `warn` level.

use std::fmt;

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

/// Log target used for every recorded violation.
pub const LOG_TARGET: &str = "mender::conformance";

/// The recovery rule that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// `<!--` without a matching `-->`; the rest of the input is a comment.
    UnterminatedComment,
    /// A tag with no `>` before the next `<` or the end of input.
    UnterminatedTag,
    /// `<>`, `</>` or a tag with no name at all.
    EmptyTag,
    /// `<title>` without a matching `</title>`.
    UnterminatedTitle,
    /// A `table`, `tr` or `td` was synthesized to hold misplaced content.
    TableRepair,
    /// A `ul` was synthesized or an open `li` was closed by a sibling.
    ListRepair,
    /// A singularly-nestable element was closed by another of its kind.
    ImplicitClose,
    /// An end tag that did not match the current element.
    MisnestedEndTag,
    /// An element still open when the input ran out.
    UnclosedAtEof,
}

/// One recorded violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceIssue {
    /// Which recovery rule fired.
    pub kind: ViolationKind,
    /// Human-readable description, including the offending markup where useful.
    pub message: String,
}

impl fmt::Display for ConformanceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Append-only list of violations for a single parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConformanceLog {
    issues: Vec<ConformanceIssue>,
}

impl ConformanceLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Record a violation and emit it on [`LOG_TARGET`].
    pub fn record(&mut self, kind: ViolationKind, message: impl Into<String>) {
        let message = message.into();
        log::warn!(target: LOG_TARGET, "{kind}: {message}");
        self.issues.push(ConformanceIssue { kind, message });
    }

    /// Move every issue out of `other` onto the end of this log, keeping order.
    ///
    /// Used to fold a tokenizer's log into the tree builder's. Nothing is
    /// logged again.
    pub fn absorb(&mut self, other: &mut Self) {
        self.issues.append(&mut other.issues);
    }

    /// True while no violation has been recorded.
    #[must_use]
    pub const fn is_conformant(&self) -> bool {
        self.issues.is_empty()
    }

    /// All recorded issues, in the order they occurred.
    #[must_use]
    pub fn issues(&self) -> &[ConformanceIssue] {
        &self.issues
    }

    /// Number of issues of the given kind.
    #[must_use]
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    /// Total number of recorded issues.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.issues.len()
    }

    /// Same as [`Self::is_conformant`]; provided for collection-style callers.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Consume the log, returning the issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<ConformanceIssue> {
        self.issues
    }
}
