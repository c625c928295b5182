//! The scanning loop that cuts markup into [`Token`]s.

use std::collections::VecDeque;

use mender_common::{ConformanceLog, ViolationKind};

use super::helpers::{find_ignore_ascii_case, is_empty_tag};
use super::token::{TagToken, Token};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const TITLE_CLOSE: &str = "</title>";

/// Lazy, single-pass tokenizer over a complete document.
///
/// Iterating yields tokens in source order. Comments and empty tags are
/// consumed without producing anything; every other byte of the input ends
/// up in exactly one token. Malformed spans are repaired on the fly and
/// recorded in [`Tokenizer::issues`].
#[derive(Debug)]
pub struct Tokenizer {
    /// Full document text.
    input: String,
    /// Byte offset of the next unread character.
    pos: usize,
    /// Tokens scanned but not yet handed out. A `<title>` produces three.
    pending: VecDeque<Token>,
    /// Lexical violations found so far.
    issues: ConformanceLog,
}

impl Tokenizer {
    /// Create a tokenizer positioned at the start of `input`.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            pos: 0,
            pending: VecDeque::new(),
            issues: ConformanceLog::new(),
        }
    }

    /// Byte offset of the scan cursor.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Violations recorded so far.
    #[must_use]
    pub const fn issues(&self) -> &ConformanceLog {
        &self.issues
    }

    /// Move the recorded violations out, leaving the log empty.
    pub fn take_issues(&mut self) -> ConformanceLog {
        std::mem::take(&mut self.issues)
    }

    /// True while no lexical violation has been recorded.
    #[must_use]
    pub const fn is_conformant(&self) -> bool {
        self.issues.is_conformant()
    }

    /// Scan one construct starting at the cursor, queueing any tokens it
    /// produces. Always advances the cursor.
    fn scan_next(&mut self) {
        if !self.input[self.pos..].starts_with('<') {
            self.consume_text();
        } else if self.input[self.pos..].starts_with(COMMENT_OPEN) {
            self.consume_comment();
        } else {
            self.consume_tag();
        }
    }

    /// Text runs up to the next `<` or the end of input.
    fn consume_text(&mut self) {
        let start = self.pos;
        let end = self.input[start..]
            .find('<')
            .map_or(self.input.len(), |offset| start + offset);
        self.pos = end;
        self.pending
            .push_back(Token::Text(self.input[start..end].to_string()));
    }

    /// Skip a comment. The search for `-->` begins after `<!--`, so `<!-->`
    /// does not close itself.
    fn consume_comment(&mut self) {
        let body = self.pos + COMMENT_OPEN.len();
        if let Some(offset) = self.input[body..].find(COMMENT_CLOSE) {
            self.pos = body + offset + COMMENT_CLOSE.len();
        } else {
            self.issues.record(
                ViolationKind::UnterminatedComment,
                "comment does not terminate, treating rest of document as comment",
            );
            self.pos = self.input.len();
        }
    }

    /// Consume one tag, repairing a missing `>`.
    fn consume_tag(&mut self) {
        let start = self.pos;
        let after = start + 1;
        let next_open = self.input[after..]
            .find('<')
            .map_or(self.input.len(), |offset| after + offset);
        let tag_end = self.input[after..next_open]
            .find('>')
            .map(|offset| after + offset);

        let raw = match tag_end {
            Some(end) => {
                self.pos = end + 1;
                self.input[start..=end].to_string()
            }
            _ => {
                let raw = format!("{}>", &self.input[start..next_open]);
                let place = if next_open < self.input.len() {
                    "before next tag"
                } else {
                    "before end of document"
                };
                self.issues.record(
                    ViolationKind::UnterminatedTag,
                    format!("tag {raw} does not close {place}"),
                );
                self.pos = next_open;
                raw
            }
        };

        if is_empty_tag(&raw) {
            self.issues
                .record(ViolationKind::EmptyTag, format!("empty tag {raw} discarded"));
            return;
        }
        let Some(tag) = TagToken::from_markup(raw.as_str()) else {
            self.issues.record(
                ViolationKind::EmptyTag,
                format!("tag {raw} has no name, discarded"),
            );
            return;
        };

        let is_title = tag.name() == "title";
        self.pending.push_back(Token::Tag(tag));
        if is_title {
            self.consume_title_text();
        }
    }

    /// Everything up to `</title>` is text, markup included.
    fn consume_title_text(&mut self) {
        let start = self.pos;
        let end = if let Some(offset) = find_ignore_ascii_case(&self.input[start..], TITLE_CLOSE)
        {
            self.pos = start + offset + TITLE_CLOSE.len();
            start + offset
        } else {
            self.issues.record(
                ViolationKind::UnterminatedTitle,
                "title tag does not end, treating rest of document as title",
            );
            self.pos = self.input.len();
            self.input.len()
        };
        self.pending
            .push_back(Token::Text(self.input[start..end].to_string()));
        self.pending.push_back(Token::Tag(TagToken::end("title")));
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.pos >= self.input.len() {
                return None;
            }
            self.scan_next();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reaches_end() {
        let mut tokenizer = Tokenizer::new("<p>hi</p>");
        let count = tokenizer.by_ref().count();
        assert_eq!(count, 3);
        assert_eq!(tokenizer.position(), 9);
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn take_issues_empties_log() {
        let mut tokenizer = Tokenizer::new("<>");
        assert!(tokenizer.next().is_none());
        let issues = tokenizer.take_issues();
        assert_eq!(issues.count(ViolationKind::EmptyTag), 1);
        assert!(tokenizer.issues().is_empty());
    }
}
