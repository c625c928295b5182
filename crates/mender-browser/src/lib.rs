//! High-level document API for mender.
//!
//! # Scope
//!
//! This crate provides:
//! - **Fetching** - the [`Fetcher`] seam and a [`DefaultFetcher`] for files,
//!   `data:` URLs, and HTTP
//! - **Document Loading** - fetch, decode, and parse into a [`Document`]
//! - **Error Pages** - a failed fetch still yields a parsed document that
//!   describes the failure
//!
//! # Not Yet Implemented
//!
//! - Charset detection (bodies are decoded as UTF-8, lossily)
//! - Layout and rendering

pub mod fetch;

pub use mender_common as common;
pub use mender_dom as dom;
pub use mender_html as html;

pub use fetch::{DefaultFetcher, FetchedDocument, Fetcher};

use mender_common::url::Url;
use mender_common::{ConformanceIssue, ConformanceLog};
use mender_dom::DocumentNode;
use mender_dom::search::count_matches;

/// Title of the page shown when a document cannot be fetched.
pub const ERROR_PAGE_TITLE: &str = "Error retrieving document";

/// A loaded and parsed document.
///
/// Built once per load and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The path as given by the caller.
    path: String,
    /// Where the bytes came from; `None` for markup and failed fetches.
    url: Option<Url>,
    /// Root of the parsed tree, always an `html` tag node.
    node_tree: DocumentNode,
    /// Repairs made while parsing.
    issues: ConformanceLog,
    /// Fetch status: 0 on success, otherwise e.g. 404 or 408.
    error_code: u16,
}

impl Document {
    /// Fetch `path` and parse it.
    ///
    /// A failed fetch is not an error here: the document becomes a small
    /// generated page naming the path and the status code, and
    /// [`Document::error_code`] reports the status.
    #[must_use]
    pub fn load(path: &str, context: Option<&Url>, fetcher: &(impl Fetcher + ?Sized)) -> Self {
        log::info!("Loading {path}");
        let (url, text, error_code) = match fetcher.fetch(path, context) {
            Ok(fetched) => {
                let text = String::from_utf8_lossy(&fetched.bytes).into_owned();
                (Some(fetched.url), text, 0)
            }
            Err(err) => {
                let code = err.status_code();
                log::warn!("Failed to load {path}: {err}");
                (None, error_page(path, code), code)
            }
        };
        Self::parse(path.to_string(), url, &text, error_code)
    }

    /// Parse markup that is already in memory.
    #[must_use]
    pub fn from_markup(markup: &str) -> Self {
        Self::parse(String::new(), None, markup, 0)
    }

    fn parse(path: String, url: Option<Url>, text: &str, error_code: u16) -> Self {
        let (node_tree, issues) = mender_html::parse(text).into_parts();
        if !issues.is_conformant() {
            log::info!("{} conformance issue(s) in {path}", issues.len());
        }
        Self {
            path,
            url,
            node_tree,
            issues,
            error_code,
        }
    }

    /// The path this document was loaded from, as given.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolved location, if the fetch succeeded.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Root of the parsed tree.
    #[must_use]
    pub const fn node_tree(&self) -> &DocumentNode {
        &self.node_tree
    }

    /// True if the markup needed no repair.
    #[must_use]
    pub const fn is_conformant(&self) -> bool {
        self.issues.is_conformant()
    }

    /// Every repair made while parsing, in source order.
    #[must_use]
    pub fn issues(&self) -> &[ConformanceIssue] {
        self.issues.issues()
    }

    /// Fetch status: 0 if the document was read, otherwise the failure code.
    #[must_use]
    pub const fn error_code(&self) -> u16 {
        self.error_code
    }

    /// Text of the first `title` element, if any.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.node_tree
            .descendants()
            .find(|node| node.tag_type() == Some("title"))
            .map(DocumentNode::text_content)
    }

    /// Case-insensitive count of `term` in the document's text.
    #[must_use]
    pub fn count_matches(&self, term: &str) -> usize {
        count_matches(&self.node_tree, term)
    }
}

/// Markup shown in place of a document that could not be fetched.
#[must_use]
pub fn error_page(path: &str, code: u16) -> String {
    format!("<title>{ERROR_PAGE_TITLE}</title><pre>{path}</pre>Error {code}")
}
