//! Common utilities for the mender markup engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Conformance Channel** - records every recovery applied to malformed markup
//! - **Fetch** - reading documents from disk, `data:` URLs, or over HTTP
//! - **Location Resolution** - turning a user-supplied path into a fetchable URL

pub mod conformance;
pub mod net;
pub mod url;

pub use conformance::{ConformanceIssue, ConformanceLog, ViolationKind};
pub use net::{FetchError, HttpOptions};
