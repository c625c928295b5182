//! The byte source a [`Document`](crate::Document) loads from.

use std::fs;

use mender_common::net::{fetch_bytes, fetch_bytes_from_data_url};
use mender_common::url::{Url, resolve_location};
use mender_common::{FetchError, HttpOptions};

/// Bytes read from a resolved location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    /// Where the bytes came from, after resolution.
    pub url: Url,
    /// Raw body, not yet decoded.
    pub bytes: Vec<u8>,
}

/// Anything that can turn a path into bytes.
///
/// `context` is the location of the document the path was found in, if any;
/// relative paths resolve against it.
pub trait Fetcher {
    /// Resolve and read `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] whose [`FetchError::status_code`] becomes the
    /// document's error code.
    fn fetch(&self, path: &str, context: Option<&Url>) -> Result<FetchedDocument, FetchError>;
}

/// Reads local files, `data:` URLs, and `http(s):` URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultFetcher {
    options: HttpOptions,
}

impl DefaultFetcher {
    /// A fetcher with the default timeout and User-Agent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A fetcher with custom HTTP settings.
    #[must_use]
    pub const fn with_options(options: HttpOptions) -> Self {
        Self { options }
    }

    /// HTTP settings in use.
    #[must_use]
    pub const fn options(&self) -> &HttpOptions {
        &self.options
    }
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, path: &str, context: Option<&Url>) -> Result<FetchedDocument, FetchError> {
        let url =
            resolve_location(path, context).ok_or_else(|| FetchError::NotFound(path.to_string()))?;

        let bytes = match url.scheme() {
            "file" => {
                let file = url
                    .to_file_path()
                    .map_err(|()| FetchError::NotFound(url.to_string()))?;
                fs::read(file)?
            }
            "data" => fetch_bytes_from_data_url(url.as_str())?,
            "http" | "https" => fetch_bytes(url.as_str(), &self.options)?,
            scheme => {
                return Err(FetchError::NotFound(format!(
                    "{url} (unsupported scheme `{scheme}`)"
                )));
            }
        };

        log::debug!("fetched {} bytes from {url}", bytes.len());
        Ok(FetchedDocument { url, bytes })
    }
}
