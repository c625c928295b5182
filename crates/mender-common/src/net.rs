//! Byte fetching for the document loader.
//!
//! Provides a blocking HTTP GET wrapper, `data:` URL decoding, and the
//! [`FetchError`] type whose [`FetchError::status_code`] is what a failed load
//! reports to the rest of the engine.
use base64::Engine;
use percent_encoding::percent_decode_str;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// User-Agent header sent with all requests.
///
/// Presents as a generic browser so servers don't treat us as a bot.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Default request timeout.
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Status reported when a location cannot be resolved or read.
pub const STATUS_NOT_FOUND: u16 = 404;

/// Status reported when a request times out.
pub const STATUS_TIMEOUT: u16 = 408;

/// Why a document could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The path could not be resolved to a readable location.
    #[error("could not resolve location `{0}`")]
    NotFound(String),
    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The server answered with a non-success status.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),
    /// A `data:` URL could not be decoded.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
}

impl FetchError {
    /// Integer status for this failure: 408 for timeouts, the server's status
    /// for HTTP errors, 404 for everything else.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Timeout(_) => STATUS_TIMEOUT,
            Self::Http(status) => *status,
            Self::Io(err) => {
                if err.kind() == io::ErrorKind::TimedOut {
                    STATUS_TIMEOUT
                } else {
                    STATUS_NOT_FOUND
                }
            }
            Self::NotFound(_) | Self::Request(_) | Self::DataUrl(_) => STATUS_NOT_FOUND,
        }
    }
}

/// Settings for HTTP fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// A parsed `data:` URL that can be decoded into raw bytes.
pub struct DataURL {
    /// The full raw `data:` URL string (e.g. `data:text/html;base64,...`).
    pub raw_data: String,
}

impl DataURL {
    /// Create a new `DataURL` from a raw data URL string.
    #[must_use]
    pub const fn new(raw_data: String) -> Self {
        Self { raw_data }
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// The payload is percent-decoded first, then base64-decoded if the
    /// metadata ends in `;base64`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the comma separator is missing or
    /// base64 decoding fails.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let data_url = self.raw_data.trim_start_matches("data:");
        let Some((metadata, data)) = data_url.split_once(',') else {
            return Err(FetchError::DataUrl("missing comma".to_string()));
        };

        let data: Vec<u8> = percent_decode_str(data).collect();
        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Ok(data)
        }
    }
}

/// Fetch a URL and return its body as raw bytes.
///
/// # Errors
///
/// Returns [`FetchError::Timeout`] if the request times out,
/// [`FetchError::Http`] for a non-success status, and
/// [`FetchError::Request`] if the client cannot be built or the request or
/// body read fails for any other reason.
pub fn fetch_bytes(url: &str, options: &HttpOptions) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(|e| FetchError::Request(format!("failed to create HTTP client: {e}")))?;

    let response = client
        .get(url)
        .header("User-Agent", options.user_agent.as_str())
        .send()
        .map_err(request_error)?;

    if !response.status().is_success() {
        return Err(FetchError::Http(response.status().as_u16()));
    }

    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(request_error)
}

/// Decode a `data:` URL and return its payload as raw bytes.
///
/// # Errors
///
/// Returns [`FetchError::DataUrl`] if `url` is not a `data:` URL or cannot be
/// decoded.
pub fn fetch_bytes_from_data_url(url: &str) -> Result<Vec<u8>, FetchError> {
    if !url.starts_with("data:") {
        return Err(FetchError::DataUrl(format!("not a data URL: {url}")));
    }
    DataURL::new(url.to_string()).decode()
}

fn request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else {
        FetchError::Request(err.to_string())
    }
}
