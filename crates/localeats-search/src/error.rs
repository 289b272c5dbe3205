use std::path::PathBuf;

use thiserror::Error;

/// Transport-level failures talking to the search proxy, the business-search
/// API or the reverse geocoder.
///
/// None of these reach presentation: the orchestrator turns them into
/// [`localeats_core::SearchOutcome::UpstreamError`].
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by upstream (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("search proxy rejected the request: {message}")]
    ProxyRejected { message: String },

    #[error("refusing to request \"{url}\": not under the configured search endpoint")]
    InvalidEndpoint { url: String },

    #[error("reverse geocoding failed: {0}")]
    Geocode(String),
}

/// Failures reading or writing the saved client state file.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejected page-jump input. Rendered inline; search results are untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JumpError {
    #[error("\"{input}\" is not a page number")]
    NotANumber { input: String },

    #[error("page is out of range, there are {required_pages} pages")]
    OutOfRange { required_pages: u32 },
}
