use std::path::PathBuf;
use thiserror::Error;

/// Outcome classes of a single YouTube Data API call.
///
/// The HTTP client classifies every failed response exactly once; retry and
/// rotation logic only ever branches on these variants.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("quota exceeded for the current API key")]
    QuotaExceeded,
    #[error("resource not found")]
    NotFound,
    #[error("every API key hit its quota")]
    KeysExhausted,
    #[error("api error {status}: {message}")]
    Other { status: u16, message: String },
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Built with the request URL stripped: the key travels in the query.
    #[error("http error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("json error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ApiError::QuotaExceeded)
    }
}

/// Problems that stop a run before the first network call.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot read API key file {path}: {source}")]
    CredentialsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("API key file {path} contains no keys")]
    EmptyCredentialPool { path: PathBuf },
    #[error("cannot read genre mapping {path}: {source}")]
    GenreMappingUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid genre mapping {path}: {reason}")]
    InvalidGenreMapping { path: PathBuf, reason: String },
}
