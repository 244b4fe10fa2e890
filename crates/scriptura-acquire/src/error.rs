use reqwest::StatusCode;
use thiserror::Error;

/// Errors from fetching a chapter page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("timeout fetching {url}")]
    Timeout { url: String },

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors from extracting verses out of chapter markup.
///
/// `ContainerMissing` means the page no longer has the documented shape and
/// the extraction selectors need attention, not just this one chapter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("verse container not found in chapter markup")]
    ContainerMissing,

    #[error("chapter markup yielded no verses")]
    NoVerses,
}

/// Per-unit error recorded in the run summary.
///
/// None of these propagate past the work unit that produced them; the
/// orchestrator captures them and the run continues.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to write chapter document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize chapter document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AcquireError {
    /// True for failures of the local environment (disk, serialization)
    /// rather than the remote source. These get logged distinctly.
    pub fn is_local(&self) -> bool {
        matches!(self, AcquireError::Io(_) | AcquireError::Serialize(_))
    }
}

/// Classifies errors as transient (worth retrying) or permanent.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for FetchError {
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            // 5xx and rate-limiting are transient; other 4xx are permanent
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::Network { source, .. } => source.is_timeout() || source.is_connect(),
        }
    }
}
