use thiserror::Error;

/// Failures talking to the remote category backend.
///
/// Callers collapse every variant into one user-facing message; the detail
/// only reaches the logs.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The backend returned a non-2xx status code.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The backend answered without an explicit success indicator.
    #[error("backend rejected `{0}`")]
    Rejected(&'static str),
    /// The response body did not have the expected shape.
    #[error("unexpected backend response: {0}")]
    UnexpectedResponse(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
