use thiserror::Error;

/// Failures surfaced by the query layer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Injected configuration is unusable (empty page-size list, even window, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Caller asked for an unsupported page size or passed a malformed filter value.
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport failure or a non-2xx response other than 401.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The list endpoint answered 401; no further fetches until reset.
    #[error("authentication expired")]
    AuthExpired,
}

impl QueryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Typed failure reported by a list-fetch collaborator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<FetchError> for QueryError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Unauthorized => QueryError::AuthExpired,
            other => QueryError::NetworkFailure(other.to_string()),
        }
    }
}
