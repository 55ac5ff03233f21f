/// Error type for calls against the hosted data and auth services

/// Failure of a data service call
///
/// `Remote` is the only failure the service itself reports: any non-2xx answer, carrying the
/// raw response body. The other variants come from the transport or from decoding a 2xx body.
/// Callers are expected to treat them alike; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{body}")]
    Remote { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid collection name: '{0}'")]
    InvalidCollection(String),

    #[error("Invalid service url '{0}'")]
    InvalidUrl(String),

    /// The key is not a valid header value (control characters, stray newline)
    #[error("API key cannot be sent as a header")]
    InvalidApiKey,
}

impl DbError {
    /// HTTP status of a remote failure
    pub fn status(&self) -> Option<u16> {
        match self {
            DbError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, DbError::Remote { .. })
    }
}

pub type DbResult<T> = Result<T, DbError>;
