use thiserror::Error;

/// Application-wide error types for Biblio.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request returned a non-success status or a malformed response.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error while fetching a page.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// A category name with no matching stored record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A save hit a uniqueness constraint (concurrent crawl of the same URL).
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// The pacing pause was cancelled before it elapsed.
    #[error("Crawl interrupted")]
    Interrupted,

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Configuration error (missing/invalid environment).
    #[error("Config error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error came from the transport layer.
    ///
    /// A full crawl absorbs transport failures per category (log and move
    /// on); every other error aborts the run.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::NetworkError(_) | AppError::Timeout(_)
        )
    }
}
