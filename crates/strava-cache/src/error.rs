use thiserror::Error;

/// Main error type for strava-cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Not authenticated. Provide a valid access token in the token file.")]
    NotAuthenticated,

    #[error("Rate limited by the Strava API. Please wait before retrying.")]
    RateLimited,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage file exists but could not be read: {0}")]
    StorageRead(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Fetch failed: {0}")]
    SourceFetch(String),

    #[error("Activity {activity_id} has an empty telemetry stream")]
    EmptyStream { activity_id: i64 },

    #[error("Normalization error: {0}")]
    Normalization(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;

impl CacheError {
    /// Create a configuration error from a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a fatal storage-read error from a message
    pub fn storage_read(msg: impl Into<String>) -> Self {
        Self::StorageRead(msg.into())
    }

    /// Create a storage error from a message
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid response error from a message
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a normalization error from a message
    pub fn normalization(msg: impl Into<String>) -> Self {
        Self::Normalization(msg.into())
    }

    /// Reason category for a per-activity skip log line.
    ///
    /// Every error a telemetry fetch or normalization can produce maps to one
    /// of these; storage errors never go through the skip path.
    pub fn skip_reason(&self) -> &'static str {
        match self {
            Self::EmptyStream { .. } => "empty stream",
            Self::Normalization(_) | Self::Json(_) | Self::InvalidResponse(_) => "normalization",
            _ => "fetch",
        }
    }
}
