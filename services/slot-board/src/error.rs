//! Error types for the slot board service

/// Errors that can occur in the slot board service
#[derive(Debug, thiserror::Error)]
pub enum SlotBoardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for slot board operations
pub type Result<T> = std::result::Result<T, SlotBoardError>;
