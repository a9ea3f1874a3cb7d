use thiserror::Error;

/// Errors that can occur when interacting with the booking store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage failed.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for booking store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
