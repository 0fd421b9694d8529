use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The adapter could not reach its backend.
    Unavailable(String),
    /// The backend rejected the filter or pipeline it was given.
    InvalidFilter(String),
    /// Any other adapter failure.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "datastore unavailable: {msg}"),
            StoreError::InvalidFilter(msg) => write!(f, "invalid filter: {msg}"),
            StoreError::Backend(msg) => write!(f, "datastore error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
