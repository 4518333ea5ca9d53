//! Error types for permsync

use std::fmt;

/// The main error type for permsync operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermsyncError {
    /// Malformed input to discovery or synchronization
    Config(String),
    /// A controller root has nothing registered under it
    Discovery(String),
    /// A record failed validation or the storage layer rejected it
    Persistence(String),
    /// The configured identity indirection produced an unusable value
    Identity(String),
}

impl fmt::Display for PermsyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermsyncError::Config(m) => write!(f, "config error: {}", m),
            PermsyncError::Discovery(m) => write!(f, "discovery error: {}", m),
            PermsyncError::Persistence(m) => write!(f, "persistence error: {}", m),
            PermsyncError::Identity(m) => write!(f, "identity error: {}", m),
        }
    }
}

impl std::error::Error for PermsyncError {}

/// Result type alias for permsync operations
pub type Result<T> = std::result::Result<T, PermsyncError>;

/// Convert a storage-layer error to a persistence error
pub fn err<E: std::error::Error>(e: E) -> PermsyncError {
    PermsyncError::Persistence(e.to_string())
}
