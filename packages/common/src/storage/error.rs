use std::fmt;

/// Errors that can occur during object storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// The requested key was not found. An expected condition; never logged
    /// at the gateway.
    NotFound(String),
    /// Any other transport or service failure. The full cause is logged at
    /// the point of translation; callers only see this sanitized form.
    Access(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "object not found: {key}"),
            Self::Access(detail) => write!(f, "object storage access failed: {detail}"),
        }
    }
}

impl std::error::Error for StorageError {}
