use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid date: `{input}`")]
    InvalidDate { input: String },

    #[error("invalid time of day: `{input}`")]
    InvalidTime { input: String },

    #[error("unknown zoom level: `{0}`")]
    UnknownZoomLevel(String),

    #[error("unknown view mode: `{0}`")]
    UnknownViewMode(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Failures reported by a key-value storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded writing `{key}`: needed {needed} bytes, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },
}

impl StorageError {
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}
