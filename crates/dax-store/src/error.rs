/// Errors from ledger state operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Keys must be non-empty.
    #[error("state key must not be empty")]
    EmptyKey,

    /// Event names must be non-empty.
    #[error("event name must not be empty")]
    EmptyEventName,

    /// The requested range has its end before its start.
    #[error("invalid range: start {start:?} is after end {end:?}")]
    InvalidRange { start: String, end: String },

    /// An internal lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,

    /// Snapshot serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading or writing a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for ledger state operations.
pub type StoreResult<T> = Result<T, StoreError>;
