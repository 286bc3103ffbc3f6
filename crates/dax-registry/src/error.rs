use dax_store::StoreError;
use dax_types::{RecordKind, TypeError};

/// Errors raised by registry operations.
///
/// Any error aborts the invocation: nothing it wrote is committed and no
/// notification is emitted.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A key, or a record referenced by a foreign key, does not exist.
    #[error("{kind} {key} does not exist")]
    NotFound { kind: RecordKind, key: String },

    /// A create targeted a key that is already occupied.
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: RecordKind, key: String },

    /// An argument failed a pattern or parse check.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transaction name is not part of the contract.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// The kind does not offer the requested operation.
    #[error("{kind} does not support {operation}")]
    Unsupported {
        kind: RecordKind,
        operation: &'static str,
    },

    /// A stored value could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The ledger stub failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn already_exists(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            key: key.into(),
        }
    }

    /// Machine-checkable error code returned to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "ASSET_NOT_FOUND",
            Self::AlreadyExists { .. } => "ASSET_ALREADY_EXISTS",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            Self::Unsupported { .. } => "UNSUPPORTED_OPERATION",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Codec(_) | Self::Store(_) => "INTERNAL",
        }
    }
}

impl From<TypeError> for RegistryError {
    fn from(err: TypeError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
