use thiserror::Error;

use crate::kind::RecordKind;

/// Errors produced by type-level validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid {kind} key {key:?}: {reason}")]
    InvalidKey {
        kind: RecordKind,
        key: String,
        reason: String,
    },

    #[error("invalid attribute string {attribute:?}: {reason}")]
    InvalidAttribute { attribute: String, reason: String },

    #[error("unknown status value: {0}")]
    InvalidStatus(i32),

    #[error("unknown record kind: {0}")]
    UnknownKind(String),
}
