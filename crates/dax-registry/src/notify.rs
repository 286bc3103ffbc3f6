//! Change notifications emitted after successful writes.

use std::fmt;

use dax_store::LedgerStub;
use dax_types::Schema;

use crate::codec::RecordCodec;
use crate::error::RegistryResult;
use crate::store::RecordStore;

/// The write that produced a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "Create"),
            Self::Update => write!(f, "Update"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// A named event carrying the encoded record.
///
/// The payload is the record after the write, or before it for deletes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub name: String,
    pub payload: Vec<u8>,
}

impl Notification {
    pub fn new(operation: Operation, schema: &Schema, payload: Vec<u8>) -> Self {
        Self {
            name: event_name(operation, schema),
            payload,
        }
    }

    /// Attach this notification to the current invocation.
    pub fn emit<S, C>(self, store: &mut RecordStore<'_, S, C>) -> RegistryResult<()>
    where
        S: LedgerStub + ?Sized,
        C: RecordCodec,
    {
        store.notify(&self.name, self.payload)
    }
}

/// `<Operation><Kind>`, with the mutable field appended for updates
/// (`UpdateDataAssetOrderStatus`).
pub fn event_name(operation: Operation, schema: &Schema) -> String {
    match (operation, schema.mutable_field) {
        (Operation::Update, Some(field)) => format!("{operation}{}{field}", schema.kind),
        _ => format!("{operation}{}", schema.kind),
    }
}
