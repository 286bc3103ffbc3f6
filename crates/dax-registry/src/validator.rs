//! Uniqueness and referential checks run before a create is admitted.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. The new key must be free.
//! 2. Each foreign key must resolve, in the order the schema declares them.

use dax_store::LedgerStub;
use dax_types::{Record, RecordKind};

use crate::codec::RecordCodec;
use crate::error::{RegistryError, RegistryResult};
use crate::store::RecordView;

/// Fails with `AlreadyExists` if `key` is occupied.
pub fn require_absent<S, C>(
    view: RecordView<'_, S, C>,
    kind: RecordKind,
    key: &str,
) -> RegistryResult<()>
where
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    if view.exists(key)? {
        return Err(RegistryError::already_exists(kind, key));
    }
    Ok(())
}

/// Fails with `NotFound` if nothing is stored at `key`.
pub fn require_exists<S, C>(
    view: RecordView<'_, S, C>,
    kind: RecordKind,
    key: &str,
) -> RegistryResult<()>
where
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    if !view.exists(key)? {
        return Err(RegistryError::not_found(kind, key));
    }
    Ok(())
}

/// Run every create-time check for `record`.
pub fn check_create<R, S, C>(view: RecordView<'_, S, C>, record: &R) -> RegistryResult<()>
where
    R: Record,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    require_absent(view, R::KIND, record.key())?;
    for (reference, key) in R::schema().references.iter().zip(record.reference_keys()) {
        require_exists(view, reference.target, key)?;
    }
    Ok(())
}
