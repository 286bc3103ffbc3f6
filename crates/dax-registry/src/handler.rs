//! The generic record handler.
//!
//! One set of operations serves all nine kinds. What differs per kind comes
//! from its [`Schema`](dax_types::Schema): the references checked on create,
//! the one mutable field, and whether delete is allowed.
//!
//! # Operation Rules
//!
//! 1. Validation happens before any write.
//! 2. A successful write sets exactly one notification.
//! 3. A failed operation writes nothing and sets no notification.

use dax_store::LedgerStub;
use dax_types::{MutableRecord, Record};
use tracing::warn;

use crate::codec::RecordCodec;
use crate::error::{RegistryError, RegistryResult};
use crate::notify::{Notification, Operation};
use crate::query;
use crate::store::{RecordStore, RecordView};
use crate::validator;

/// Returns `true` if a record is stored at `key`.
pub fn exists<R, S, C>(view: RecordView<'_, S, C>, key: &str) -> RegistryResult<bool>
where
    R: Record,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    view.exists(key)
}

/// Store a new record and emit `Create<Kind>`.
pub fn create<R, S, C>(store: &mut RecordStore<'_, S, C>, record: R) -> RegistryResult<R>
where
    R: Record,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    validator::check_create(store.view(), &record).inspect_err(|err| {
        warn!(kind = %R::KIND, key = record.key(), error = %err, "create rejected");
    })?;
    let payload = store.put(&record)?;
    Notification::new(Operation::Create, R::schema(), payload).emit(store)?;
    Ok(record)
}

/// Decode the record stored at `key`.
pub fn read<R, S, C>(view: RecordView<'_, S, C>, key: &str) -> RegistryResult<R>
where
    R: Record,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    view.get(key)?.ok_or_else(|| RegistryError::not_found(R::KIND, key))
}

/// Replace the mutable field of the record at `key` and emit
/// `Update<Kind><Field>`.
pub fn update<R, S, C>(
    store: &mut RecordStore<'_, S, C>,
    key: &str,
    value: R::Value,
) -> RegistryResult<R>
where
    R: MutableRecord,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    let mut record: R = read(store.view(), key).inspect_err(|err| {
        warn!(kind = %R::KIND, key, error = %err, "update rejected");
    })?;
    record.set_mutable_value(value);
    let payload = store.put(&record)?;
    Notification::new(Operation::Update, R::schema(), payload).emit(store)?;
    Ok(record)
}

/// Every record of kind `R`, in ascending key order.
pub fn list<R, S, C>(view: RecordView<'_, S, C>) -> RegistryResult<Vec<R>>
where
    R: Record,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    query::list(view)
}

/// Remove the record at `key` and emit `Delete<Kind>` carrying its last
/// stored encoding. Returns the removed record.
pub fn delete<R, S, C>(store: &mut RecordStore<'_, S, C>, key: &str) -> RegistryResult<R>
where
    R: Record,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    if !R::schema().deletable {
        return Err(RegistryError::Unsupported {
            kind: R::KIND,
            operation: "delete",
        });
    }
    let Some(payload) = store.view().get_raw(key)? else {
        warn!(kind = %R::KIND, key, "delete rejected: no such record");
        return Err(RegistryError::not_found(R::KIND, key));
    };
    let record: R = store.codec().decode(&payload)?;
    store.delete(key)?;
    Notification::new(Operation::Delete, R::schema(), payload).emit(store)?;
    Ok(record)
}
