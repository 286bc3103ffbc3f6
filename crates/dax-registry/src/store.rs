//! Typed access to the ledger stub.
//!
//! [`RecordView`] covers the read side and only needs a shared borrow of the
//! stub. [`RecordStore`] adds writes and notifications. Neither applies any
//! business rule.

use dax_store::{KeyRange, LedgerStub, StateIterator};
use dax_types::Record;
use tracing::debug;

use crate::codec::RecordCodec;
use crate::error::RegistryResult;

/// Read-only record access over a ledger stub.
pub struct RecordView<'a, S: ?Sized, C> {
    stub: &'a S,
    codec: &'a C,
}

impl<S: ?Sized, C> Clone for RecordView<'_, S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized, C> Copy for RecordView<'_, S, C> {}

impl<'a, S: LedgerStub + ?Sized, C: RecordCodec> RecordView<'a, S, C> {
    pub fn new(stub: &'a S, codec: &'a C) -> Self {
        Self { stub, codec }
    }

    pub fn codec(&self) -> &'a C {
        self.codec
    }

    /// Returns `true` if a non-empty encoding is stored at `key`.
    pub fn exists(&self, key: &str) -> RegistryResult<bool> {
        Ok(self.stub.has_state(key)?)
    }

    /// The stored encoding at `key`. Empty encodings read as absent.
    pub fn get_raw(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        Ok(self.stub.get_state(key)?.filter(|bytes| !bytes.is_empty()))
    }

    /// Decode the record stored at `key`.
    pub fn get<R: Record>(&self, key: &str) -> RegistryResult<Option<R>> {
        match self.get_raw(key)? {
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Ordered scan over `range`. The cursor is released when the iterator
    /// is exhausted or dropped.
    pub fn scan(&self, range: &KeyRange) -> RegistryResult<StateIterator<'a>> {
        debug!(range = %range, "scanning");
        Ok(self.stub.get_state_by_range(&range.start, range.end_key())?)
    }
}

/// Read-write record access over a ledger stub.
pub struct RecordStore<'a, S: ?Sized, C> {
    stub: &'a mut S,
    codec: &'a C,
}

impl<'a, S: LedgerStub + ?Sized, C: RecordCodec> RecordStore<'a, S, C> {
    pub fn new(stub: &'a mut S, codec: &'a C) -> Self {
        Self { stub, codec }
    }

    /// Borrow the read side.
    pub fn view(&self) -> RecordView<'_, S, C> {
        RecordView::new(&*self.stub, self.codec)
    }

    pub fn codec(&self) -> &'a C {
        self.codec
    }

    /// Encode and store `record` under its key. Returns the stored bytes.
    pub fn put<R: Record>(&mut self, record: &R) -> RegistryResult<Vec<u8>> {
        let bytes = self.codec.encode(record)?;
        self.stub.put_state(record.key(), bytes.clone())?;
        debug!(kind = %R::KIND, key = record.key(), bytes = bytes.len(), "record stored");
        Ok(bytes)
    }

    pub fn delete(&mut self, key: &str) -> RegistryResult<()> {
        self.stub.del_state(key)?;
        debug!(key, "record deleted");
        Ok(())
    }

    /// Attach a notification to the invocation.
    pub fn notify(&mut self, name: &str, payload: Vec<u8>) -> RegistryResult<()> {
        self.stub.set_event(name, payload)?;
        debug!(event = name, "notification set");
        Ok(())
    }
}
