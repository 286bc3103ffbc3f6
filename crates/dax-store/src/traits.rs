use crate::error::StoreResult;
use crate::iter::StateIterator;

/// Per-invocation view of the ledger's world state.
///
/// All implementations must satisfy these invariants:
/// - Reads observe writes made earlier in the same invocation.
/// - Nothing written through the stub is visible to other invocations until
///   the platform commits this one; an aborted invocation leaves no trace.
/// - Range scans yield entries in ascending key order and must be drained
///   or dropped before the invocation ends.
/// - The stub never interprets values; it is a pure key-value store.
pub trait LedgerStub {
    /// Read the value stored at `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` at `key`, replacing any previous value.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Remove the value at `key`. Removing an absent key is a no-op.
    fn del_state(&mut self, key: &str) -> StoreResult<()>;

    /// Scan keys in the half-open interval `[start, end)`.
    ///
    /// An empty `end` leaves the interval unbounded above.
    fn get_state_by_range(&self, start: &str, end: &str) -> StoreResult<StateIterator<'_>>;

    /// Attach a named event to the invocation, replacing any earlier one.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> StoreResult<()>;

    /// Returns `true` if a non-empty value is stored at `key`.
    fn has_state(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get_state(key)?.is_some_and(|value| !value.is_empty()))
    }
}
