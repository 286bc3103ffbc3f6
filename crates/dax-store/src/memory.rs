use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::event::{ChaincodeEvent, EventFilter};
use crate::iter::{KeyValue, StateIterator};
use crate::traits::LedgerStub;

/// In-memory ledger for tests, local tooling, and embedding.
///
/// Committed world state is a `BTreeMap` behind a `RwLock`, so range scans
/// come out in key order for free. Work happens in [`Invocation`]s opened
/// with [`begin`](Self::begin); an invocation buffers its writes and event
/// and applies them atomically on [`commit`](Invocation::commit).
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
    open_cursors: Arc<AtomicUsize>,
}

#[derive(Default)]
struct LedgerState {
    world: BTreeMap<String, Vec<u8>>,
    events: Vec<ChaincodeEvent>,
    height: u64,
}

/// On-disk form of a ledger.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    height: u64,
    state: Vec<StateEntry>,
    events: Vec<ChaincodeEvent>,
}

#[derive(Serialize, Deserialize)]
struct StateEntry {
    key: String,
    #[serde(with = "hex::serde")]
    value: Vec<u8>,
}

/// Summary of a committed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    /// BLAKE3 digest (hex) of the height, write set, and event.
    pub tx_id: String,
    /// Ledger height after the commit.
    pub height: u64,
    /// Number of keys written or deleted.
    pub writes: usize,
    /// Name of the committed event, if any.
    pub event: Option<String>,
}

impl InMemoryLedger {
    /// Create an empty ledger at height 0.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Open a new invocation against the current committed state.
    pub fn begin(&self) -> Invocation<'_> {
        Invocation {
            ledger: self,
            writes: BTreeMap::new(),
            event: None,
        }
    }

    /// Number of committed invocations.
    pub fn height(&self) -> StoreResult<u64> {
        Ok(self.read_state()?.height)
    }

    /// Number of keys in the committed state.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.world.len())
    }

    /// Returns `true` if the committed state holds no keys.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_state()?.world.is_empty())
    }

    /// Read a committed value, bypassing any invocation.
    pub fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_state()?.world.get(key).cloned())
    }

    /// All committed entries in key order.
    pub fn entries(&self) -> StoreResult<Vec<KeyValue>> {
        let state = self.read_state()?;
        Ok(state
            .world
            .iter()
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect())
    }

    /// Committed events matching `filter`, in commit order.
    pub fn events(&self, filter: &EventFilter) -> StoreResult<Vec<ChaincodeEvent>> {
        let state = self.read_state()?;
        Ok(state
            .events
            .iter()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect())
    }

    /// Number of range-scan cursors handed out and not yet released.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Write the committed state and event log to `path` as JSON.
    pub fn save_snapshot(&self, path: &Path) -> StoreResult<()> {
        let snapshot = {
            let state = self.read_state()?;
            Snapshot {
                height: state.height,
                state: state
                    .world
                    .iter()
                    .map(|(key, value)| StateEntry {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect(),
                events: state.events.clone(),
            }
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(path, bytes)?;
        debug!(path = %path.display(), height = snapshot.height, "snapshot saved");
        Ok(())
    }

    /// Load a ledger previously written by [`save_snapshot`](Self::save_snapshot).
    pub fn load_snapshot(path: &Path) -> StoreResult<Self> {
        let bytes = fs::read(path)?;
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let state = LedgerState {
            world: snapshot
                .state
                .into_iter()
                .map(|entry| (entry.key, entry.value))
                .collect(),
            events: snapshot.events,
            height: snapshot.height,
        };
        debug!(path = %path.display(), height = state.height, "snapshot loaded");
        Ok(Self {
            inner: RwLock::new(state),
            open_cursors: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, LedgerState>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, LedgerState>> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryLedger");
        if let Ok(state) = self.inner.read() {
            s.field("height", &state.height)
                .field("key_count", &state.world.len())
                .field("event_count", &state.events.len());
        }
        s.field("open_cursors", &self.open_cursors()).finish()
    }
}

/// One atomic execution against an [`InMemoryLedger`].
///
/// Writes and the event are buffered until [`commit`](Self::commit).
/// Dropping the invocation without committing discards everything.
pub struct Invocation<'l> {
    ledger: &'l InMemoryLedger,
    /// `None` marks a deletion.
    writes: BTreeMap<String, Option<Vec<u8>>>,
    event: Option<(String, Vec<u8>)>,
}

impl Invocation<'_> {
    /// Number of keys written or deleted so far.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// The event that would be committed, if any.
    pub fn pending_event(&self) -> Option<(&str, &[u8])> {
        self.event
            .as_ref()
            .map(|(name, payload)| (name.as_str(), payload.as_slice()))
    }

    /// Returns `true` if committing would change nothing.
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty() && self.event.is_none()
    }

    /// Apply the buffered writes and event atomically.
    pub fn commit(self) -> StoreResult<TxReceipt> {
        let Invocation {
            ledger,
            writes,
            event,
        } = self;

        let mut state = ledger.write_state()?;
        let height = state.height + 1;
        let tx_id = tx_digest(height, &writes, event.as_ref());

        for (key, value) in &writes {
            match value {
                Some(value) => {
                    state.world.insert(key.clone(), value.clone());
                }
                None => {
                    state.world.remove(key);
                }
            }
        }

        let event_name = event.as_ref().map(|(name, _)| name.clone());
        if let Some((name, payload)) = event {
            state.events.push(ChaincodeEvent {
                tx_id: tx_id.clone(),
                height,
                name,
                payload,
            });
        }
        state.height = height;

        info!(
            tx_id = %tx_id,
            height,
            writes = writes.len(),
            event = ?event_name,
            "invocation committed"
        );

        Ok(TxReceipt {
            tx_id,
            height,
            writes: writes.len(),
            event: event_name,
        })
    }

    /// Discard the invocation explicitly.
    pub fn rollback(self) {
        debug!(writes = self.writes.len(), "invocation rolled back");
    }
}

impl LedgerStub for Invocation<'_> {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(pending) = self.writes.get(key) {
            return Ok(pending.clone());
        }
        self.ledger.get(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.writes.insert(key.to_string(), None);
        Ok(())
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> StoreResult<StateIterator<'_>> {
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else if end < start {
            return Err(StoreError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        } else {
            Bound::Excluded(end)
        };
        let bounds = (Bound::Included(start), upper);

        let mut merged: BTreeMap<String, Vec<u8>> = {
            let state = self.ledger.read_state()?;
            state
                .world
                .range::<str, _>(bounds)
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        };
        for (key, pending) in self.writes.range::<str, _>(bounds) {
            match pending {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        let entries: Vec<KeyValue> = merged
            .into_iter()
            .map(|(key, value)| KeyValue { key, value })
            .collect();
        debug!(start, end, matches = entries.len(), "range scan opened");

        let cursors = Arc::clone(&self.ledger.open_cursors);
        cursors.fetch_add(1, Ordering::SeqCst);
        Ok(StateIterator::from_entries(entries).with_release(move || {
            cursors.fetch_sub(1, Ordering::SeqCst);
        }))
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::EmptyEventName);
        }
        self.event = Some((name.to_string(), payload));
        Ok(())
    }
}

fn tx_digest(
    height: u64,
    writes: &BTreeMap<String, Option<Vec<u8>>>,
    event: Option<&(String, Vec<u8>)>,
) -> String {
    fn field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }

    let mut hasher = blake3::Hasher::new();
    hasher.update(b"dax-tx-v1");
    hasher.update(&height.to_le_bytes());
    for (key, value) in writes {
        field(&mut hasher, key.as_bytes());
        match value {
            Some(value) => {
                hasher.update(&[1]);
                field(&mut hasher, value);
            }
            None => {
                hasher.update(&[0]);
            }
        }
    }
    if let Some((name, payload)) = event {
        hasher.update(&[1]);
        field(&mut hasher, name.as_bytes());
        field(&mut hasher, payload);
    }
    hex::encode(hasher.finalize().as_bytes())
}
