//! Ledger state access for the DAX registry.
//!
//! The registry never owns its state. Every read and write goes through a
//! [`LedgerStub`]: the per-invocation view of an external key-value ledger
//! that provides point reads and writes, ordered range scans, and a single
//! named event per invocation.
//!
//! # Contents
//!
//! - [`LedgerStub`]: the stub contract the registry is written against
//! - [`StateIterator`]: lazy range-scan cursor, released on exhaustion or drop
//! - [`KeyRange`] / [`prefix_upper_bound`]: half-open key intervals
//! - [`InMemoryLedger`] / [`Invocation`]: reference ledger for tests and the CLI
//! - [`ChaincodeEvent`] / [`EventFilter`]: committed notifications
//!
//! # Ledger Rules
//!
//! 1. An invocation sees its own writes, for point reads and range scans.
//! 2. An invocation commits as a unit or not at all; dropping it discards it.
//! 3. Only the last event set by an invocation is kept.
//! 4. Range scans yield keys in ascending byte order.

pub mod error;
pub mod event;
pub mod iter;
pub mod memory;
pub mod range;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use event::{ChaincodeEvent, EventFilter};
pub use iter::{KeyValue, StateIterator};
pub use memory::{InMemoryLedger, Invocation, TxReceipt};
pub use range::{prefix_upper_bound, KeyRange};
pub use traits::LedgerStub;
