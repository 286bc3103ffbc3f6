//! Transaction logic for the DAX registry.
//!
//! The registry validates, serializes and indexes records in an external
//! ledger, and sets a notification for every successful write. It keeps no
//! state of its own: every operation receives the ledger stub of the current
//! invocation and the codec explicitly.
//!
//! # Components
//!
//! - [`RecordStore`] / [`RecordView`]: typed get, put, delete, scan, notify
//! - [`validator`]: uniqueness first, then foreign keys in declared order
//! - [`handler`]: the generic Exists/Create/Read/Update/List/Delete handler
//! - [`query`]: kind ranges and list packaging
//! - [`notify`]: `<Operation><Kind>[<Field>]` notifications
//! - [`Registry`]: facade applying configuration and argument checks
//! - [`Transaction`]: named contract calls with string arguments
//!
//! # Registry Rules
//!
//! 1. A create fails with `AlreadyExists` before any foreign key is checked.
//! 2. Foreign keys are checked only at create time.
//! 3. Only the one mutable field of a kind ever changes after creation.
//! 4. Lists are in ascending key order and contain only the requested kind.
//! 5. A failed operation leaves no write and no notification behind.

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod notify;
pub mod query;
pub mod registry;
pub mod store;
pub mod validator;

pub use codec::{JsonCodec, RecordCodec};
pub use config::RegistryConfig;
pub use dispatch::{Intent, NewRecord, Transaction, UpdateValue};
pub use error::{RegistryError, RegistryResult};
pub use notify::{Notification, Operation};
pub use registry::Registry;
pub use store::{RecordStore, RecordView};
