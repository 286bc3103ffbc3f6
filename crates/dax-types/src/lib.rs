//! Foundation types for the DAX registry.
//!
//! Every other DAX crate depends on `dax-types`. It defines the nine record
//! kinds the registry tracks, their serialized shape, and the schema table
//! that drives the generic record handlers.
//!
//! # Key Types
//!
//! - [`RecordKind`]: the nine kinds and their key prefixes
//! - [`Record`] / [`MutableRecord`]: behaviour shared by all record structs
//! - [`Schema`]: per-kind descriptor: references, mutable field, deletability
//! - [`Status`]: workflow status carried by orders and applications
//!
//! # Key Namespace
//!
//! All kinds share one flat key space. A record key is its kind prefix
//! followed by a decimal suffix (`Department7`, `DataAssetOrder12`). Range
//! scans over a kind rely on this convention, so ids must follow it.

pub mod error;
pub mod key;
pub mod kind;
pub mod record;
pub mod schema;
pub mod status;

pub use error::TypeError;
pub use key::{validate_attribute, validate_department_id, validate_key, DEFAULT_MAX_KEY_DIGITS};
pub use kind::RecordKind;
pub use record::{
    AttributeApplication, AttributeItem, DataAsset, DataAssetOrder, DbAsset, DbAssetOrder,
    Department, MutableRecord, Record, VideoAsset, VideoAssetOrder,
};
pub use schema::{Reference, Schema, SCHEMAS};
pub use status::Status;
