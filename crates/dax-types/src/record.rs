//! The nine record structs and the traits the registry handles them through.
//!
//! Records are plain attribute bags. Field names serialize in camelCase
//! (`ownerId`, `aesKey`) and the record key serializes as `id`.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::key::{validate_attribute, validate_department_id};
use crate::kind::RecordKind;
use crate::schema::Schema;
use crate::status::Status;

/// Behaviour shared by every record kind.
pub trait Record: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned {
    /// The kind this type represents.
    const KIND: RecordKind;

    /// The schema descriptor for this kind.
    fn schema() -> &'static Schema {
        Self::KIND.schema()
    }

    /// The record's key (its id).
    fn key(&self) -> &str;

    /// Values of the record's foreign-key fields, in the order declared by
    /// [`Schema::references`].
    fn reference_keys(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Field-level checks run before the record is admitted.
    fn validate(&self) -> Result<(), TypeError> {
        Ok(())
    }
}

/// A record kind with exactly one field that may change after creation.
pub trait MutableRecord: Record {
    type Value: Clone + fmt::Debug + PartialEq;

    /// Current value of the mutable field.
    fn mutable_value(&self) -> &Self::Value;

    /// Overwrite the mutable field, leaving every other field untouched.
    fn set_mutable_value(&mut self, value: Self::Value);

    /// Checks a replacement value must pass before an update is applied.
    fn validate_value(_value: &Self::Value) -> Result<(), TypeError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Department
// ---------------------------------------------------------------------------

/// An organizational unit that owns assets and places orders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    /// Space-separated `key:value` tokens.
    pub attribute: String,
}

impl Department {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attribute: attribute.into(),
        }
    }
}

impl Record for Department {
    const KIND: RecordKind = RecordKind::Department;

    fn key(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), TypeError> {
        validate_department_id(&self.id)?;
        validate_attribute(&self.attribute)
    }
}

impl MutableRecord for Department {
    type Value = String;

    fn mutable_value(&self) -> &String {
        &self.attribute
    }

    fn set_mutable_value(&mut self, value: String) {
        self.attribute = value;
    }

    fn validate_value(value: &String) -> Result<(), TypeError> {
        validate_attribute(value)
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// A generic data asset whose content lives behind a content id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAsset {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub policy: String,
    pub location: String,
    pub field: String,
    pub cid: String,
    pub aes_key: String,
    pub enc_type: i32,
}

impl Record for DataAsset {
    const KIND: RecordKind = RecordKind::DataAsset;

    fn key(&self) -> &str {
        &self.id
    }

    fn reference_keys(&self) -> Vec<&str> {
        vec![self.owner_id.as_str()]
    }
}

/// A data asset served from a database connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbAsset {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub policy: String,
    pub location: String,
    pub field: String,
    pub jdbc_url: String,
    pub username: String,
    pub password: String,
    pub aes_key: String,
    pub enc_type: i32,
}

impl Record for DbAsset {
    const KIND: RecordKind = RecordKind::DbAsset;

    fn key(&self) -> &str {
        &self.id
    }

    fn reference_keys(&self) -> Vec<&str> {
        vec![self.owner_id.as_str()]
    }
}

/// A data asset delivered as a video stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAsset {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub policy: String,
    pub location: String,
    pub field: String,
    pub rtsp_url: String,
    pub aes_key: String,
    pub enc_type: i32,
}

impl Record for VideoAsset {
    const KIND: RecordKind = RecordKind::VideoAsset;

    fn key(&self) -> &str {
        &self.id
    }

    fn reference_keys(&self) -> Vec<&str> {
        vec![self.owner_id.as_str()]
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// A department's request for access to a [`DataAsset`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAssetOrder {
    pub id: String,
    pub data_asset_id: String,
    pub applicant_id: String,
    pub status: Status,
}

impl DataAssetOrder {
    pub fn new(
        id: impl Into<String>,
        data_asset_id: impl Into<String>,
        applicant_id: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            id: id.into(),
            data_asset_id: data_asset_id.into(),
            applicant_id: applicant_id.into(),
            status,
        }
    }
}

impl Record for DataAssetOrder {
    const KIND: RecordKind = RecordKind::DataAssetOrder;

    fn key(&self) -> &str {
        &self.id
    }

    fn reference_keys(&self) -> Vec<&str> {
        vec![self.data_asset_id.as_str(), self.applicant_id.as_str()]
    }
}

impl MutableRecord for DataAssetOrder {
    type Value = Status;

    fn mutable_value(&self) -> &Status {
        &self.status
    }

    fn set_mutable_value(&mut self, value: Status) {
        self.status = value;
    }
}

/// A department's query against a [`DbAsset`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbAssetOrder {
    pub id: String,
    pub db_asset_id: String,
    pub applicant_id: String,
    pub sql: String,
}

impl DbAssetOrder {
    pub fn new(
        id: impl Into<String>,
        db_asset_id: impl Into<String>,
        applicant_id: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            db_asset_id: db_asset_id.into(),
            applicant_id: applicant_id.into(),
            sql: sql.into(),
        }
    }
}

impl Record for DbAssetOrder {
    const KIND: RecordKind = RecordKind::DbAssetOrder;

    fn key(&self) -> &str {
        &self.id
    }

    fn reference_keys(&self) -> Vec<&str> {
        vec![self.db_asset_id.as_str(), self.applicant_id.as_str()]
    }
}

/// A department's request for access to a [`VideoAsset`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAssetOrder {
    pub id: String,
    pub video_asset_id: String,
    pub applicant_id: String,
    pub status: Status,
}

impl VideoAssetOrder {
    pub fn new(
        id: impl Into<String>,
        video_asset_id: impl Into<String>,
        applicant_id: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            id: id.into(),
            video_asset_id: video_asset_id.into(),
            applicant_id: applicant_id.into(),
            status,
        }
    }
}

impl Record for VideoAssetOrder {
    const KIND: RecordKind = RecordKind::VideoAssetOrder;

    fn key(&self) -> &str {
        &self.id
    }

    fn reference_keys(&self) -> Vec<&str> {
        vec![self.video_asset_id.as_str(), self.applicant_id.as_str()]
    }
}

impl MutableRecord for VideoAssetOrder {
    type Value = Status;

    fn mutable_value(&self) -> &Status {
        &self.status
    }

    fn set_mutable_value(&mut self, value: Status) {
        self.status = value;
    }
}

// ---------------------------------------------------------------------------
// Attribute workflow
// ---------------------------------------------------------------------------

/// A department's application to be granted an attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeApplication {
    pub id: String,
    pub department_id: String,
    pub attribute: String,
    pub status: Status,
}

impl AttributeApplication {
    pub fn new(
        id: impl Into<String>,
        department_id: impl Into<String>,
        attribute: impl Into<String>,
        status: Status,
    ) -> Self {
        Self {
            id: id.into(),
            department_id: department_id.into(),
            attribute: attribute.into(),
            status,
        }
    }
}

impl Record for AttributeApplication {
    const KIND: RecordKind = RecordKind::AttributeApplication;

    fn key(&self) -> &str {
        &self.id
    }

    fn reference_keys(&self) -> Vec<&str> {
        vec![self.department_id.as_str()]
    }
}

impl MutableRecord for AttributeApplication {
    type Value = Status;

    fn mutable_value(&self) -> &Status {
        &self.status
    }

    fn set_mutable_value(&mut self, value: Status) {
        self.status = value;
    }
}

/// An opaque attribute definition. The only kind that can be deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeItem {
    pub id: String,
    pub content: String,
}

impl AttributeItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

impl Record for AttributeItem {
    const KIND: RecordKind = RecordKind::AttributeItem;

    fn key(&self) -> &str {
        &self.id
    }
}
