use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::schema::{self, Schema};

/// The nine kinds of record tracked by the registry.
///
/// The display form of a kind is also its key prefix and the noun used in
/// event names (`CreateDataAsset`, `DeleteAttributeItem`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    Department,
    DataAsset,
    #[serde(rename = "DBAsset")]
    DbAsset,
    VideoAsset,
    DataAssetOrder,
    #[serde(rename = "DBAssetOrder")]
    DbAssetOrder,
    VideoAssetOrder,
    AttributeApplication,
    AttributeItem,
}

impl RecordKind {
    /// Every kind, in declaration order.
    pub const ALL: [RecordKind; 9] = [
        Self::Department,
        Self::DataAsset,
        Self::DbAsset,
        Self::VideoAsset,
        Self::DataAssetOrder,
        Self::DbAssetOrder,
        Self::VideoAssetOrder,
        Self::AttributeApplication,
        Self::AttributeItem,
    ];

    /// The key prefix shared by every record of this kind.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::DataAsset => "DataAsset",
            Self::DbAsset => "DBAsset",
            Self::VideoAsset => "VideoAsset",
            Self::DataAssetOrder => "DataAssetOrder",
            Self::DbAssetOrder => "DBAssetOrder",
            Self::VideoAssetOrder => "VideoAssetOrder",
            Self::AttributeApplication => "AttributeApplication",
            Self::AttributeItem => "AttributeItem",
        }
    }

    /// The schema descriptor for this kind.
    pub fn schema(self) -> &'static Schema {
        schema::of(self)
    }

    /// Returns `true` if `key` is this kind's prefix followed by at least
    /// one ASCII digit and nothing else.
    ///
    /// `DataAssetOrder3` is not owned by `DataAsset` even though it shares
    /// the textual prefix.
    pub fn owns_key(self, key: &str) -> bool {
        match key.strip_prefix(self.prefix()) {
            Some(suffix) => !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }

    /// Find the kind that owns `key`, if any.
    pub fn of_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.owns_key(key))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for RecordKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.prefix() == s)
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}
