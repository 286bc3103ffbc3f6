//! Per-kind schema descriptors.
//!
//! The registry runs one generic handler for all nine kinds. What differs
//! between kinds is captured here, once: which fields reference other
//! records (and in what order they are checked), which single field may be
//! updated, and whether records may be deleted.

use crate::kind::RecordKind;

/// A field holding the key of a record of another kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Serialized field name.
    pub field: &'static str,
    /// Kind the field must point at.
    pub target: RecordKind,
}

/// Descriptor for one record kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schema {
    pub kind: RecordKind,
    /// Foreign keys in the order they are validated on create.
    pub references: &'static [Reference],
    /// Name of the one mutable field, used in update event names
    /// (`UpdateDepartmentAttribute`). `None` means the kind has no update.
    pub mutable_field: Option<&'static str>,
    /// Whether records of this kind may be deleted.
    pub deletable: bool,
}

impl Schema {
    /// Returns `true` if this kind supports the single-field update.
    pub fn is_mutable(&self) -> bool {
        self.mutable_field.is_some()
    }
}

const OWNER: &[Reference] = &[Reference {
    field: "ownerId",
    target: RecordKind::Department,
}];

pub const DEPARTMENT: Schema = Schema {
    kind: RecordKind::Department,
    references: &[],
    mutable_field: Some("Attribute"),
    deletable: false,
};

pub const DATA_ASSET: Schema = Schema {
    kind: RecordKind::DataAsset,
    references: OWNER,
    mutable_field: None,
    deletable: false,
};

pub const DB_ASSET: Schema = Schema {
    kind: RecordKind::DbAsset,
    references: OWNER,
    mutable_field: None,
    deletable: false,
};

pub const VIDEO_ASSET: Schema = Schema {
    kind: RecordKind::VideoAsset,
    references: OWNER,
    mutable_field: None,
    deletable: false,
};

pub const DATA_ASSET_ORDER: Schema = Schema {
    kind: RecordKind::DataAssetOrder,
    references: &[
        Reference {
            field: "dataAssetId",
            target: RecordKind::DataAsset,
        },
        Reference {
            field: "applicantId",
            target: RecordKind::Department,
        },
    ],
    mutable_field: Some("Status"),
    deletable: false,
};

pub const DB_ASSET_ORDER: Schema = Schema {
    kind: RecordKind::DbAssetOrder,
    references: &[
        Reference {
            field: "dbAssetId",
            target: RecordKind::DbAsset,
        },
        Reference {
            field: "applicantId",
            target: RecordKind::Department,
        },
    ],
    mutable_field: None,
    deletable: false,
};

pub const VIDEO_ASSET_ORDER: Schema = Schema {
    kind: RecordKind::VideoAssetOrder,
    references: &[
        Reference {
            field: "videoAssetId",
            target: RecordKind::VideoAsset,
        },
        Reference {
            field: "applicantId",
            target: RecordKind::Department,
        },
    ],
    mutable_field: Some("Status"),
    deletable: false,
};

pub const ATTRIBUTE_APPLICATION: Schema = Schema {
    kind: RecordKind::AttributeApplication,
    references: &[Reference {
        field: "departmentId",
        target: RecordKind::Department,
    }],
    mutable_field: Some("Status"),
    deletable: false,
};

pub const ATTRIBUTE_ITEM: Schema = Schema {
    kind: RecordKind::AttributeItem,
    references: &[],
    mutable_field: None,
    deletable: true,
};

/// The descriptor table, indexed in [`RecordKind::ALL`] order.
pub static SCHEMAS: [Schema; 9] = [
    DEPARTMENT,
    DATA_ASSET,
    DB_ASSET,
    VIDEO_ASSET,
    DATA_ASSET_ORDER,
    DB_ASSET_ORDER,
    VIDEO_ASSET_ORDER,
    ATTRIBUTE_APPLICATION,
    ATTRIBUTE_ITEM,
];

pub(crate) fn of(kind: RecordKind) -> &'static Schema {
    // Discriminants follow declaration order, which is also table order.
    &SCHEMAS[kind as usize]
}
