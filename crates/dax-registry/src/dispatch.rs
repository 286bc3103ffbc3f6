//! Named transactions with positional string arguments.
//!
//! This is the contract surface exposed to ledger clients: functions such
//! as `CreateDepartment`, `ReadDataAsset`, `GetAllDBAsset`,
//! `UpdateDataAssetOrderStatus`, `AttributeItemExists` and
//! `DeleteAttributeItem`, each taking its arguments as strings in field
//! declaration order. Integer arguments are parsed here.

use std::fmt;
use std::slice;

use dax_store::LedgerStub;
use dax_types::{
    AttributeApplication, AttributeItem, DataAsset, DataAssetOrder, DbAsset, DbAssetOrder,
    Department, RecordKind, Status, VideoAsset, VideoAssetOrder,
};
use tracing::debug;

use crate::codec::RecordCodec;
use crate::error::{RegistryError, RegistryResult};
use crate::registry::Registry;

/// Whether a transaction only reads, or must be submitted for commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Evaluate,
    Submit,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluate => write!(f, "EVALUATE"),
            Self::Submit => write!(f, "SUBMIT"),
        }
    }
}

/// A record to be created, one variant per kind.
#[derive(Clone, Debug, PartialEq)]
pub enum NewRecord {
    Department(Department),
    DataAsset(DataAsset),
    DbAsset(DbAsset),
    VideoAsset(VideoAsset),
    DataAssetOrder(DataAssetOrder),
    DbAssetOrder(DbAssetOrder),
    VideoAssetOrder(VideoAssetOrder),
    AttributeApplication(AttributeApplication),
    AttributeItem(AttributeItem),
}

impl NewRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Department(_) => RecordKind::Department,
            Self::DataAsset(_) => RecordKind::DataAsset,
            Self::DbAsset(_) => RecordKind::DbAsset,
            Self::VideoAsset(_) => RecordKind::VideoAsset,
            Self::DataAssetOrder(_) => RecordKind::DataAssetOrder,
            Self::DbAssetOrder(_) => RecordKind::DbAssetOrder,
            Self::VideoAssetOrder(_) => RecordKind::VideoAssetOrder,
            Self::AttributeApplication(_) => RecordKind::AttributeApplication,
            Self::AttributeItem(_) => RecordKind::AttributeItem,
        }
    }
}

/// New value for a kind's mutable field.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateValue {
    Attribute(String),
    Status(Status),
}

/// Legacy update names accepted on parse. Execution and notifications
/// always use the canonical `Update<Kind><Field>` name.
const UPDATE_ALIASES: &[(&str, RecordKind)] =
    &[("VideoDataAssetOrderStatus", RecordKind::VideoAssetOrder)];

/// A parsed contract call.
#[derive(Clone, Debug, PartialEq)]
pub enum Transaction {
    Exists { kind: RecordKind, key: String },
    Create(NewRecord),
    Read { kind: RecordKind, key: String },
    Update { kind: RecordKind, key: String, value: UpdateValue },
    GetAll { kind: RecordKind },
    Delete { kind: RecordKind, key: String },
}

impl Transaction {
    /// Parse a function name and its positional arguments.
    pub fn parse(function: &str, args: &[String]) -> RegistryResult<Self> {
        let unknown = || RegistryError::UnknownFunction(function.to_string());
        let kind_of = |name: &str| name.parse::<RecordKind>().map_err(|_| unknown());

        if let Some(name) = function.strip_suffix("Exists") {
            let kind = kind_of(name)?;
            let mut args = Args::new(function, args, 1)?;
            return Ok(Self::Exists { kind, key: args.text() });
        }
        if let Some(name) = function.strip_prefix("GetAll") {
            let kind = kind_of(name)?;
            Args::new(function, args, 0)?;
            return Ok(Self::GetAll { kind });
        }
        if let Some(name) = function.strip_prefix("Read") {
            let kind = kind_of(name)?;
            let mut args = Args::new(function, args, 1)?;
            return Ok(Self::Read { kind, key: args.text() });
        }
        if let Some(name) = function.strip_prefix("Create") {
            return Ok(Self::Create(parse_create(function, kind_of(name)?, args)?));
        }
        if let Some(name) = function.strip_prefix("Delete") {
            let kind = kind_of(name)?;
            if !kind.schema().deletable {
                return Err(unknown());
            }
            let mut args = Args::new(function, args, 1)?;
            return Ok(Self::Delete { kind, key: args.text() });
        }
        if let Some(rest) = function.strip_prefix("Update") {
            let kind = UPDATE_ALIASES
                .iter()
                .find(|(alias, _)| *alias == rest)
                .map(|&(_, kind)| kind)
                .or_else(|| {
                    RecordKind::ALL.into_iter().find(|kind| {
                        kind.schema()
                            .mutable_field
                            .is_some_and(|field| rest.strip_prefix(kind.prefix()) == Some(field))
                    })
                })
                .ok_or_else(unknown)?;
            let mut args = Args::new(function, args, 2)?;
            let key = args.text();
            let value = if kind == RecordKind::Department {
                UpdateValue::Attribute(args.text())
            } else {
                UpdateValue::Status(args.status()?)
            };
            return Ok(Self::Update { kind, key, value });
        }
        Err(unknown())
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Create(record) => record.kind(),
            Self::Exists { kind, .. }
            | Self::Read { kind, .. }
            | Self::Update { kind, .. }
            | Self::GetAll { kind }
            | Self::Delete { kind, .. } => *kind,
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            Self::Exists { .. } | Self::Read { .. } | Self::GetAll { .. } => Intent::Evaluate,
            Self::Create(_) | Self::Update { .. } | Self::Delete { .. } => Intent::Submit,
        }
    }

    /// The contract function name, e.g. `UpdateVideoAssetOrderStatus`.
    pub fn function_name(&self) -> String {
        let kind = self.kind();
        match self {
            Self::Exists { .. } => format!("{kind}Exists"),
            Self::Create(_) => format!("Create{kind}"),
            Self::Read { .. } => format!("Read{kind}"),
            Self::Update { .. } => {
                let field = kind.schema().mutable_field.unwrap_or_default();
                format!("Update{kind}{field}")
            }
            Self::GetAll { .. } => format!("GetAll{kind}"),
            Self::Delete { .. } => format!("Delete{kind}"),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function_name())
    }
}

/// Positional argument reader. Arity is checked up front.
struct Args<'a> {
    function: &'a str,
    values: slice::Iter<'a, String>,
}

impl<'a> Args<'a> {
    fn new(function: &'a str, values: &'a [String], expected: usize) -> RegistryResult<Self> {
        if values.len() != expected {
            return Err(RegistryError::InvalidArgument(format!(
                "{function} expects {expected} argument(s), got {}",
                values.len()
            )));
        }
        Ok(Self {
            function,
            values: values.iter(),
        })
    }

    fn text(&mut self) -> String {
        self.values.next().cloned().unwrap_or_default()
    }

    fn int(&mut self, name: &str) -> RegistryResult<i32> {
        let raw = self.text();
        raw.trim().parse().map_err(|_| {
            RegistryError::InvalidArgument(format!(
                "{}: {name} must be an integer, got {raw:?}",
                self.function
            ))
        })
    }

    fn status(&mut self) -> RegistryResult<Status> {
        Ok(Status::try_from(self.int("status")?)?)
    }
}

fn create_arity(kind: RecordKind) -> usize {
    match kind {
        RecordKind::Department => 3,
        RecordKind::DataAsset | RecordKind::VideoAsset => 9,
        RecordKind::DbAsset => 11,
        RecordKind::DataAssetOrder
        | RecordKind::DbAssetOrder
        | RecordKind::VideoAssetOrder
        | RecordKind::AttributeApplication => 4,
        RecordKind::AttributeItem => 2,
    }
}

fn parse_create(function: &str, kind: RecordKind, args: &[String]) -> RegistryResult<NewRecord> {
    let mut a = Args::new(function, args, create_arity(kind))?;
    let record = match kind {
        RecordKind::Department => NewRecord::Department(Department {
            id: a.text(),
            name: a.text(),
            attribute: a.text(),
        }),
        RecordKind::DataAsset => NewRecord::DataAsset(DataAsset {
            id: a.text(),
            name: a.text(),
            owner_id: a.text(),
            policy: a.text(),
            location: a.text(),
            field: a.text(),
            cid: a.text(),
            aes_key: a.text(),
            enc_type: a.int("encType")?,
        }),
        RecordKind::DbAsset => NewRecord::DbAsset(DbAsset {
            id: a.text(),
            name: a.text(),
            owner_id: a.text(),
            policy: a.text(),
            location: a.text(),
            field: a.text(),
            jdbc_url: a.text(),
            username: a.text(),
            password: a.text(),
            aes_key: a.text(),
            enc_type: a.int("encType")?,
        }),
        RecordKind::VideoAsset => NewRecord::VideoAsset(VideoAsset {
            id: a.text(),
            name: a.text(),
            owner_id: a.text(),
            policy: a.text(),
            location: a.text(),
            field: a.text(),
            rtsp_url: a.text(),
            aes_key: a.text(),
            enc_type: a.int("encType")?,
        }),
        RecordKind::DataAssetOrder => NewRecord::DataAssetOrder(DataAssetOrder {
            id: a.text(),
            data_asset_id: a.text(),
            applicant_id: a.text(),
            status: a.status()?,
        }),
        RecordKind::DbAssetOrder => NewRecord::DbAssetOrder(DbAssetOrder {
            id: a.text(),
            db_asset_id: a.text(),
            applicant_id: a.text(),
            sql: a.text(),
        }),
        RecordKind::VideoAssetOrder => NewRecord::VideoAssetOrder(VideoAssetOrder {
            id: a.text(),
            video_asset_id: a.text(),
            applicant_id: a.text(),
            status: a.status()?,
        }),
        RecordKind::AttributeApplication => NewRecord::AttributeApplication(AttributeApplication {
            id: a.text(),
            department_id: a.text(),
            attribute: a.text(),
            status: a.status()?,
        }),
        RecordKind::AttributeItem => NewRecord::AttributeItem(AttributeItem {
            id: a.text(),
            content: a.text(),
        }),
    };
    Ok(record)
}

/// Bind `$R` to the record type of a runtime kind and evaluate `$body`.
macro_rules! with_record_type {
    ($kind:expr, $R:ident => $body:expr) => {
        match $kind {
            RecordKind::Department => {
                type $R = Department;
                $body
            }
            RecordKind::DataAsset => {
                type $R = DataAsset;
                $body
            }
            RecordKind::DbAsset => {
                type $R = DbAsset;
                $body
            }
            RecordKind::VideoAsset => {
                type $R = VideoAsset;
                $body
            }
            RecordKind::DataAssetOrder => {
                type $R = DataAssetOrder;
                $body
            }
            RecordKind::DbAssetOrder => {
                type $R = DbAssetOrder;
                $body
            }
            RecordKind::VideoAssetOrder => {
                type $R = VideoAssetOrder;
                $body
            }
            RecordKind::AttributeApplication => {
                type $R = AttributeApplication;
                $body
            }
            RecordKind::AttributeItem => {
                type $R = AttributeItem;
                $body
            }
        }
    };
}

impl<C: RecordCodec> Registry<C> {
    /// Parse and execute one contract call, rendering the response as text.
    ///
    /// Records and lists render as encoded records, booleans as `true` or
    /// `false`. Committing is left to the caller; use
    /// [`Transaction::intent`] to decide.
    pub fn invoke<S: LedgerStub + ?Sized>(
        &self,
        stub: &mut S,
        function: &str,
        args: &[String],
    ) -> RegistryResult<String> {
        let tx = Transaction::parse(function, args)?;
        self.execute(stub, tx)
    }

    /// Execute an already parsed transaction.
    pub fn execute<S: LedgerStub + ?Sized>(
        &self,
        stub: &mut S,
        tx: Transaction,
    ) -> RegistryResult<String> {
        debug!(function = %tx, intent = %tx.intent(), "executing transaction");
        match tx {
            Transaction::Exists { kind, key } => {
                with_record_type!(kind, R => Ok(self.exists::<R, S>(stub, &key)?.to_string()))
            }
            Transaction::Read { kind, key } => {
                with_record_type!(kind, R => self.encode(&self.read::<R, S>(stub, &key)?))
            }
            Transaction::GetAll { kind } => {
                with_record_type!(kind, R => self.list_encoded::<R, S>(stub))
            }
            Transaction::Delete { kind, key } => {
                with_record_type!(kind, R => self.encode(&self.delete::<R, S>(stub, &key)?))
            }
            Transaction::Create(record) => match record {
                NewRecord::Department(r) => self.encode(&self.create(stub, r)?),
                NewRecord::DataAsset(r) => self.encode(&self.create(stub, r)?),
                NewRecord::DbAsset(r) => self.encode(&self.create(stub, r)?),
                NewRecord::VideoAsset(r) => self.encode(&self.create(stub, r)?),
                NewRecord::DataAssetOrder(r) => self.encode(&self.create(stub, r)?),
                NewRecord::DbAssetOrder(r) => self.encode(&self.create(stub, r)?),
                NewRecord::VideoAssetOrder(r) => self.encode(&self.create(stub, r)?),
                NewRecord::AttributeApplication(r) => self.encode(&self.create(stub, r)?),
                NewRecord::AttributeItem(r) => self.encode(&self.create(stub, r)?),
            },
            Transaction::Update { kind, key, value } => match (kind, value) {
                (RecordKind::Department, UpdateValue::Attribute(attribute)) => {
                    self.encode(&self.update::<Department, S>(stub, &key, attribute)?)
                }
                (RecordKind::DataAssetOrder, UpdateValue::Status(status)) => {
                    self.encode(&self.update::<DataAssetOrder, S>(stub, &key, status)?)
                }
                (RecordKind::VideoAssetOrder, UpdateValue::Status(status)) => {
                    self.encode(&self.update::<VideoAssetOrder, S>(stub, &key, status)?)
                }
                (RecordKind::AttributeApplication, UpdateValue::Status(status)) => {
                    self.encode(&self.update::<AttributeApplication, S>(stub, &key, status)?)
                }
                (kind, _) => Err(RegistryError::Unsupported {
                    kind,
                    operation: "update",
                }),
            },
        }
    }
}
