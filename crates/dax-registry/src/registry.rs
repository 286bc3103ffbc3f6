use serde::Serialize;
use tracing::warn;

use dax_store::LedgerStub;
use dax_types::{validate_key, MutableRecord, Record, RecordKind, TypeError};

use crate::codec::{JsonCodec, RecordCodec};
use crate::config::RegistryConfig;
use crate::error::RegistryResult;
use crate::handler;
use crate::query;
use crate::store::{RecordStore, RecordView};

/// Entry point for registry operations.
///
/// A `Registry` holds only the codec and configuration. Every operation
/// takes the ledger stub for the current invocation explicitly; reads need
/// a shared borrow, writes an exclusive one.
///
/// # Example
///
/// ```
/// use dax_registry::Registry;
/// use dax_store::InMemoryLedger;
/// use dax_types::Department;
///
/// let registry = Registry::new();
/// let ledger = InMemoryLedger::new();
///
/// let mut inv = ledger.begin();
/// registry.create(&mut inv, Department::new("Department1", "Eng", "role:admin level:3")).unwrap();
/// inv.commit().unwrap();
///
/// let inv = ledger.begin();
/// let dept: Department = registry.read(&inv, "Department1").unwrap();
/// assert_eq!(dept.name, "Eng");
/// ```
#[derive(Clone, Debug)]
pub struct Registry<C = JsonCodec> {
    codec: C,
    config: RegistryConfig,
}

impl Registry<JsonCodec> {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            codec: JsonCodec,
            config,
        }
    }
}

impl Default for Registry<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RecordCodec> Registry<C> {
    pub fn with_codec(codec: C, config: RegistryConfig) -> Self {
        Self { codec, config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    fn view<'a, S: LedgerStub + ?Sized>(&'a self, stub: &'a S) -> RecordView<'a, S, C> {
        RecordView::new(stub, &self.codec)
    }

    fn store<'a, S: LedgerStub + ?Sized>(&'a self, stub: &'a mut S) -> RecordStore<'a, S, C> {
        RecordStore::new(stub, &self.codec)
    }

    /// Argument checks that run before any ledger access.
    ///
    /// A key is never empty and never inside another kind's key range,
    /// whatever the configuration says.
    fn admit<R: Record>(&self, record: &R) -> RegistryResult<()> {
        let key = record.key();
        if key.is_empty() {
            return Err(TypeError::InvalidKey {
                kind: R::KIND,
                key: String::new(),
                reason: "key must not be empty".into(),
            }
            .into());
        }
        if let Some(owner) = RecordKind::of_key(key).filter(|&owner| owner != R::KIND) {
            return Err(TypeError::InvalidKey {
                kind: R::KIND,
                key: key.to_string(),
                reason: format!("key belongs to {owner} records"),
            }
            .into());
        }
        if self.config.strict_keys {
            validate_key(R::KIND, key, self.config.max_key_digits)?;
        }
        record.validate()?;
        Ok(())
    }

    pub fn exists<R: Record, S: LedgerStub + ?Sized>(
        &self,
        stub: &S,
        key: &str,
    ) -> RegistryResult<bool> {
        handler::exists::<R, _, _>(self.view(stub), key)
    }

    /// Create `record`. Fails if its key is taken or a foreign key does not
    /// resolve.
    pub fn create<R: Record, S: LedgerStub + ?Sized>(
        &self,
        stub: &mut S,
        record: R,
    ) -> RegistryResult<R> {
        self.admit(&record).inspect_err(|err| {
            warn!(kind = %R::KIND, key = record.key(), error = %err, "create rejected");
        })?;
        handler::create(&mut self.store(stub), record)
    }

    pub fn read<R: Record, S: LedgerStub + ?Sized>(
        &self,
        stub: &S,
        key: &str,
    ) -> RegistryResult<R> {
        handler::read(self.view(stub), key)
    }

    /// Replace the one mutable field of the record at `key`.
    pub fn update<R: MutableRecord, S: LedgerStub + ?Sized>(
        &self,
        stub: &mut S,
        key: &str,
        value: R::Value,
    ) -> RegistryResult<R> {
        R::validate_value(&value).inspect_err(|err| {
            warn!(kind = %R::KIND, key, error = %err, "update rejected");
        })?;
        handler::update(&mut self.store(stub), key, value)
    }

    /// All records of kind `R` in ascending key order.
    pub fn list<R: Record, S: LedgerStub + ?Sized>(&self, stub: &S) -> RegistryResult<Vec<R>> {
        handler::list(self.view(stub))
    }

    /// All records of kind `R` as an encoded array.
    pub fn list_encoded<R: Record, S: LedgerStub + ?Sized>(
        &self,
        stub: &S,
    ) -> RegistryResult<String> {
        let records = self.list::<R, S>(stub)?;
        query::encode_list(&self.codec, &records)
    }

    /// Remove the record at `key`, returning it as it was before removal.
    pub fn delete<R: Record, S: LedgerStub + ?Sized>(
        &self,
        stub: &mut S,
        key: &str,
    ) -> RegistryResult<R> {
        handler::delete(&mut self.store(stub), key)
    }

    /// Encode a value with the registry's codec.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> RegistryResult<String> {
        self.codec.encode_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use dax_store::{EventFilter, InMemoryLedger, Invocation};
    use dax_types::{
        AttributeApplication, AttributeItem, DataAsset, DataAssetOrder, DbAsset, DbAssetOrder,
        Department, RecordKind, Status, VideoAsset, VideoAssetOrder,
    };

    /// Run `f` in one invocation; commit on success, discard on failure.
    fn submit<T>(
        ledger: &InMemoryLedger,
        f: impl FnOnce(&mut Invocation<'_>) -> RegistryResult<T>,
    ) -> RegistryResult<T> {
        let mut inv = ledger.begin();
        let out = f(&mut inv)?;
        inv.commit()?;
        Ok(out)
    }

    fn department(id: &str) -> Department {
        Department::new(id, "Eng", "role:admin level:3")
    }

    fn data_asset(id: &str, owner: &str) -> DataAsset {
        DataAsset {
            id: id.into(),
            name: "Sales Data".into(),
            owner_id: owner.into(),
            policy: "policy-A".into(),
            location: "us-east".into(),
            field: "finance".into(),
            cid: "cid123".into(),
            aes_key: "key456".into(),
            enc_type: 1,
        }
    }

    fn db_asset(id: &str, owner: &str) -> DbAsset {
        DbAsset {
            id: id.into(),
            name: "Orders DB".into(),
            owner_id: owner.into(),
            policy: "policy-B".into(),
            location: "eu-west".into(),
            field: "ops".into(),
            jdbc_url: "jdbc:postgresql://db:5432/orders".into(),
            username: "reader".into(),
            password: "hunter2".into(),
            aes_key: "key789".into(),
            enc_type: 2,
        }
    }

    fn video_asset(id: &str, owner: &str) -> VideoAsset {
        VideoAsset {
            id: id.into(),
            name: "Lobby Camera".into(),
            owner_id: owner.into(),
            policy: "policy-C".into(),
            location: "hq".into(),
            field: "security".into(),
            rtsp_url: "rtsp://cam/lobby".into(),
            aes_key: "key000".into(),
            enc_type: 0,
        }
    }

    /// A ledger holding one department and one asset of each asset kind.
    fn seeded() -> (Registry, InMemoryLedger) {
        let registry = Registry::new();
        let ledger = InMemoryLedger::new();
        submit(&ledger, |inv| registry.create(inv, department("Department1"))).unwrap();
        submit(&ledger, |inv| {
            registry.create(inv, data_asset("DataAsset1", "Department1"))
        })
        .unwrap();
        submit(&ledger, |inv| registry.create(inv, db_asset("DBAsset1", "Department1"))).unwrap();
        submit(&ledger, |inv| {
            registry.create(inv, video_asset("VideoAsset1", "Department1"))
        })
        .unwrap();
        (registry, ledger)
    }

    // -----------------------------------------------------------------------
    // Create / exists / read
    // -----------------------------------------------------------------------

    #[test]
    fn create_then_read_every_kind() {
        let (registry, ledger) = seeded();
        let data_order =
            DataAssetOrder::new("DataAssetOrder1", "DataAsset1", "Department1", Status::Pending);
        let db_order =
            DbAssetOrder::new("DBAssetOrder1", "DBAsset1", "Department1", "SELECT * FROM t");
        let video_order = VideoAssetOrder::new(
            "VideoAssetOrder1",
            "VideoAsset1",
            "Department1",
            Status::Approved,
        );
        let application = AttributeApplication::new(
            "AttributeApplication1",
            "Department1",
            "clearance:high",
            Status::Pending,
        );
        let item = AttributeItem::new("AttributeItem1", "clearance:high");

        let inv = ledger.begin();
        assert!(!registry.exists::<DataAssetOrder, _>(&inv, "DataAssetOrder1").unwrap());
        drop(inv);

        submit(&ledger, |inv| registry.create(inv, data_order.clone())).unwrap();
        submit(&ledger, |inv| registry.create(inv, db_order.clone())).unwrap();
        submit(&ledger, |inv| registry.create(inv, video_order.clone())).unwrap();
        submit(&ledger, |inv| registry.create(inv, application.clone())).unwrap();
        submit(&ledger, |inv| registry.create(inv, item.clone())).unwrap();

        let inv = ledger.begin();
        assert!(registry.exists::<DataAssetOrder, _>(&inv, "DataAssetOrder1").unwrap());
        assert_eq!(
            registry.read::<Department, _>(&inv, "Department1").unwrap(),
            department("Department1")
        );
        assert_eq!(
            registry.read::<DataAsset, _>(&inv, "DataAsset1").unwrap(),
            data_asset("DataAsset1", "Department1")
        );
        assert_eq!(
            registry.read::<DbAsset, _>(&inv, "DBAsset1").unwrap(),
            db_asset("DBAsset1", "Department1")
        );
        assert_eq!(
            registry.read::<VideoAsset, _>(&inv, "VideoAsset1").unwrap(),
            video_asset("VideoAsset1", "Department1")
        );
        assert_eq!(
            registry.read::<DataAssetOrder, _>(&inv, "DataAssetOrder1").unwrap(),
            data_order
        );
        assert_eq!(registry.read::<DbAssetOrder, _>(&inv, "DBAssetOrder1").unwrap(), db_order);
        assert_eq!(
            registry.read::<VideoAssetOrder, _>(&inv, "VideoAssetOrder1").unwrap(),
            video_order
        );
        assert_eq!(
            registry.read::<AttributeApplication, _>(&inv, "AttributeApplication1").unwrap(),
            application
        );
        assert_eq!(registry.read::<AttributeItem, _>(&inv, "AttributeItem1").unwrap(), item);
    }

    #[test]
    fn walkthrough_example() {
        let registry = Registry::new();
        let ledger = InMemoryLedger::new();

        let dept = submit(&ledger, |inv| {
            registry.create(inv, Department::new("Department1", "Eng", "role:admin level:3"))
        })
        .unwrap();
        assert_eq!(dept.id, "Department1");
        assert_eq!(dept.name, "Eng");
        assert_eq!(dept.attribute, "role:admin level:3");

        submit(&ledger, |inv| {
            registry.create(inv, data_asset("DataAsset1", "Department1"))
        })
        .unwrap();

        let err = submit(&ledger, |inv| {
            registry.create(inv, data_asset("DataAsset2", "Department2"))
        })
        .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { kind: RecordKind::Department, .. }));
        assert_eq!(err.code(), "ASSET_NOT_FOUND");
        assert!(!registry.exists::<DataAsset, _>(&ledger.begin(), "DataAsset2").unwrap());
    }

    #[test]
    fn duplicate_create_leaves_original() {
        let (registry, ledger) = seeded();
        let mut impostor = data_asset("DataAsset1", "Department1");
        impostor.name = "Replacement".into();

        let events_before = ledger.events(&EventFilter::all()).unwrap().len();
        let err = submit(&ledger, |inv| registry.create(inv, impostor)).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyExists { .. }));
        assert_eq!(err.to_string(), "DataAsset DataAsset1 already exists");

        let stored: DataAsset = registry.read(&ledger.begin(), "DataAsset1").unwrap();
        assert_eq!(stored, data_asset("DataAsset1", "Department1"));
        assert_eq!(ledger.events(&EventFilter::all()).unwrap().len(), events_before);
    }

    #[test]
    fn order_reference_checks() {
        let (registry, ledger) = seeded();

        // Missing asset is reported even though the applicant is missing too.
        let order =
            DataAssetOrder::new("DataAssetOrder1", "DataAsset9", "Department9", Status::Pending);
        let err = submit(&ledger, |inv| registry.create(inv, order)).unwrap_err();
        assert_eq!(err.to_string(), "DataAsset DataAsset9 does not exist");

        let order =
            VideoAssetOrder::new("VideoAssetOrder1", "VideoAsset1", "Department9", Status::Pending);
        let err = submit(&ledger, |inv| registry.create(inv, order)).unwrap_err();
        assert_eq!(err.to_string(), "Department Department9 does not exist");

        let app = AttributeApplication::new(
            "AttributeApplication1",
            "Department9",
            "a:b",
            Status::Pending,
        );
        assert!(submit(&ledger, |inv| registry.create(inv, app)).is_err());

        let inv = ledger.begin();
        assert!(!registry.exists::<DataAssetOrder, _>(&inv, "DataAssetOrder1").unwrap());
        assert!(!registry.exists::<VideoAssetOrder, _>(&inv, "VideoAssetOrder1").unwrap());
    }

    #[test]
    fn department_inputs_are_validated() {
        let registry = Registry::new();
        let ledger = InMemoryLedger::new();
        let bad_id = submit(&ledger, |inv| {
            registry.create(inv, Department::new("Dept1", "Eng", "a:b"))
        });
        assert_eq!(bad_id.unwrap_err().code(), "INVALID_ARGUMENT");
        let bad_attr = submit(&ledger, |inv| {
            registry.create(inv, Department::new("Department1", "Eng", "admin"))
        });
        assert_eq!(bad_attr.unwrap_err().code(), "INVALID_ARGUMENT");
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn strict_keys_apply_to_every_kind() {
        let ledger = InMemoryLedger::new();
        let lenient = Registry::new();
        let strict = Registry::with_config(RegistryConfig::strict());

        let err = submit(&ledger, |inv| {
            strict.create(inv, AttributeItem::new("item-1", "x"))
        })
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        submit(&ledger, |inv| lenient.create(inv, AttributeItem::new("item-1", "x"))).unwrap();
        submit(&ledger, |inv| {
            strict.create(inv, AttributeItem::new("AttributeItem1", "x"))
        })
        .unwrap();
    }

    #[test]
    fn keys_of_other_kinds_are_rejected_without_strict_keys() {
        let (registry, ledger) = seeded();

        let err = submit(&ledger, |inv| {
            registry.create(inv, AttributeItem::new("Department5", "x"))
        })
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        let err = submit(&ledger, |inv| {
            registry.create(inv, data_asset("DataAssetOrder3", "Department1"))
        })
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert!(!registry.exists::<AttributeItem, _>(&ledger.begin(), "Department5").unwrap());

        let departments: Vec<Department> = registry.list(&ledger.begin()).unwrap();
        assert_eq!(departments, vec![department("Department1")]);
        let err = submit(&ledger, |inv| {
            registry.create(inv, data_asset("DataAsset2", "Department5"))
        })
        .unwrap_err();
        assert_eq!(err.code(), "ASSET_NOT_FOUND");
    }

    #[test]
    fn empty_keys_are_invalid_arguments() {
        let ledger = InMemoryLedger::new();
        let registry = Registry::new();
        let err = submit(&ledger, |inv| {
            registry.create(inv, AttributeItem::new("", "x"))
        })
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert!(ledger.is_empty().unwrap());
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    #[test]
    fn update_status_touches_only_status() {
        let (registry, ledger) = seeded();
        let order =
            DataAssetOrder::new("DataAssetOrder1", "DataAsset1", "Department1", Status::Pending);
        submit(&ledger, |inv| registry.create(inv, order.clone())).unwrap();

        let updated = submit(&ledger, |inv| {
            registry.update::<DataAssetOrder, _>(inv, "DataAssetOrder1", Status::Approved)
        })
        .unwrap();
        assert_eq!(updated.status, Status::Approved);
        assert_eq!(
            DataAssetOrder {
                status: Status::Pending,
                ..updated.clone()
            },
            order
        );

        let stored: DataAssetOrder = registry.read(&ledger.begin(), "DataAssetOrder1").unwrap();
        assert_eq!(stored, updated);
        let events = ledger.events(&EventFilter::named("UpdateDataAssetOrderStatus")).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload, registry.codec().encode(&updated).unwrap());
    }

    #[test]
    fn update_department_attribute() {
        let (registry, ledger) = seeded();
        let updated = submit(&ledger, |inv| {
            registry.update::<Department, _>(inv, "Department1", "role:viewer".into())
        })
        .unwrap();
        assert_eq!(updated, Department::new("Department1", "Eng", "role:viewer"));

        let err = submit(&ledger, |inv| {
            registry.update::<Department, _>(inv, "Department1", "not an attribute".into())
        })
        .unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        let stored: Department = registry.read(&ledger.begin(), "Department1").unwrap();
        assert_eq!(stored.attribute, "role:viewer");
    }

    #[test]
    fn update_of_missing_key_fails() {
        let (registry, ledger) = seeded();
        let err = submit(&ledger, |inv| {
            registry.update::<AttributeApplication, _>(
                inv,
                "AttributeApplication4",
                Status::Rejected,
            )
        })
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NotFound { kind: RecordKind::AttributeApplication, .. }
        ));
    }

    // -----------------------------------------------------------------------
    // List
    // -----------------------------------------------------------------------

    #[test]
    fn list_orders_by_key_and_excludes_siblings() {
        let (registry, ledger) = seeded();
        for id in ["DataAsset2", "DataAsset10"] {
            submit(&ledger, |inv| registry.create(inv, data_asset(id, "Department1"))).unwrap();
        }
        let order =
            DataAssetOrder::new("DataAssetOrder1", "DataAsset1", "Department1", Status::Pending);
        submit(&ledger, |inv| registry.create(inv, order)).unwrap();

        let inv = ledger.begin();
        let listed: Vec<DataAsset> = registry.list(&inv).unwrap();
        let ids: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["DataAsset1", "DataAsset10", "DataAsset2"]);
        assert_eq!(ledger.open_cursors(), 0);

        let orders: Vec<DataAssetOrder> = registry.list(&inv).unwrap();
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn list_finds_long_suffixes() {
        let registry = Registry::new();
        let ledger = InMemoryLedger::new();
        let long_id = format!("AttributeItem{}", "9".repeat(30));
        submit(&ledger, |inv| {
            registry.create(inv, AttributeItem::new(long_id.clone(), "x"))
        })
        .unwrap();
        let listed: Vec<AttributeItem> = registry.list(&ledger.begin()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, long_id);
    }

    #[test]
    fn list_encoded_is_a_json_array() {
        let (registry, ledger) = seeded();
        let inv = ledger.begin();
        let encoded = registry.list_encoded::<Department, _>(&inv).unwrap();
        assert_eq!(
            encoded,
            r#"[{"attribute":"role:admin level:3","id":"Department1","name":"Eng"}]"#
        );
        assert_eq!(registry.list_encoded::<AttributeItem, _>(&inv).unwrap(), "[]");
    }

    #[test]
    fn list_sees_uncommitted_writes() {
        let (registry, ledger) = seeded();
        let mut inv = ledger.begin();
        registry.create(&mut inv, department("Department2")).unwrap();
        let listed: Vec<Department> = registry.list(&inv).unwrap();
        assert_eq!(listed.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_attribute_item() {
        let registry = Registry::new();
        let ledger = InMemoryLedger::new();
        let item = AttributeItem::new("AttributeItem1", "clearance:high");
        submit(&ledger, |inv| registry.create(inv, item.clone())).unwrap();

        let removed = submit(&ledger, |inv| {
            registry.delete::<AttributeItem, _>(inv, "AttributeItem1")
        })
        .unwrap();
        assert_eq!(removed, item);

        let inv = ledger.begin();
        assert!(!registry.exists::<AttributeItem, _>(&inv, "AttributeItem1").unwrap());
        let err = registry.read::<AttributeItem, _>(&inv, "AttributeItem1").unwrap_err();
        assert_eq!(err.code(), "ASSET_NOT_FOUND");

        let events = ledger.events(&EventFilter::named("DeleteAttributeItem")).unwrap();
        assert_eq!(
            events[0].payload_str(),
            Some(r#"{"content":"clearance:high","id":"AttributeItem1"}"#)
        );

        let again = submit(&ledger, |inv| {
            registry.delete::<AttributeItem, _>(inv, "AttributeItem1")
        });
        assert!(matches!(again, Err(RegistryError::NotFound { .. })));
    }

    // -----------------------------------------------------------------------
    // Atomicity
    // -----------------------------------------------------------------------

    #[test]
    fn failed_invocations_commit_nothing() {
        let (registry, ledger) = seeded();
        let height = ledger.height().unwrap();
        let events = ledger.events(&EventFilter::all()).unwrap();

        let _ = submit(&ledger, |inv| {
            registry.create(inv, AttributeItem::new("AttributeItem1", "x"))?;
            registry.create(inv, data_asset("DataAsset2", "Department404"))
        });

        assert_eq!(ledger.height().unwrap(), height);
        assert_eq!(ledger.events(&EventFilter::all()).unwrap(), events);
        assert!(!registry.exists::<AttributeItem, _>(&ledger.begin(), "AttributeItem1").unwrap());
    }

    #[test]
    fn each_create_emits_its_event() {
        let (_, ledger) = seeded();
        let names: Vec<String> = ledger
            .events(&EventFilter::all())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(
            names,
            vec!["CreateDepartment", "CreateDataAsset", "CreateDBAsset", "CreateVideoAsset"]
        );
    }
}
