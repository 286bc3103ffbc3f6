//! Listing every record of one kind.
//!
//! Keys of all kinds share one flat namespace, so a kind's records are found
//! by scanning `[prefix, prefix_upper_bound(prefix))`. That interval also
//! holds keys of kinds whose name extends the prefix (`DataAssetOrder7`
//! under `DataAsset`); those are skipped by requiring an all-digit suffix.

use dax_store::{KeyRange, LedgerStub};
use dax_types::{Record, RecordKind};
use tracing::debug;

use crate::codec::RecordCodec;
use crate::error::RegistryResult;
use crate::store::RecordView;

/// The key interval scanned to list `kind`.
pub fn kind_range(kind: RecordKind) -> KeyRange {
    KeyRange::prefix(kind.prefix())
}

/// Decode every record of kind `R`, in ascending key order.
pub fn list<R, S, C>(view: RecordView<'_, S, C>) -> RegistryResult<Vec<R>>
where
    R: Record,
    S: LedgerStub + ?Sized,
    C: RecordCodec,
{
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for entry in view.scan(&kind_range(R::KIND))? {
        let entry = entry?;
        if !R::KIND.owns_key(&entry.key) || entry.value.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(view.codec().decode(&entry.value)?);
    }
    debug!(kind = %R::KIND, count = records.len(), skipped, "listed records");
    Ok(records)
}

/// Package a list response as an encoded array.
pub fn encode_list<R, C>(codec: &C, records: &[R]) -> RegistryResult<String>
where
    R: Record,
    C: RecordCodec,
{
    codec.encode_string(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::store::RecordStore;
    use dax_store::InMemoryLedger;
    use dax_types::{AttributeItem, DataAsset};
    use proptest::prelude::*;

    fn item(id: &str) -> AttributeItem {
        AttributeItem::new(id, format!("content of {id}"))
    }

    #[test]
    fn range_covers_long_suffixes() {
        let range = kind_range(RecordKind::DataAsset);
        assert!(range.contains(&format!("DataAsset{}", "9".repeat(40))));
        assert!(!range.contains("DataAsseu1"));
    }

    #[test]
    fn lists_in_key_order_and_skips_other_kinds() {
        let ledger = InMemoryLedger::new();
        let mut inv = ledger.begin();
        {
            let mut store = RecordStore::new(&mut inv, &JsonCodec);
            for id in ["AttributeItem2", "AttributeItem10", "AttributeItem1"] {
                store.put(&item(id)).unwrap();
            }
        }
        inv.put_state("AttributeItemX", b"{}".to_vec()).unwrap();
        inv.put_state("AttributeApplication1", b"{}".to_vec()).unwrap();

        let listed: Vec<AttributeItem> = list(RecordView::new(&inv, &JsonCodec)).unwrap();
        let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["AttributeItem1", "AttributeItem10", "AttributeItem2"]);
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn decode_failure_releases_the_cursor() {
        let ledger = InMemoryLedger::new();
        let mut inv = ledger.begin();
        inv.put_state("DataAsset1", b"garbage".to_vec()).unwrap();
        assert!(list::<DataAsset, _, _>(RecordView::new(&inv, &JsonCodec)).is_err());
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn empty_list_encodes_as_empty_array() {
        assert_eq!(encode_list::<AttributeItem, _>(&JsonCodec, &[]).unwrap(), "[]");
        let encoded = encode_list(&JsonCodec, &[item("AttributeItem1")]).unwrap();
        assert!(encoded.starts_with(r#"[{"content":"#));
    }

    proptest! {
        #[test]
        fn listing_returns_exactly_the_created_keys(
            ids in proptest::collection::btree_set(0u64..1_000_000_000_000, 0..12),
        ) {
            let ledger = InMemoryLedger::new();
            let mut inv = ledger.begin();
            {
                let mut store = RecordStore::new(&mut inv, &JsonCodec);
                for id in &ids {
                    store.put(&item(&format!("AttributeItem{id}"))).unwrap();
                }
            }
            let listed: Vec<AttributeItem> = list(RecordView::new(&inv, &JsonCodec)).unwrap();
            let mut expected: Vec<String> =
                ids.iter().map(|id| format!("AttributeItem{id}")).collect();
            expected.sort();
            let actual: Vec<String> = listed.into_iter().map(|r| r.id).collect();
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(ledger.open_cursors(), 0);
        }
    }
}
