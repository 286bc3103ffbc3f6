//! Record encoding.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RegistryError, RegistryResult};

/// Converts records to and from the bytes stored in the ledger.
///
/// Implementations must be deterministic: the same value always encodes to
/// the same bytes, and decoding an encoding yields an equal value.
pub trait RecordCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> RegistryResult<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> RegistryResult<T>;

    /// Encode `value` as UTF-8 text.
    fn encode_string<T: Serialize + ?Sized>(&self, value: &T) -> RegistryResult<String> {
        String::from_utf8(self.encode(value)?).map_err(|e| RegistryError::Codec(e.to_string()))
    }
}

/// Compact JSON with object keys in sorted order.
///
/// Values go through `serde_json::Value` first, whose maps are ordered, so
/// the output does not depend on struct field order.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl RecordCodec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> RegistryResult<Vec<u8>> {
        let value = serde_json::to_value(value).map_err(|e| RegistryError::Codec(e.to_string()))?;
        serde_json::to_vec(&value).map_err(|e| RegistryError::Codec(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> RegistryResult<T> {
        serde_json::from_slice(bytes).map_err(|e| RegistryError::Codec(e.to_string()))
    }
}
