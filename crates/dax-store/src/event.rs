use std::fmt;

use serde::{Deserialize, Serialize};

/// A named notification committed together with an invocation.
///
/// The payload is opaque to the ledger; the registry puts the encoded
/// record there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeEvent {
    /// Id of the invocation that produced the event.
    pub tx_id: String,
    /// Ledger height at which the invocation committed.
    pub height: u64,
    /// Event name, e.g. `CreateDepartment`.
    pub name: String,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
}

impl ChaincodeEvent {
    /// The payload as UTF-8 text, if it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

impl fmt::Display for ChaincodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.tx_id.get(..8).unwrap_or(self.tx_id.as_str());
        write!(f, "#{} {} ({short})", self.height, self.name)
    }
}

/// Selects a subset of committed events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events with one of these names are selected.
    pub names: Option<Vec<String>>,
    /// If set, only events committed above this height are selected.
    pub after_height: Option<u64>,
}

impl EventFilter {
    /// A filter that selects every event.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter that selects events with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            names: Some(vec![name.into()]),
            ..Self::default()
        }
    }

    /// Returns `true` if the event matches this filter.
    pub fn matches(&self, event: &ChaincodeEvent) -> bool {
        if let Some(ref names) = self.names {
            if !names.iter().any(|n| *n == event.name) {
                return false;
            }
        }
        if let Some(height) = self.after_height {
            if event.height <= height {
                return false;
            }
        }
        true
    }
}
