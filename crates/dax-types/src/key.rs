//! Key and attribute-string validation.
//!
//! Valid record keys:
//! - Start with the kind prefix (`Department`, `DataAsset`, ...)
//! - Continue with 1 to `max_digits` ASCII digits and nothing else
//!
//! Valid attribute strings are one or more `key:value` tokens separated by
//! single spaces, where both sides of every token are non-empty runs of
//! ASCII letters, digits, or `_`.

use crate::error::TypeError;
use crate::kind::RecordKind;

/// Longest numeric suffix accepted by default.
pub const DEFAULT_MAX_KEY_DIGITS: usize = 20;

/// Validate `key` as a key of `kind`.
///
/// # Examples
///
/// ```
/// use dax_types::{validate_key, RecordKind};
///
/// assert!(validate_key(RecordKind::DataAsset, "DataAsset12", 20).is_ok());
/// assert!(validate_key(RecordKind::DataAsset, "DataAssetOrder12", 20).is_err());
/// assert!(validate_key(RecordKind::DataAsset, "DataAsset", 20).is_err());
/// ```
pub fn validate_key(kind: RecordKind, key: &str, max_digits: usize) -> Result<(), TypeError> {
    let invalid = |reason: String| TypeError::InvalidKey {
        kind,
        key: key.to_string(),
        reason,
    };

    let suffix = key
        .strip_prefix(kind.prefix())
        .ok_or_else(|| invalid(format!("must start with {:?}", kind.prefix())))?;

    if suffix.is_empty() {
        return Err(invalid("missing numeric suffix".into()));
    }
    if let Some(ch) = suffix.chars().find(|c| !c.is_ascii_digit()) {
        return Err(invalid(format!("suffix contains non-digit {ch:?}")));
    }
    if suffix.len() > max_digits {
        return Err(invalid(format!(
            "suffix has {} digits, at most {max_digits} allowed",
            suffix.len()
        )));
    }
    Ok(())
}

/// Validate a department id (`Department` followed by 1 to 20 digits).
pub fn validate_department_id(id: &str) -> Result<(), TypeError> {
    validate_key(RecordKind::Department, id, DEFAULT_MAX_KEY_DIGITS)
}

/// Validate a space-separated `key:value` attribute string.
pub fn validate_attribute(attribute: &str) -> Result<(), TypeError> {
    let invalid = |reason: String| TypeError::InvalidAttribute {
        attribute: attribute.to_string(),
        reason,
    };

    if attribute.is_empty() {
        return Err(invalid("attribute string must not be empty".into()));
    }

    for (i, token) in attribute.split(' ').enumerate() {
        let Some((name, value)) = token.split_once(':') else {
            return Err(invalid(format!("token {i} ({token:?}) is missing ':'")));
        };
        if !is_word(name) {
            return Err(invalid(format!("token {i} has an invalid name {name:?}")));
        }
        if !is_word(value) {
            return Err(invalid(format!("token {i} has an invalid value {value:?}")));
        }
    }
    Ok(())
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
