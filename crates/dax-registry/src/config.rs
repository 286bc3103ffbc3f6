use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dax_types::DEFAULT_MAX_KEY_DIGITS;

use crate::error::{RegistryError, RegistryResult};

/// Registry settings, usually loaded from a TOML file.
///
/// ```toml
/// strict_keys = true
/// max_key_digits = 12
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// When `true`, every create requires `<Kind><digits>` keys. Department
    /// ids are checked either way.
    pub strict_keys: bool,
    /// Longest numeric key suffix accepted under `strict_keys`.
    pub max_key_digits: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_keys: false,
            max_key_digits: DEFAULT_MAX_KEY_DIGITS,
        }
    }
}

impl RegistryConfig {
    /// Key pattern enforced for every kind.
    pub fn strict() -> Self {
        Self {
            strict_keys: true,
            ..Default::default()
        }
    }

    pub fn from_toml_str(s: &str) -> RegistryResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| RegistryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: &Path) -> RegistryResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> RegistryResult<String> {
        toml::to_string(self).map_err(|e| RegistryError::Config(e.to_string()))
    }

    pub fn validate(&self) -> RegistryResult<()> {
        if self.max_key_digits == 0 {
            return Err(RegistryError::Config("max_key_digits must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RegistryConfig::default();
        assert!(!config.strict_keys);
        assert_eq!(config.max_key_digits, 20);
        assert!(RegistryConfig::strict().strict_keys);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = RegistryConfig::from_toml_str("strict_keys = true").unwrap();
        assert_eq!(config, RegistryConfig::strict());
        assert_eq!(RegistryConfig::from_toml_str("").unwrap(), RegistryConfig::default());
    }

    #[test]
    fn zero_digits_is_rejected() {
        let err = RegistryConfig::from_toml_str("max_key_digits = 0").unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(RegistryConfig::from_toml_str("strict_keys = \"maybe\"").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        let config = RegistryConfig {
            strict_keys: true,
            max_key_digits: 8,
        };
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(RegistryConfig::load(&path).unwrap(), config);
        assert!(RegistryConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
