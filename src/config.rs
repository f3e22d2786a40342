//! Hashing configuration: tuning defaults plus salt and key sizes.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::crypto::{KEY_LEN, KdfParams, MAX_MEMORY_KIB, MIN_KEY_LEN, MIN_SALT_LEN, SALT_LEN};

/// Settings used when hashing new passwords.
///
/// Verification only consults `max_memory_kib`: stored hashes carry their
/// own parameters, but the memory they may demand is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct HashConfig {
    kdf: KdfParams,
    salt_len: usize,
    key_len: usize,
    max_memory_kib: u32,
}

/// On-disk shape of [`HashConfig`]; validated on conversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    memory_kib: u32,
    iterations: u32,
    parallelism: u8,
    salt_len: usize,
    key_len: usize,
    max_memory_kib: u32,
}

impl Default for RawConfig {
    fn default() -> Self {
        HashConfig::default().into()
    }
}

impl TryFrom<RawConfig> for HashConfig {
    type Error = anyhow::Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let kdf = KdfParams::new(raw.memory_kib, raw.iterations, raw.parallelism)?;
        Self::new(kdf, raw.salt_len, raw.key_len)?.with_max_memory_kib(raw.max_memory_kib)
    }
}

impl From<HashConfig> for RawConfig {
    fn from(config: HashConfig) -> Self {
        Self {
            memory_kib: config.kdf.memory_kib(),
            iterations: config.kdf.iterations(),
            parallelism: config.kdf.parallelism(),
            salt_len: config.salt_len,
            key_len: config.key_len,
            max_memory_kib: config.max_memory_kib,
        }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            kdf: KdfParams::default(),
            salt_len: SALT_LEN,
            key_len: KEY_LEN,
            max_memory_kib: MAX_MEMORY_KIB,
        }
    }
}

impl HashConfig {
    pub fn new(kdf: KdfParams, salt_len: usize, key_len: usize) -> Result<Self> {
        let config = Self {
            kdf,
            salt_len,
            key_len,
            max_memory_kib: MAX_MEMORY_KIB.max(kdf.memory_kib()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the largest memory cost a stored hash may demand on verification.
    pub fn with_max_memory_kib(self, max_memory_kib: u32) -> Result<Self> {
        let config = Self {
            max_memory_kib,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON config file. Missing fields fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds values that fail [`HashConfig::validate`].
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }

    pub fn max_memory_kib(&self) -> u32 {
        self.max_memory_kib
    }

    pub fn validate(&self) -> Result<()> {
        self.kdf.validate()?;
        if self.salt_len < MIN_SALT_LEN {
            bail!("salt length must be >= {MIN_SALT_LEN} bytes");
        }
        if self.key_len < MIN_KEY_LEN {
            bail!("key length must be >= {MIN_KEY_LEN} bytes");
        }
        if self.max_memory_kib < self.kdf.memory_kib() {
            bail!("memory limit must not be below the configured memory cost");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = HashConfig::default();
        assert_eq!(config.kdf().memory_kib(), 65536);
        assert_eq!(config.kdf().iterations(), 3);
        assert_eq!(config.kdf().parallelism(), 1);
        assert_eq!(config.salt_len(), 16);
        assert_eq!(config.key_len(), 32);
        assert_eq!(config.max_memory_kib(), 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = HashConfig::from_json(r#"{"memory_kib": 19456, "iterations": 2}"#).unwrap();
        assert_eq!(config.kdf().memory_kib(), 19456);
        assert_eq!(config.kdf().iterations(), 2);
        assert_eq!(config.kdf().parallelism(), 1);
        assert_eq!(config.salt_len(), 16);
    }

    #[test]
    fn json_roundtrip() {
        let config = HashConfig::new(KdfParams::new(1024, 2, 4).unwrap(), 24, 64).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(HashConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(HashConfig::from_json(r#"{"iterations": 0}"#).is_err());
        assert!(HashConfig::from_json(r#"{"parallelism": 256}"#).is_err());
        assert!(HashConfig::from_json(r#"{"salt_len": 4}"#).is_err());
        assert!(HashConfig::from_json(r#"{"key_len": 2}"#).is_err());
        assert!(HashConfig::from_json(r#"{"memory": 1024}"#).is_err());
        assert!(HashConfig::from_json("not json").is_err());
    }

    #[test]
    fn memory_limit_must_cover_own_hashes() {
        let config = HashConfig::from_json(r#"{"memory_kib": 2048, "max_memory_kib": 4096}"#).unwrap();
        assert_eq!(config.max_memory_kib(), 4096);

        assert!(HashConfig::from_json(r#"{"memory_kib": 2048, "max_memory_kib": 1024}"#).is_err());
        assert!(HashConfig::default().with_max_memory_kib(1024).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashnest.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"memory_kib": 2048, "salt_len": 32}}"#).unwrap();

        let config = HashConfig::from_json_file(&path).unwrap();
        assert_eq!(config.kdf().memory_kib(), 2048);
        assert_eq!(config.salt_len(), 32);
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(HashConfig::from_json_file(&dir.path().join("nope.json")).is_err());
    }
}
