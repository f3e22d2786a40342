use anyhow::{Context, Result, anyhow};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::EncodingError;

/// Argon2id tuning knobs: memory cost, iterations and lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KdfParams {
    memory_kib: u32,
    iterations: u32,
    parallelism: u8,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // default memory cost
            memory_kib: 64 * 1024, // 64 MiB
            // default number of passes
            iterations: 3,
            // default number of lanes
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u8) -> Result<Self, EncodingError> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn parallelism(&self) -> u8 {
        self.parallelism
    }

    /// Checks the invariants every encoded hash must satisfy.
    ///
    /// Argon2 imposes a stricter floor on memory (8 KiB per lane); that one
    /// is reported by [`derive_key`], not here, so that any hash string with
    /// positive values can still be represented and inspected.
    pub fn validate(&self) -> Result<(), EncodingError> {
        if self.memory_kib == 0 {
            return Err(EncodingError::InvalidParameters("memory cost must be >= 1"));
        }
        if self.iterations == 0 {
            return Err(EncodingError::InvalidParameters("iterations must be >= 1"));
        }
        if self.parallelism == 0 {
            return Err(EncodingError::InvalidParameters("parallelism must be >= 1"));
        }
        Ok(())
    }
}

/// Full parameter record of one hash: tuning knobs plus salt and key lengths.
///
/// The lengths are always taken from actual byte slices, so they cannot
/// disagree with the salt and key they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HashParams {
    #[serde(flatten)]
    kdf: KdfParams,
    salt_len: usize,
    key_len: usize,
}

impl HashParams {
    pub fn describe(kdf: KdfParams, salt: &[u8], key: &[u8]) -> Self {
        Self {
            kdf,
            salt_len: salt.len(),
            key_len: key.len(),
        }
    }

    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn memory_kib(&self) -> u32 {
        self.kdf.memory_kib
    }

    pub fn iterations(&self) -> u32 {
        self.kdf.iterations
    }

    pub fn parallelism(&self) -> u8 {
        self.kdf.parallelism
    }

    pub fn salt_len(&self) -> usize {
        self.salt_len
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }
}

/// Derive `key_len` bytes from a password with Argon2id v0x13.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    kdf: KdfParams,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    kdf.validate().context("invalid Argon2 parameters")?;

    let params = Params::new(
        kdf.memory_kib,
        kdf.iterations,
        u32::from(kdf.parallelism),
        Some(key_len),
    )
    .map_err(|e| anyhow!("failed to construct Argon2 params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|e| anyhow!("argon2 key derivation failed: {e}"))?;

    Ok(key)
}
