use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::HashConfig;
use crate::crypto::{self, HashParams};
use crate::error::EncodingError;
use crate::format;
use crate::verify;

/// Hashes and verifies passwords with an explicit configuration.
///
/// Holds no state besides its configuration, so one instance can be
/// shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    config: HashConfig,
}

impl Hasher {
    pub fn new(config: HashConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Hashes `password` with a fresh salt and returns the encoded string.
    pub fn hash(&self, password: &[u8]) -> Result<String> {
        let config = &self.config;
        let salt = crypto::generate_salt(config.salt_len())?;
        let key = crypto::derive_key(password, &salt, *config.kdf(), config.key_len())
            .context("failed to derive password hash")?;

        let encoded = format::encode(config.kdf(), &salt, &key)?;
        log_params("password hashed", &HashParams::describe(*config.kdf(), &salt, &key));
        Ok(encoded)
    }

    /// Verifies `password` against a stored hash.
    ///
    /// Decoding failures are logged with their specific kind and then
    /// returned; callers should report them to users as a plain
    /// authentication failure.
    pub fn verify(&self, password: &[u8], encoded: &str) -> Result<bool> {
        let decoded = match format::decode(encoded) {
            Ok(decoded) => decoded,
            Err(err @ EncodingError::IncompatibleVersion { found, expected }) => {
                warn!(found, expected, "stored hash uses another argon2 version; rehash required");
                return Err(err.into());
            }
            Err(err) => {
                warn!(error = %err, "stored hash could not be decoded");
                return Err(err.into());
            }
        };

        let matched = verify::verify_decoded(password, &decoded, self.config.max_memory_kib())
            .inspect_err(|err| warn!(error = %err, "stored hash could not be verified"))?;
        if matched {
            log_params("password verified", decoded.params());
        } else {
            info!("password did not match stored hash");
        }
        Ok(matched)
    }
}

fn log_params(msg: &str, params: &HashParams) {
    debug!(
        memory_kib = params.memory_kib(),
        iterations = params.iterations(),
        parallelism = params.parallelism(),
        salt_len = params.salt_len(),
        key_len = params.key_len(),
        "{msg}"
    );
}
