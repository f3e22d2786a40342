//! Encoded hash string format.
//!
//! A hash is stored as six `$`-delimited fields:
//! ```text
//! $argon2id$v=19$m=<KiB>,t=<passes>,p=<lanes>$<base64 salt>$<base64 key>
//! ```
//! Base64 uses the standard alphabet without padding. The leading field is
//! empty. Salt and key lengths are not written; they follow from the bytes.

mod fields;

use crate::crypto::{ALGORITHM_ID, ARGON2_VERSION, HashParams, KdfParams};
use crate::error::EncodingError;

/// Delimiter between the fields of an encoded hash.
pub const DELIMITER: char = '$';
/// Number of fields, counting the empty one before the leading delimiter.
pub const FIELD_COUNT: usize = 6;

/// A fully validated encoded hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHash {
    params: HashParams,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl DecodedHash {
    /// Returns the tuning parameters and the salt/key lengths.
    pub fn params(&self) -> &HashParams {
        &self.params
    }

    /// Returns the salt the key was derived with.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Returns the stored derived key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn into_parts(self) -> (HashParams, Vec<u8>, Vec<u8>) {
        (self.params, self.salt, self.key)
    }
}

/// Serializes tuning parameters, salt and derived key into an encoded hash.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidParameters`] if a tuning value is zero or
/// if the salt or key is empty.
pub fn encode(kdf: &KdfParams, salt: &[u8], key: &[u8]) -> Result<String, EncodingError> {
    kdf.validate()?;
    if salt.is_empty() {
        return Err(EncodingError::InvalidParameters("salt must not be empty"));
    }
    if key.is_empty() {
        return Err(EncodingError::InvalidParameters("key must not be empty"));
    }

    Ok(format!(
        "${ALGORITHM_ID}$v={ARGON2_VERSION}$m={},t={},p={}${}${}",
        kdf.memory_kib(),
        kdf.iterations(),
        kdf.parallelism(),
        fields::encode_b64(salt),
        fields::encode_b64(key),
    ))
}

/// Parses an encoded hash, validating every field.
///
/// # Errors
///
/// Returns [`EncodingError::IncompatibleVersion`] if the version tag is well
/// formed but differs from [`ARGON2_VERSION`], and
/// [`EncodingError::MalformedEncoding`] for any other deviation.
pub fn decode(text: &str) -> Result<DecodedHash, EncodingError> {
    // One extra piece is enough to detect too many fields.
    let parts: Vec<&str> = text.splitn(FIELD_COUNT + 1, DELIMITER).collect();
    let &[lead, algorithm, version, params, salt, key] = parts.as_slice() else {
        return Err(EncodingError::MalformedEncoding(
            "expected six $-delimited fields",
        ));
    };

    if !lead.is_empty() {
        return Err(EncodingError::MalformedEncoding(
            "encoded hash must start with $",
        ));
    }

    if algorithm != ALGORITHM_ID {
        return Err(EncodingError::MalformedEncoding("unsupported algorithm"));
    }

    let found = fields::parse_version(version)?;
    if found != ARGON2_VERSION {
        return Err(EncodingError::IncompatibleVersion {
            found,
            expected: ARGON2_VERSION,
        });
    }

    let kdf = fields::parse_params(params)?;
    let salt = fields::decode_b64(salt, "salt is not valid base64")?;
    let key = fields::decode_b64(key, "key is not valid base64")?;

    Ok(DecodedHash {
        params: HashParams::describe(kdf, &salt, &key),
        salt,
        key,
    })
}
