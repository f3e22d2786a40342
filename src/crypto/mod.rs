//! Cryptographic primitives around the hash encoding.
//!
//! Provides Argon2id key derivation, salt generation, and the tuning
//! parameter types shared with the string format.

pub mod kdf;
pub mod salt;

pub use kdf::{HashParams, KdfParams, derive_key};
pub use salt::generate_salt;

/// Algorithm identifier written into every encoded hash.
pub const ALGORITHM_ID: &str = "argon2id";
/// Argon2 version tag (0x13) written into and required from encoded hashes.
pub const ARGON2_VERSION: u32 = 0x13;
/// Default salt length (16 bytes).
pub const SALT_LEN: usize = 16;
/// Default derived key length (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Smallest salt Argon2 accepts (8 bytes).
pub const MIN_SALT_LEN: usize = 8;
/// Smallest output Argon2 can produce (4 bytes).
pub const MIN_KEY_LEN: usize = 4;
/// Default ceiling on the memory cost a stored hash may ask for (1 GiB).
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;
