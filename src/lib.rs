//! Self-describing Argon2id password hashes.
//!
//! A hash is stored as a single string carrying the algorithm, version,
//! tuning parameters, salt and derived key:
//!
//! ```text
//! $argon2id$v=19$m=65536,t=3,p=1$<base64 salt>$<base64 key>
//! ```
//!
//! [`encode`] and [`decode`] convert between that string and its parts,
//! [`verify_password`] re-derives and compares a key in constant time, and
//! [`Hasher`] ties both to a [`HashConfig`].

mod config;
pub mod crypto;
mod error;
pub mod format;
mod hasher;
mod verify;

pub use crate::config::HashConfig;
pub use crate::crypto::{HashParams, KdfParams};
pub use crate::error::EncodingError;
pub use crate::format::{DecodedHash, decode, encode};
pub use crate::hasher::Hasher;
pub use crate::verify::{verify_decoded, verify_password};
