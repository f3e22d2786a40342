use thiserror::Error;

/// Failures produced while encoding or decoding an Argon2id hash string.
///
/// Messages name the offending field but never echo the input, so they
/// are safe to log. They should still not be shown to end users.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The string does not follow the `$argon2id$v=..$m=..,t=..,p=..$salt$key` layout.
    #[error("malformed encoded hash: {0}")]
    MalformedEncoding(&'static str),

    /// The version tag is well formed but not the one this build supports.
    #[error("incompatible argon2 version: found {found}, expected {expected}")]
    IncompatibleVersion { found: u32, expected: u32 },

    /// Tuning values or inputs handed to the encoder are unusable.
    #[error("invalid argon2 parameters: {0}")]
    InvalidParameters(&'static str),
}
