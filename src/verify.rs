//! Password verification against an encoded hash.

use anyhow::{Result, bail};
use subtle::ConstantTimeEq;

use crate::crypto::{MAX_MEMORY_KIB, derive_key};
use crate::format::{self, DecodedHash};

/// Checks `password` against an encoded hash.
///
/// Returns `Ok(false)` on a wrong password. Errors carry an
/// [`EncodingError`](crate::EncodingError) when the string cannot be decoded,
/// or a key derivation error when Argon2 rejects the recovered parameters.
/// Memory costs above [`MAX_MEMORY_KIB`] are refused.
pub fn verify_password(password: &[u8], encoded: &str) -> Result<bool> {
    let decoded = format::decode(encoded)?;
    verify_decoded(password, &decoded, MAX_MEMORY_KIB)
}

/// Re-derives a key from `password` with the stored salt and parameters and
/// compares it to the stored key in constant time.
///
/// The stored memory cost is untrusted; anything above `max_memory_kib` is
/// an error before any memory is allocated.
pub fn verify_decoded(password: &[u8], decoded: &DecodedHash, max_memory_kib: u32) -> Result<bool> {
    let params = decoded.params();
    if params.memory_kib() > max_memory_kib {
        bail!(
            "stored memory cost {} KiB exceeds the {max_memory_kib} KiB limit",
            params.memory_kib()
        );
    }

    let candidate = derive_key(password, decoded.salt(), *params.kdf(), params.key_len())?;
    Ok(keys_match(&candidate, decoded.key()))
}

/// Equality that does not depend on where the first differing byte is.
pub(crate) fn keys_match(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncodingError;
    use crate::crypto::{KdfParams, generate_salt};

    fn light() -> KdfParams {
        KdfParams::new(1024, 1, 1).unwrap()
    }

    fn hash(password: &[u8], kdf: KdfParams) -> String {
        let salt = generate_salt(16).unwrap();
        let key = derive_key(password, &salt, kdf, 32).unwrap();
        format::encode(&kdf, &salt, &key).unwrap()
    }

    #[test]
    fn correct_password_verifies() {
        let encoded = hash(b"hunter2", light());
        assert!(verify_password(b"hunter2", &encoded).unwrap());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let encoded = hash(b"hunter2", light());
        assert!(!verify_password(b"hunter3", &encoded).unwrap());
        assert!(!verify_password(b"", &encoded).unwrap());
    }

    #[test]
    fn recovered_key_length_is_used() {
        let kdf = light();
        let salt = generate_salt(16).unwrap();
        let key = derive_key(b"pw", &salt, kdf, 64).unwrap();
        let encoded = format::encode(&kdf, &salt, &key).unwrap();

        assert!(verify_password(b"pw", &encoded).unwrap());
    }

    #[test]
    fn truncated_key_does_not_verify() {
        let kdf = light();
        let salt = generate_salt(16).unwrap();
        let key = derive_key(b"pw", &salt, kdf, 32).unwrap();
        let encoded = format::encode(&kdf, &salt, &key[..16]).unwrap();

        // re-derived with key_len 16, which is a different Argon2 output
        assert!(!verify_password(b"pw", &encoded).unwrap());
    }

    #[test]
    fn decode_errors_keep_their_type() {
        let err = verify_password(b"pw", "$argon2id$v=16$m=1024,t=1,p=1$AAAAAAAAAAA$AAAAAA")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<EncodingError>(),
            Some(&EncodingError::IncompatibleVersion {
                found: 16,
                expected: 19
            })
        );

        let err = verify_password(b"pw", "not a hash").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EncodingError>(),
            Some(EncodingError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn parameters_argon2_refuses_are_errors() {
        // 4-byte salt decodes fine but is below the Argon2 minimum
        let encoded = "$argon2id$v=19$m=1024,t=1,p=1$AAAAAA$AAAAAAAAAAAAAAAAAAAAAA";
        assert!(verify_password(b"pw", encoded).is_err());
    }

    #[test]
    fn empty_salt_or_key_never_verify() {
        let empty_salt = "$argon2id$v=19$m=1024,t=1,p=1$$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        assert!(verify_password(b"pw", empty_salt).is_err());

        let empty_key = "$argon2id$v=19$m=1024,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$";
        assert!(verify_password(b"pw", empty_key).is_err());
    }

    #[test]
    fn oversized_memory_cost_is_refused_before_deriving() {
        let encoded = "$argon2id$v=19$m=4294967295,t=1,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        let err = verify_password(b"pw", encoded).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");

        let decoded = format::decode(&hash(b"pw", light())).unwrap();
        assert!(verify_decoded(b"pw", &decoded, 512).is_err());
        assert!(verify_decoded(b"pw", &decoded, 1024).unwrap());
    }

    #[test]
    fn keys_match_compares_whole_slices() {
        assert!(keys_match(b"abcd", b"abcd"));
        assert!(!keys_match(b"abcd", b"abce"));
        assert!(!keys_match(b"abcd", b"xbcd"));
        assert!(!keys_match(b"abcd", b"abc"));
    }
}
