//! Per-field parsers for the encoded hash string.
//!
//! Every parser is all-or-nothing: the field must match its grammar
//! exactly, with no signs, whitespace or trailing text.

use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};

use crate::crypto::KdfParams;
use crate::error::EncodingError;

const VERSION_TAG: &str = "v=";
const MEMORY_TAG: &str = "m=";
const ITERATIONS_TAG: &str = "t=";
const PARALLELISM_TAG: &str = "p=";
const PARAM_SEPARATOR: char = ',';

/// Parses a run of ASCII digits into `T`, rejecting empty input and overflow.
fn parse_digits<T: FromStr>(digits: &str) -> Option<T> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn tagged<T: FromStr>(field: &str, tag: &str) -> Option<T> {
    field.strip_prefix(tag).and_then(parse_digits)
}

/// Extracts the integer from a `v=<digits>` field.
pub(super) fn parse_version(field: &str) -> Result<u32, EncodingError> {
    tagged(field, VERSION_TAG).ok_or(EncodingError::MalformedEncoding(
        "version field must be v=<integer>",
    ))
}

/// Parses `m=<digits>,t=<digits>,p=<digits>` into validated tuning parameters.
pub(super) fn parse_params(field: &str) -> Result<KdfParams, EncodingError> {
    const MALFORMED: EncodingError =
        EncodingError::MalformedEncoding("parameter field must be m=<int>,t=<int>,p=<int>");

    let mut parts = field.splitn(4, PARAM_SEPARATOR);
    let (Some(m), Some(t), Some(p), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(MALFORMED);
    };

    let memory_kib: u32 = tagged(m, MEMORY_TAG).ok_or(MALFORMED)?;
    let iterations: u32 = tagged(t, ITERATIONS_TAG).ok_or(MALFORMED)?;
    let parallelism: u8 = tagged(p, PARALLELISM_TAG).ok_or(MALFORMED)?;

    KdfParams::new(memory_kib, iterations, parallelism)
        .map_err(|_| EncodingError::MalformedEncoding("tuning parameters must be positive"))
}

/// Strict standard-alphabet base64 without padding. An empty field decodes
/// to no bytes.
pub(super) fn decode_b64(field: &str, what: &'static str) -> Result<Vec<u8>, EncodingError> {
    STANDARD_NO_PAD
        .decode(field)
        .map_err(|_| EncodingError::MalformedEncoding(what))
}

pub(super) fn encode_b64(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}
