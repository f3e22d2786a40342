#![no_main]

use hashnest::{EncodingError, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Must never panic; a successful decode must be internally consistent
    // and, unless salt or key is empty (which encode refuses), re-encode to
    // a string that decodes to the same value.
    match decode(data) {
        Ok(decoded) => {
            let params = decoded.params();
            assert_eq!(params.salt_len(), decoded.salt().len());
            assert_eq!(params.key_len(), decoded.key().len());

            if !decoded.salt().is_empty() && !decoded.key().is_empty() {
                let again = encode(params.kdf(), decoded.salt(), decoded.key()).unwrap();
                assert_eq!(decode(&again).unwrap(), decoded);
            }
        }
        Err(EncodingError::InvalidParameters(_)) => panic!("decode reported an encode-side error"),
        Err(_) => {}
    }
});
