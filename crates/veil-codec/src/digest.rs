//! SHA-256 content digests
//!
//! The digest is always computed over the original (pre-transform) bytes so
//! a consumer can verify integrity after decoding a blob.

use sha2::{Digest, Sha256};

/// SHA-256 of `data`, rendered as 64 lowercase hex chars.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    proptest! {
        #[test]
        fn digest_is_lowercase_hex(data in proptest::collection::vec(any::<u8>(), 0..=1024)) {
            let hex = sha256_hex(&data);
            prop_assert_eq!(hex.len(), 64);
            prop_assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }
}
