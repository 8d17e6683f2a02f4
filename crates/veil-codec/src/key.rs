//! XOR key handling
//!
//! The key is the UTF-8 byte sequence of a user-supplied string, applied
//! cyclically as a repeating mask. Keys shorter than 8 bytes are rejected
//! before any file is touched. A longer key is still not secure, just less
//! trivial to brute-force.

use crate::MIN_KEY_BYTES;
use veil_core::{VeilError, VeilResult};

/// A validated XOR key (>= [`MIN_KEY_BYTES`] bytes)
#[derive(Debug, Clone)]
pub struct XorKey {
    bytes: Vec<u8>,
}

impl XorKey {
    /// Build a key from a user-supplied string.
    ///
    /// Fails with a config error when the UTF-8 encoding is shorter than
    /// [`MIN_KEY_BYTES`]; multi-byte characters count per byte, not per char.
    pub fn new(key: &str) -> VeilResult<Self> {
        let bytes = key.as_bytes().to_vec();
        if bytes.len() < MIN_KEY_BYTES {
            return Err(VeilError::Config(format!(
                "key must be at least {MIN_KEY_BYTES} bytes once UTF-8 encoded (got {})",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mask byte applied at position `i` of the stream
    #[inline]
    pub fn mask_byte(&self, i: usize) -> u8 {
        self.bytes[i % self.bytes.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_byte_key_rejected() {
        let err = XorKey::new("1234567").unwrap_err();
        assert!(matches!(err, VeilError::Config(_)));
    }

    #[test]
    fn eight_byte_key_accepted() {
        let key = XorKey::new("abcdefgh").unwrap();
        assert_eq!(key.as_bytes(), b"abcdefgh");
    }

    #[test]
    fn multibyte_chars_count_as_bytes() {
        // four Cyrillic chars = 8 UTF-8 bytes
        let key = XorKey::new("ключ").unwrap();
        assert_eq!(key.as_bytes().len(), 8);
    }

    #[test]
    fn mask_cycles_over_key_length() {
        let key = XorKey::new("abcdefgh").unwrap();
        assert_eq!(key.mask_byte(0), b'a');
        assert_eq!(key.mask_byte(7), b'h');
        assert_eq!(key.mask_byte(8), b'a');
        assert_eq!(key.mask_byte(17), b'b');
    }
}
