//! Repeating-key XOR transform
//!
//! Byte `i` of the output is `data[i] ^ key[i mod len(key)]`. The transform
//! is its own inverse and preserves length exactly.

use crate::key::XorKey;

/// XOR `data` against the cyclic key, returning a new buffer.
pub fn xor_bytes(data: &[u8], key: &XorKey) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ key.mask_byte(i))
        .collect()
}

/// XOR `data` in place (decode path, avoids a second allocation).
pub fn xor_in_place(data: &mut [u8], key: &XorKey) {
    for (i, b) in data.iter_mut().enumerate() {
        *b ^= key.mask_byte(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key() -> XorKey {
        XorKey::new("abcdefgh").unwrap()
    }

    #[test]
    fn known_vector() {
        // 0x00..0x03 against the first four key bytes 'a'..'d'
        let enc = xor_bytes(&[0x00, 0x01, 0x02, 0x03], &key());
        assert_eq!(enc, vec![0x61, 0x63, 0x61, 0x67]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(xor_bytes(&[], &key()).is_empty());
    }

    #[test]
    fn key_wraps_past_its_length() {
        let data = vec![0u8; 10];
        let enc = xor_bytes(&data, &key());
        assert_eq!(enc[8], b'a');
        assert_eq!(enc[9], b'b');
    }

    #[test]
    fn in_place_matches_allocating_variant() {
        let data = b"some image bytes".to_vec();
        let mut in_place = data.clone();
        xor_in_place(&mut in_place, &key());
        assert_eq!(in_place, xor_bytes(&data, &key()));
    }

    proptest! {
        #[test]
        fn roundtrip_restores_original(
            data in proptest::collection::vec(any::<u8>(), 0..=4096),
            key_str in "[a-zA-Z0-9]{8,32}",
        ) {
            let key = XorKey::new(&key_str).unwrap();
            let enc = xor_bytes(&data, &key);
            let dec = xor_bytes(&enc, &key);
            prop_assert_eq!(dec, data);
        }

        #[test]
        fn length_is_preserved(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
            let enc = xor_bytes(&data, &key());
            prop_assert_eq!(enc.len(), data.len());
        }
    }
}
