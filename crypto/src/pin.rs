//! PIN stretching for the vault key.

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroizing;

/// PBKDF2 rounds applied to a PIN unless configured otherwise.
pub const PIN_ROUNDS: u32 = 2048;

/// Length of a PIN digest in bytes (512 bits).
pub const PIN_DIGEST_LEN: usize = 64;

/// `PBKDF2-HMAC-SHA512(pin, salt, 2048)` with a 512-bit output.
pub fn pin_digest(pin: &str, salt: &str) -> Zeroizing<[u8; PIN_DIGEST_LEN]> {
    pin_digest_with_rounds(pin, salt, PIN_ROUNDS)
}

/// Same as [`pin_digest`] with an explicit round count (at least 1).
pub fn pin_digest_with_rounds(
    pin: &str,
    salt: &str,
    rounds: u32,
) -> Zeroizing<[u8; PIN_DIGEST_LEN]> {
    let mut digest = Zeroizing::new([0u8; PIN_DIGEST_LEN]);
    pbkdf2_hmac::<Sha512>(pin.as_bytes(), salt.as_bytes(), rounds.max(1), &mut digest[..]);
    digest
}

/// `SHA-256(pin_digest)`: the 32-byte AES key a vault holds in memory.
pub fn vault_key_from_pin(pin: &str, salt: &str, rounds: u32) -> Zeroizing<[u8; 32]> {
    let digest = pin_digest_with_rounds(pin, salt, rounds);
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&Sha256::digest(&digest[..]));
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_digest_golden_vector() {
        let digest = pin_digest("1234", "abcd");
        assert_eq!(
            hex::encode(&digest[..]),
            "fa91e95ae08cf0bfb52d6248e0a83041cde9c3a9bd2a34c24e53d5b63f700387c46484ceee46a485172b9ae613397d586e8740d801d27fa74ff40e8b4e5249fc"
        );
    }

    #[test]
    fn vault_key_golden_vector() {
        let key = vault_key_from_pin("1234", "abcd", PIN_ROUNDS);
        assert_eq!(
            hex::encode(&key[..]),
            "d723ece8235ae294b94c6f37e0cd211b1ff01257f3f8585f237bb5e4af0cab2b"
        );
    }

    #[test]
    fn salt_and_pin_both_matter() {
        let base = pin_digest("1234", "abcd");
        assert_ne!(&base[..], &pin_digest("1235", "abcd")[..]);
        assert_ne!(&base[..], &pin_digest("1234", "abce")[..]);
    }

    #[test]
    fn rounds_matter() {
        let a = pin_digest_with_rounds("0000", "salt", 1);
        let b = pin_digest_with_rounds("0000", "salt", 2);
        assert_ne!(&a[..], &b[..]);
        let zero = pin_digest_with_rounds("0000", "salt", 0);
        assert_eq!(&zero[..], &a[..]);
    }
}
