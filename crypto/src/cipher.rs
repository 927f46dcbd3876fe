//! Symmetric ciphers for vault payloads.
//!
//! [`CipherScheme::LegacyCbc`] is AES-256-CBC with an all-zero IV, PKCS#7
//! padding and no MAC. Vaults written by earlier wallet releases use it and it
//! stays the default so they keep opening. It cannot tell a wrong key from
//! corrupted data: most of the time the padding check fails, sometimes it
//! returns garbage.
//!
//! [`CipherScheme::AesGcm`] is AES-256-GCM with a random 96-bit nonce stored
//! in front of the ciphertext. Use it for new deployments.

use aes::Aes256;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use lodestar_types::EntropySource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

const ZERO_IV: [u8; 16] = [0u8; 16];
/// AES-GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;
const GCM_TAG_LEN: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CipherScheme {
    #[default]
    LegacyCbc,
    AesGcm,
}

impl CipherScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegacyCbc => "legacy-cbc",
            Self::AesGcm => "aes-gcm",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Bad padding or failed authentication. Usually the wrong key.
    #[error("decryption failed: wrong key or corrupted data")]
    Decrypt,

    #[error("ciphertext too short: {0} bytes")]
    Truncated(usize),

    #[error("encryption failed: {0}")]
    Encrypt(String),
}

pub fn encrypt(
    scheme: CipherScheme,
    key: &[u8; 32],
    plaintext: &[u8],
    entropy: &dyn EntropySource,
) -> Result<Vec<u8>, CipherError> {
    match scheme {
        CipherScheme::LegacyCbc => Ok(Aes256CbcEnc::new(&(*key).into(), &ZERO_IV.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        CipherScheme::AesGcm => {
            let cipher = Aes256Gcm::new_from_slice(key)
                .map_err(|e| CipherError::Encrypt(format!("AES key init failed: {}", e)))?;
            let mut nonce_bytes = [0u8; NONCE_LEN];
            entropy.fill_bytes(&mut nonce_bytes);
            let ciphertext = cipher
                .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
                .map_err(|e| CipherError::Encrypt(e.to_string()))?;

            let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
            out.extend_from_slice(&nonce_bytes);
            out.extend_from_slice(&ciphertext);
            Ok(out)
        }
    }
}

pub fn decrypt(
    scheme: CipherScheme,
    key: &[u8; 32],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    match scheme {
        CipherScheme::LegacyCbc => {
            if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
                return Err(CipherError::Truncated(ciphertext.len()));
            }
            Aes256CbcDec::new(&(*key).into(), &ZERO_IV.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CipherError::Decrypt)
        }
        CipherScheme::AesGcm => {
            if ciphertext.len() < NONCE_LEN + GCM_TAG_LEN {
                return Err(CipherError::Truncated(ciphertext.len()));
            }
            let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);
            let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::Decrypt)?;
            cipher
                .decrypt(Nonce::from_slice(nonce_bytes), body)
                .map_err(|_| CipherError::Decrypt)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::OsEntropy;

    // SHA-256(PBKDF2-HMAC-SHA512("1234", "abcd", 2048))
    const PIN_KEY: &str = "d723ece8235ae294b94c6f37e0cd211b1ff01257f3f8585f237bb5e4af0cab2b";

    fn pin_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        hex::decode_to_slice(PIN_KEY, &mut key).unwrap();
        key
    }

    #[test]
    fn legacy_cbc_golden_vectors() {
        let key = pin_key();
        let ct = encrypt(CipherScheme::LegacyCbc, &key, br#"{"accounts":[]}"#, &OsEntropy).unwrap();
        assert_eq!(hex::encode(&ct), "0968825e7062c8221f3c2e3c7e78a4c8");

        // A full block of input gains a full block of padding.
        let ct = encrypt(CipherScheme::LegacyCbc, &key, b"0123456789abcdef", &OsEntropy).unwrap();
        assert_eq!(
            hex::encode(&ct),
            "81d41a6cdbab1f76d5843c95c5d10423267bcd3a783a23f0d8e9f1bd92c44421"
        );
    }

    #[test]
    fn legacy_cbc_is_deterministic() {
        let key = [3u8; 32];
        let a = encrypt(CipherScheme::LegacyCbc, &key, b"same input", &OsEntropy).unwrap();
        let b = encrypt(CipherScheme::LegacyCbc, &key, b"same input", &OsEntropy).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn roundtrip_both_schemes() {
        let key = [0x5Au8; 32];
        for scheme in [CipherScheme::LegacyCbc, CipherScheme::AesGcm] {
            let ct = encrypt(scheme, &key, b"wallet metadata", &OsEntropy).unwrap();
            assert_eq!(decrypt(scheme, &key, &ct).unwrap(), b"wallet metadata");
        }
    }

    #[test]
    fn gcm_nonce_is_fresh_per_encryption() {
        let key = [1u8; 32];
        let a = encrypt(CipherScheme::AesGcm, &key, b"x", &OsEntropy).unwrap();
        let b = encrypt(CipherScheme::AesGcm, &key, b"x", &OsEntropy).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), NONCE_LEN + 1 + GCM_TAG_LEN);
    }

    #[test]
    fn gcm_wrong_key_fails_authentication() {
        let ct = encrypt(CipherScheme::AesGcm, &[1u8; 32], b"secret", &OsEntropy).unwrap();
        assert_eq!(
            decrypt(CipherScheme::AesGcm, &[2u8; 32], &ct),
            Err(CipherError::Decrypt)
        );
    }

    #[test]
    fn gcm_tampered_ciphertext_fails() {
        let key = [1u8; 32];
        let mut ct = encrypt(CipherScheme::AesGcm, &key, b"secret", &OsEntropy).unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xFF;
        assert_eq!(decrypt(CipherScheme::AesGcm, &key, &ct), Err(CipherError::Decrypt));
    }

    #[test]
    fn cbc_wrong_key_never_yields_plaintext() {
        let plaintext = br#"{"accounts":["GDRXE2BQUC3AZNPVFSCEZ76NJ3WWL25FYFK6RGZGIEKWE4SOOHSUJUJ6"]}"#;
        let ct = encrypt(CipherScheme::LegacyCbc, &[1u8; 32], plaintext, &OsEntropy).unwrap();
        match decrypt(CipherScheme::LegacyCbc, &[2u8; 32], &ct) {
            Ok(garbage) => assert_ne!(garbage.as_slice(), plaintext.as_slice()),
            Err(e) => assert_eq!(e, CipherError::Decrypt),
        }
    }

    #[test]
    fn short_inputs_rejected() {
        let key = [0u8; 32];
        assert_eq!(
            decrypt(CipherScheme::LegacyCbc, &key, &[0u8; 15]),
            Err(CipherError::Truncated(15))
        );
        assert_eq!(
            decrypt(CipherScheme::LegacyCbc, &key, &[]),
            Err(CipherError::Truncated(0))
        );
        assert_eq!(
            decrypt(CipherScheme::AesGcm, &key, &[0u8; 20]),
            Err(CipherError::Truncated(20))
        );
    }

    #[test]
    fn scheme_names() {
        assert_eq!(CipherScheme::default(), CipherScheme::LegacyCbc);
        assert_eq!(CipherScheme::AesGcm.as_str(), "aes-gcm");
    }
}
