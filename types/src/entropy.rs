//! Randomness seam for salts and nonces.

/// Fills buffers with random bytes.
///
/// `lodestar_crypto::OsEntropy` is the production source. Tests plug in a
/// deterministic one so persisted salts are reproducible.
pub trait EntropySource: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]);
}
