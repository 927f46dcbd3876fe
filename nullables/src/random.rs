//! Nullable random: deterministic byte streams.

use lodestar_types::EntropySource;
use std::sync::Mutex;

/// Fills buffers from a fixed repeating pattern.
///
/// Each call continues where the previous one stopped, so two salts drawn in
/// a row differ while the whole sequence stays reproducible.
pub struct NullRandom {
    pattern: Vec<u8>,
    position: Mutex<usize>,
}

impl NullRandom {
    /// Repeat `pattern` forever. An empty pattern yields zeros.
    pub fn new(pattern: Vec<u8>) -> Self {
        Self {
            pattern,
            position: Mutex::new(0),
        }
    }

    /// Every byte is `value`.
    pub fn constant(value: u8) -> Self {
        Self::new(vec![value])
    }

    /// 0, 1, 2, ... 255, 0, 1, ...
    pub fn counting() -> Self {
        Self::new((0..=255).collect())
    }
}

impl EntropySource for NullRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        if self.pattern.is_empty() {
            dest.fill(0);
            return;
        }
        let mut position = self.position.lock().unwrap();
        for byte in dest.iter_mut() {
            *byte = self.pattern[*position % self.pattern.len()];
            *position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_continues_across_calls() {
        let random = NullRandom::counting();
        let mut a = [0u8; 4];
        let mut b = [0u8; 4];
        random.fill_bytes(&mut a);
        random.fill_bytes(&mut b);
        assert_eq!(a, [0, 1, 2, 3]);
        assert_eq!(b, [4, 5, 6, 7]);
    }

    #[test]
    fn constant_and_empty() {
        let mut buf = [9u8; 3];
        NullRandom::constant(0xAA).fill_bytes(&mut buf);
        assert_eq!(buf, [0xAA; 3]);
        NullRandom::new(Vec::new()).fill_bytes(&mut buf);
        assert_eq!(buf, [0; 3]);
    }
}
