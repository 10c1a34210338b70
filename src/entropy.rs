//! Injectable randomness for salt generation.

use rand::RngCore;

/// Number of random bytes in a generated salt.
pub const SALT_BYTES: usize = 16;

/// Source of random bytes.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Entropy from the thread-local CSPRNG (seeded by the OS).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::rng().fill_bytes(dest);
    }
}

/// Repeats a fixed byte pattern. Testing only.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone)]
pub struct FixedEntropy {
    pattern: Vec<u8>,
}

#[cfg(any(test, feature = "test-seams"))]
impl FixedEntropy {
    /// Create a source that cycles through `pattern`.
    ///
    /// An empty pattern yields zero bytes.
    pub fn new(pattern: &[u8]) -> Self {
        Self {
            pattern: pattern.to_vec(),
        }
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl EntropySource for FixedEntropy {
    fn fill_bytes(&self, dest: &mut [u8]) {
        if self.pattern.is_empty() {
            dest.fill(0);
            return;
        }
        for (byte, src) in dest.iter_mut().zip(self.pattern.iter().cycle()) {
            *byte = *src;
        }
    }
}

/// Generate a fresh salt as lowercase hex.
pub fn generate_salt(source: &dyn EntropySource) -> String {
    let mut bytes = [0u8; SALT_BYTES];
    source.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
