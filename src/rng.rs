//! Random sources for the draft engine.
//!
//! Pack generation and pick jitter are deliberately non-reproducible and draw
//! from an entropy-seeded generator. Deck assembly must be reproducible, so its
//! generator is seeded from the draft and bot identifiers.
//!
//! Every operation takes `&mut R where R: Rng + ?Sized`, so callers and tests
//! can inject any generator.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};

/// A fresh generator seeded from operating-system entropy.
pub fn entropy_rng() -> StdRng {
    StdRng::from_os_rng()
}

/// Seed for deck assembly, derived from `(draft_id, bot_id, pool_size)`.
///
/// Uses the first eight bytes of a SHA-256 digest so the value is stable
/// across platforms and compiler versions.
pub fn deck_seed(draft_id: &str, bot_id: &str, pool_size: usize) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(draft_id.as_bytes());
    hasher.update(b":");
    hasher.update(bot_id.as_bytes());
    hasher.update(b":");
    hasher.update(pool_size.to_string().as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Deterministic generator for one bot's deck build.
pub fn deck_rng(draft_id: &str, bot_id: &str, pool_size: usize) -> StdRng {
    StdRng::seed_from_u64(deck_seed(draft_id, bot_id, pool_size))
}
