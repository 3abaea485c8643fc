//! Redemption code generation.
//!
//! Codes are short, human-shareable strings. They are not secrets: the
//! generator is a seeded PRNG, and uniqueness is enforced by the store's
//! unique constraint on `discount_managers.code`, not here. Callers that hit
//! a conflict simply ask for another code.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Alphabet codes are drawn from: ASCII letters, digits and six symbols.
pub const CODE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$&*";

/// Length of codes handed out for discounts and gifts.
pub const CODE_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Process-wide code generator.
///
/// Seeded once (from OS entropy in production) and shared behind an `Arc`.
/// The inner RNG is guarded by a mutex; each call holds it only for the
/// handful of draws needed for one code.
pub struct CodeGenerator {
    rng: Mutex<StdRng>,
}

impl CodeGenerator {
    /// Create a generator seeded from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Create a deterministic generator. Two generators with the same seed
    /// produce the same sequence of codes.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Produce a code of `length` characters drawn uniformly from
    /// [`CODE_ALPHABET`].
    pub fn new_code(&self, length: usize) -> String {
        // A poisoned lock only means another thread panicked mid-draw; the
        // RNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        (0..length)
            .map(|_| char::from(CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())]))
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Returns `true` if `code` is non-empty and consists only of alphabet characters.
pub fn is_well_formed(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
