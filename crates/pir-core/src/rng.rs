//! Session randomness
//!
//! One `SessionRng` is built per session and passed around by `&mut`.
//! Database records are drawn from a ChaCha20 stream seeded by the operating
//! system; blinding coefficients and simulated faults use a `SmallRng` that is
//! itself seeded from the ChaCha20 stream. Nothing is ever reseeded.

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::Result;

pub struct SessionRng {
    secure: ChaCha20Rng,
    fast: SmallRng,
}

impl SessionRng {
    /// Seed from the operating system entropy source
    pub fn from_os() -> Result<Self> {
        let mut secure = ChaCha20Rng::from_rng(OsRng)?;
        let fast = SmallRng::from_rng(&mut secure)?;
        tracing::debug!("Session randomness seeded from OS entropy");
        Ok(Self { secure, fast })
    }

    /// Deterministic session for tests and reproducible runs
    pub fn from_seed(seed: u64) -> Self {
        let mut secure = ChaCha20Rng::seed_from_u64(seed);
        let fast = SmallRng::seed_from_u64(secure.next_u64());
        Self { secure, fast }
    }

    /// Cryptographically secure generator (database content)
    pub fn secure(&mut self) -> &mut ChaCha20Rng {
        &mut self.secure
    }

    /// Fast generator (blinding vectors, fault injection)
    pub fn fast(&mut self) -> &mut SmallRng {
        &mut self.fast
    }
}
