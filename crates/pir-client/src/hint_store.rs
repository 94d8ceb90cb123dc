//! Local hint storage

use pir_core::{compute_hint, generate_secret_vector, Database, Error, Hint, SecretVector};
use rand::Rng;

use crate::Result;

/// Offline client state: the secret vector and the hint computed from it
#[derive(Debug, Clone)]
pub struct HintStore {
    vector: SecretVector,
    hint: Hint,
}

impl HintStore {
    /// Draw a fresh secret vector and precompute the hint for `db`
    pub fn build<R: Rng + ?Sized>(db: &Database, rng: &mut R) -> Result<Self> {
        let start = std::time::Instant::now();
        let vector = generate_secret_vector(db.dimension(), rng);
        let hint = compute_hint(db, &vector)?;

        tracing::info!(
            rows = hint.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Precomputed hints"
        );
        Ok(Self { vector, hint })
    }

    /// Store an existing vector and hint; both must have the same length
    pub fn from_parts(vector: SecretVector, hint: Hint) -> Result<Self> {
        if vector.len() != hint.len() {
            return Err(Error::DimensionMismatch {
                what: "hint",
                expected: vector.len(),
                actual: hint.len(),
            }
            .into());
        }
        Ok(Self { vector, hint })
    }

    /// Recompute the hint after the database changed
    pub fn refresh(&mut self, db: &Database) -> Result<()> {
        self.hint = compute_hint(db, &self.vector)?;
        tracing::info!(rows = self.hint.len(), "Refreshed hints");
        Ok(())
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    pub fn vector(&self) -> &SecretVector {
        &self.vector
    }

    pub fn hint(&self) -> &Hint {
        &self.hint
    }
}
