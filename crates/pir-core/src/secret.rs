//! Client-side blinding vector
//!
//! The secret vector never leaves the client, so it deliberately has no
//! serde implementation.

use num_bigint::BigUint;
use rand::Rng;

use crate::{Error, Result, SECRET_COEFF_MAX, SECRET_COEFF_MIN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVector(Vec<BigUint>);

impl SecretVector {
    /// Draw `n` coefficients uniformly from `[1, 100)`
    pub fn generate<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let coefficients = (0..n)
            .map(|_| BigUint::from(rng.gen_range(SECRET_COEFF_MIN..SECRET_COEFF_MAX)))
            .collect();
        Self(coefficients)
    }

    /// Fixed coefficients, each of which must lie in `[1, 100)`
    pub fn from_coefficients(coefficients: &[u32]) -> Result<Self> {
        for (position, &value) in coefficients.iter().enumerate() {
            if !(SECRET_COEFF_MIN..SECRET_COEFF_MAX).contains(&value) {
                return Err(Error::SecretOutOfRange { position, value });
            }
        }
        Ok(Self(coefficients.iter().copied().map(BigUint::from).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[BigUint] {
        &self.0
    }

    /// `alpha * s`, the common base of every query row
    pub fn scaled(&self, alpha: &BigUint) -> Vec<BigUint> {
        self.0.iter().map(|s| s * alpha).collect()
    }
}

/// Generate a fresh blinding vector of length `n`
pub fn generate_secret_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> SecretVector {
    SecretVector::generate(n, rng)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_coefficients_in_range() {
        let mut rng = SmallRng::seed_from_u64(9);
        let vector = generate_secret_vector(1000, &mut rng);

        assert_eq!(vector.len(), 1000);
        let low = BigUint::from(SECRET_COEFF_MIN);
        let high = BigUint::from(SECRET_COEFF_MAX);
        assert!(vector.as_slice().iter().all(|s| *s >= low && *s < high));
    }

    #[test]
    fn test_from_coefficients_bounds() {
        assert!(SecretVector::from_coefficients(&[1, 50, 99]).is_ok());
        assert!(matches!(
            SecretVector::from_coefficients(&[1, 0]),
            Err(Error::SecretOutOfRange {
                position: 1,
                value: 0
            })
        ));
        assert!(matches!(
            SecretVector::from_coefficients(&[100]),
            Err(Error::SecretOutOfRange { value: 100, .. })
        ));
    }

    #[test]
    fn test_scaled() {
        let vector = SecretVector::from_coefficients(&[2, 5]).unwrap();
        let scaled = vector.scaled(&BigUint::from(3u32));
        assert_eq!(scaled, vec![BigUint::from(6u32), BigUint::from(15u32)]);
    }
}
