//! Hint computation
//!
//! A hint is the inner product of each database row with the client's secret
//! vector. The client computes it once offline; it is stale as soon as either
//! the database or the vector changes and must then be recomputed.

use num_bigint::BigUint;
use num_traits::Zero;
use rayon::prelude::*;

use crate::{database::Database, secret::SecretVector, Error, Result};

/// One linear fingerprint per database row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint(Vec<BigUint>);

impl Hint {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[BigUint] {
        &self.0
    }
}

/// Compute `hint[i] = sum_j db[i][j] * vector[j]` for every row
pub fn compute_hint(db: &Database, vector: &SecretVector) -> Result<Hint> {
    if vector.len() != db.dimension() {
        return Err(Error::DimensionMismatch {
            what: "secret vector",
            expected: db.dimension(),
            actual: vector.len(),
        });
    }

    let coefficients = vector.as_slice();
    let values = db.par_rows().map(|row| dot(row, coefficients)).collect();

    tracing::debug!(rows = db.dimension(), "Computed hint");
    Ok(Hint(values))
}

/// Exact inner product of two equal-length slices
pub(crate) fn dot(lhs: &[BigUint], rhs: &[BigUint]) -> BigUint {
    lhs.iter().zip(rhs).fold(BigUint::zero(), |mut acc, (a, b)| {
        acc += a * b;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_small_matrix() {
        // [[1, 2],    [5,     [1*5 + 2*7,     [19,
        //  [3, 4]]  ·  7]  =   3*5 + 4*7]  =   43]
        let db = Database::from_u64_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        let vector = SecretVector::from_coefficients(&[5, 7]).unwrap();

        let hint = compute_hint(&db, &vector).unwrap();
        assert_eq!(hint.as_slice(), &[BigUint::from(19u32), BigUint::from(43u32)]);
    }

    #[test]
    fn test_hint_unit_vector_selects_column_sum() {
        // All-ones vector sums each row
        let db = Database::from_u64_rows(&[vec![10, 20, 30], vec![1, 2, 3], vec![0, 0, 9]]).unwrap();
        let vector = SecretVector::from_coefficients(&[1, 1, 1]).unwrap();

        let hint = compute_hint(&db, &vector).unwrap();
        assert_eq!(
            hint.as_slice(),
            &[60u32, 6, 9].map(BigUint::from)
        );
    }

    #[test]
    fn test_hint_does_not_overflow_wide_records() {
        let wide: BigUint = (BigUint::from(1u32) << 300) - 1u32;
        let db = Database::from_rows(vec![
            vec![wide.clone(), wide.clone()],
            vec![BigUint::zero(), wide.clone()],
        ])
        .unwrap();
        let vector = SecretVector::from_coefficients(&[99, 98]).unwrap();

        let hint = compute_hint(&db, &vector).unwrap();
        assert_eq!(hint.as_slice()[0], &wide * 197u32);
        assert_eq!(hint.as_slice()[1], &wide * 98u32);
    }

    #[test]
    fn test_hint_dimension_mismatch() {
        let db = Database::from_u64_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
        let vector = SecretVector::from_coefficients(&[1, 2, 3]).unwrap();

        assert!(matches!(
            compute_hint(&db, &vector),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3,
                ..
            })
        ));
    }
}
