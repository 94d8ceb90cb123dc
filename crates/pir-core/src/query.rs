//! Query construction
//!
//! Every row of the query matrix is the same blinded base `alpha * s`, with
//! `beta` added at the requested column. The base hides which column was
//! requested; the hint lets the client subtract it again after answering.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::{coords::Coordinate, secret::SecretVector, Error, Result};

/// Public blinding constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    alpha: BigUint,
    beta: BigUint,
}

impl QueryParams {
    pub fn new(alpha: impl Into<BigUint>, beta: impl Into<BigUint>) -> Result<Self> {
        let (alpha, beta) = (alpha.into(), beta.into());
        if alpha.is_zero() {
            return Err(Error::InvalidParameter {
                name: "alpha",
                reason: "must be positive".to_string(),
            });
        }
        if beta.is_zero() {
            return Err(Error::InvalidParameter {
                name: "beta",
                reason: "must be positive".to_string(),
            });
        }
        Ok(Self { alpha, beta })
    }

    pub fn alpha(&self) -> &BigUint {
        &self.alpha
    }

    pub fn beta(&self) -> &BigUint {
        &self.beta
    }
}

/// `n x n` matrix of query coefficients, one row per database row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatrix {
    rows: Vec<Vec<BigUint>>,
}

impl QueryMatrix {
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, i: usize) -> &[BigUint] {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[Vec<BigUint>] {
        &self.rows
    }
}

/// Build the query matrix for one requested coordinate per row.
///
/// Every row in `[0, n)` must be requested exactly once, and every column
/// must lie in `[0, n)`, where `n` is the secret vector length.
pub fn build_queries(
    coordinates: &[Coordinate],
    vector: &SecretVector,
    params: &QueryParams,
) -> Result<QueryMatrix> {
    let n = vector.len();
    let base = vector.scaled(params.alpha());

    let mut rows: Vec<Option<Vec<BigUint>>> = vec![None; n];
    for coord in coordinates {
        if coord.row >= n || coord.col >= n {
            return Err(Error::CoordinateOutOfRange {
                row: coord.row,
                col: coord.col,
                n,
            });
        }
        if rows[coord.row].is_some() {
            return Err(Error::DuplicateRow(coord.row));
        }

        let mut row = base.clone();
        row[coord.col] += params.beta();
        rows[coord.row] = Some(row);
    }

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.ok_or(Error::MissingRow(i)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(rows = n, "Built query matrix");
    Ok(QueryMatrix { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{diagonal_indices, indices_to_coordinates};

    fn big(values: &[u64]) -> Vec<BigUint> {
        values.iter().copied().map(BigUint::from).collect()
    }

    #[test]
    fn test_rows_are_point_perturbations_of_base() {
        let vector = SecretVector::from_coefficients(&[2, 5, 7]).unwrap();
        let params = QueryParams::new(3u32, 100u32).unwrap();
        let coords = indices_to_coordinates(&diagonal_indices(3), 3).unwrap();

        let queries = build_queries(&coords, &vector, &params).unwrap();

        // base = alpha * s = [6, 15, 21]
        assert_eq!(queries.row(0), big(&[106, 15, 21]).as_slice());
        assert_eq!(queries.row(1), big(&[6, 115, 21]).as_slice());
        assert_eq!(queries.row(2), big(&[6, 15, 121]).as_slice());
    }

    #[test]
    fn test_arbitrary_column_per_row() {
        let vector = SecretVector::from_coefficients(&[1, 1]).unwrap();
        let params = QueryParams::new(1u32, 10u32).unwrap();
        let coords = vec![Coordinate::new(1, 0), Coordinate::new(0, 0)];

        let queries = build_queries(&coords, &vector, &params).unwrap();
        assert_eq!(queries.row(0), big(&[11, 1]).as_slice());
        assert_eq!(queries.row(1), big(&[11, 1]).as_slice());
    }

    #[test]
    fn test_coefficients_are_not_narrowed() {
        // alpha * s overflows u64 by a wide margin
        let alpha = BigUint::from(u64::MAX) * BigUint::from(u64::MAX);
        let vector = SecretVector::from_coefficients(&[99]).unwrap();
        let params = QueryParams::new(alpha.clone(), 1u32).unwrap();

        let queries = build_queries(&[Coordinate::new(0, 0)], &vector, &params).unwrap();
        assert_eq!(queries.row(0)[0], alpha * 99u32 + 1u32);
    }

    #[test]
    fn test_invalid_coordinates() {
        let vector = SecretVector::from_coefficients(&[1, 2]).unwrap();
        let params = QueryParams::new(1u32, 1u32).unwrap();

        let out_of_range = [Coordinate::new(0, 2), Coordinate::new(1, 0)];
        assert!(matches!(
            build_queries(&out_of_range, &vector, &params),
            Err(Error::CoordinateOutOfRange { row: 0, col: 2, n: 2 })
        ));

        let duplicate = [Coordinate::new(0, 0), Coordinate::new(0, 1)];
        assert!(matches!(
            build_queries(&duplicate, &vector, &params),
            Err(Error::DuplicateRow(0))
        ));

        let missing = [Coordinate::new(1, 1)];
        assert!(matches!(
            build_queries(&missing, &vector, &params),
            Err(Error::MissingRow(0))
        ));
    }

    #[test]
    fn test_params_must_be_positive() {
        assert!(QueryParams::new(0u32, 5u32).is_err());
        assert!(QueryParams::new(5u32, 0u32).is_err());
    }
}
