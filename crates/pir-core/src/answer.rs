//! Server-side answer computation

use num_bigint::BigInt;
use rayon::prelude::*;

use crate::{database::Database, hint::dot, query::QueryMatrix, Error, Result};

/// One answer per database row.
///
/// Values are signed so that a Byzantine server's answer can be represented
/// whatever it is; an honest answer is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerVector(Vec<BigInt>);

impl AnswerVector {
    pub fn new(values: Vec<BigInt>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[BigInt] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<BigInt> {
        self.0
    }
}

impl From<Vec<BigInt>> for AnswerVector {
    fn from(values: Vec<BigInt>) -> Self {
        Self(values)
    }
}

/// `answer[i] = sum_j db[i][j] * queries[i][j]`, rows in parallel
pub fn compute_answer(db: &Database, queries: &QueryMatrix) -> Result<AnswerVector> {
    let n = db.dimension();
    if queries.dimension() != n {
        return Err(Error::DimensionMismatch {
            what: "query matrix rows",
            expected: n,
            actual: queries.dimension(),
        });
    }
    if let Some(bad) = queries.rows().iter().find(|row| row.len() != n) {
        return Err(Error::DimensionMismatch {
            what: "query matrix columns",
            expected: n,
            actual: bad.len(),
        });
    }

    let values = db
        .par_rows()
        .zip(queries.rows().par_iter())
        .map(|(row, query)| BigInt::from(dot(row, query)))
        .collect();

    Ok(AnswerVector(values))
}
