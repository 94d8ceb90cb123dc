//! Answer decoding
//!
//! `decoded[i] = (answer[i] - alpha * hint[i]) / beta`. For an honest answer
//! the division is exact. A non-zero remainder can only come from a tampered
//! answer (or mismatched parameters), so instead of truncating silently the
//! entry is flagged and treated as untrustworthy downstream.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::Zero;

use crate::{answer::AnswerVector, hint::Hint, query::QueryParams, Error, Result};

/// A decoded value together with whether it divided out exactly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecodedEntry {
    /// `floor((answer - alpha * hint) / beta)`
    pub value: BigInt,
    pub exact: bool,
}

impl DecodedEntry {
    pub fn exact(value: impl Into<BigInt>) -> Self {
        Self {
            value: value.into(),
            exact: true,
        }
    }

    /// The value as a record, if it could be one (exact and non-negative)
    pub fn as_record(&self) -> Option<BigUint> {
        if self.exact {
            self.value.to_biguint()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedVector(Vec<DecodedEntry>);

impl DecodedVector {
    pub fn new(entries: Vec<DecodedEntry>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[DecodedEntry] {
        &self.0
    }

    pub fn get(&self, row: usize) -> Option<&DecodedEntry> {
        self.0.get(row)
    }

    /// Rows whose division left a remainder
    pub fn inexact_rows(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.exact)
            .map(|(row, _)| row)
            .collect()
    }
}

pub fn decode(answer: &AnswerVector, hint: &Hint, params: &QueryParams) -> Result<DecodedVector> {
    if answer.len() != hint.len() {
        return Err(Error::DimensionMismatch {
            what: "answer vector",
            expected: hint.len(),
            actual: answer.len(),
        });
    }

    let beta = BigInt::from(params.beta().clone());
    let entries = answer
        .as_slice()
        .iter()
        .zip(hint.as_slice())
        .enumerate()
        .map(|(row, (ans, h))| {
            let blinding = BigInt::from(params.alpha() * h);
            let delta = ans - blinding;
            let (value, remainder) = delta.div_mod_floor(&beta);
            let exact = remainder.is_zero();
            if !exact {
                tracing::warn!(row, %remainder, "Answer does not decode exactly, treating as tampered");
            }
            DecodedEntry { value, exact }
        })
        .collect();

    Ok(DecodedVector(entries))
}
