//! Final batch result

use std::collections::BTreeMap;

use num_bigint::BigUint;
use serde::Serialize;

use crate::{
    coords::targets_by_row, decode::DecodedVector, discrepancy::Discrepancies,
    reconcile::Resolution, Error, Result,
};

/// Outcome for one requested index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Retrieved {
    Value(#[serde(with = "crate::decimal")] BigUint),
    Unresolved,
}

impl Retrieved {
    pub fn value(&self) -> Option<&BigUint> {
        match self {
            Retrieved::Value(value) => Some(value),
            Retrieved::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Retrieved::Value(_))
    }
}

/// Requested flat index -> retrieved value, ordered by index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultMap(BTreeMap<usize, Retrieved>);

impl ResultMap {
    pub fn get(&self, index: usize) -> Option<&Retrieved> {
        self.0.get(&index)
    }

    /// The value at `index`, if it was resolved
    pub fn value(&self, index: usize) -> Option<&BigUint> {
        self.get(index).and_then(Retrieved::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Retrieved)> {
        self.0.iter().map(|(&index, retrieved)| (index, retrieved))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.0.values().filter(|r| r.is_resolved()).count()
    }

    pub fn unresolved_indices(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, r)| !r.is_resolved())
            .map(|(index, _)| index)
            .collect()
    }
}

/// Combine agreed rows and reconciled rows into the final map.
///
/// `requested` holds one flat index per row, in any order. Rows outside the
/// discrepancy set take the value every server agreed on, unless that value
/// cannot be a record (inexact or negative).
pub fn assemble_results(
    requested: &[usize],
    agreed: &DecodedVector,
    discrepancies: &Discrepancies,
    resolutions: &[Resolution],
) -> Result<ResultMap> {
    if agreed.len() != requested.len() {
        return Err(Error::DimensionMismatch {
            what: "decoded vector",
            expected: requested.len(),
            actual: agreed.len(),
        });
    }
    if resolutions.len() != discrepancies.len() {
        return Err(Error::DimensionMismatch {
            what: "resolutions",
            expected: discrepancies.len(),
            actual: resolutions.len(),
        });
    }

    let targets = targets_by_row(requested)?;

    let mut map: BTreeMap<usize, Retrieved> = targets
        .iter()
        .zip(agreed.entries())
        .map(|(&index, entry)| {
            let retrieved = match entry.as_record() {
                Some(value) => Retrieved::Value(value),
                None => Retrieved::Unresolved,
            };
            (index, retrieved)
        })
        .collect();

    for (&row, resolution) in discrepancies.positions().iter().zip(resolutions) {
        let retrieved = match resolution {
            Resolution::Resolved { value, .. } => Retrieved::Value(value.clone()),
            Resolution::Unresolved => Retrieved::Unresolved,
        };
        let index = *targets.get(row).ok_or(Error::DimensionMismatch {
            what: "requested indices",
            expected: row + 1,
            actual: targets.len(),
        })?;
        map.insert(index, retrieved);
    }

    Ok(ResultMap(map))
}
