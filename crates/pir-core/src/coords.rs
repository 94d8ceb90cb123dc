//! Requested indices and their coordinates
//!
//! A batch requests exactly one cell per row. The default access pattern is
//! the main diagonal; `AccessPattern::Columns` lets the caller pick the column
//! of every row explicitly.

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// `row = index / n`, `col = index % n`
    pub fn from_flat(index: usize, n: usize) -> Result<Self> {
        if n == 0 || index >= cell_count(n)? {
            return Err(Error::IndexOutOfRange { index, n });
        }
        Ok(Self {
            row: index / n,
            col: index % n,
        })
    }

    pub fn to_flat(self, n: usize) -> usize {
        self.row * n + self.col
    }
}

/// Number of cells in an `n x n` grid
pub fn cell_count(n: usize) -> Result<usize> {
    n.checked_mul(n).ok_or_else(|| Error::InvalidParameter {
        name: "n",
        reason: format!("{n} x {n} cells overflow usize"),
    })
}

/// Which column each row of a batch requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccessPattern {
    /// Row `i` requests column `i`
    #[default]
    Diagonal,
    /// Row `i` requests column `columns[i]`
    Columns(Vec<usize>),
}

impl AccessPattern {
    /// Flat indices of the requested cells, ordered by row
    pub fn indices(&self, n: usize) -> Result<Vec<usize>> {
        match self {
            AccessPattern::Diagonal => Ok(diagonal_indices(n)),
            AccessPattern::Columns(columns) => indices_for_columns(columns, n),
        }
    }
}

/// Flat indices of the main diagonal: `i * n + i`
pub fn diagonal_indices(n: usize) -> Vec<usize> {
    (0..n).map(|i| i * n + i).collect()
}

/// Flat indices for one explicit column per row
pub fn indices_for_columns(columns: &[usize], n: usize) -> Result<Vec<usize>> {
    if columns.len() != n {
        return Err(Error::DimensionMismatch {
            what: "column selection",
            expected: n,
            actual: columns.len(),
        });
    }

    columns
        .iter()
        .enumerate()
        .map(|(row, &col)| {
            if col >= n {
                Err(Error::CoordinateOutOfRange { row, col, n })
            } else {
                Ok(Coordinate::new(row, col).to_flat(n))
            }
        })
        .collect()
}

pub fn indices_to_coordinates(indices: &[usize], n: usize) -> Result<Vec<Coordinate>> {
    indices
        .iter()
        .map(|&index| Coordinate::from_flat(index, n))
        .collect()
}

/// Reorder a batch's requested flat indices so that entry `row` is the index
/// requested in that row.
///
/// The batch covers every row exactly once, so `n` is `requested.len()`.
pub fn targets_by_row(requested: &[usize]) -> Result<Vec<usize>> {
    let n = requested.len();
    let mut targets: Vec<Option<usize>> = vec![None; n];
    for &index in requested {
        let coord = Coordinate::from_flat(index, n)?;
        let slot = &mut targets[coord.row];
        if slot.is_some() {
            return Err(Error::DuplicateRow(coord.row));
        }
        *slot = Some(index);
    }

    targets
        .into_iter()
        .enumerate()
        .map(|(row, index)| index.ok_or(Error::MissingRow(row)))
        .collect()
}
