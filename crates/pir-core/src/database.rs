//! Square database of arbitrary-precision records
//!
//! Records are stored row-major, so the flat index of cell `(row, col)` is
//! `row * n + col`. A database is never mutated after construction; servers
//! and the reconciler share it behind an `Arc`.

use num_bigint::{BigUint, RandBigInt};
use rand::{CryptoRng, RngCore};
use rayon::slice::{Chunks, ParallelSlice};

use crate::{coords::cell_count, Error, Result, MAX_NUM_BITS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    data: Vec<BigUint>,
    n: usize,
    num_bits: u32,
}

impl Database {
    /// Fill an `n x n` grid with uniform records in `[0, 2^num_bits)`
    pub fn generate<R>(n: usize, num_bits: u32, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        if n == 0 {
            return Err(Error::EmptyDatabase);
        }
        if num_bits == 0 || num_bits > MAX_NUM_BITS {
            return Err(Error::InvalidBitWidth(num_bits));
        }

        let data = (0..cell_count(n)?)
            .map(|_| rng.gen_biguint(u64::from(num_bits)))
            .collect();

        tracing::info!(n, num_bits, "Generated database");
        Ok(Self { data, n, num_bits })
    }

    /// Build from explicit rows. The bit width is that of the widest record.
    pub fn from_rows(rows: Vec<Vec<BigUint>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::EmptyDatabase);
        }

        let mut data = Vec::with_capacity(cell_count(n)?);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(Error::NonSquareDatabase {
                    row,
                    len: values.len(),
                    expected: n,
                });
            }
            data.extend(values);
        }

        let widest = data.iter().map(BigUint::bits).max().unwrap_or(0).max(1);
        let num_bits = u32::try_from(widest).map_err(|_| Error::InvalidBitWidth(u32::MAX))?;
        if num_bits > MAX_NUM_BITS {
            return Err(Error::InvalidBitWidth(num_bits));
        }

        Ok(Self { data, n, num_bits })
    }

    /// Convenience constructor for small fixed databases
    pub fn from_u64_rows(rows: &[Vec<u64>]) -> Result<Self> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().copied().map(BigUint::from).collect())
                .collect(),
        )
    }

    pub fn dimension(&self) -> usize {
        self.n
    }

    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Total number of cells (`n * n`)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `i` as a slice; panics if `i >= n`
    pub fn row(&self, i: usize) -> &[BigUint] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, BigUint> {
        self.data.chunks(self.n)
    }

    /// Rows as a parallel iterator
    pub fn par_rows(&self) -> Chunks<'_, BigUint> {
        self.data.par_chunks(self.n)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&BigUint> {
        if row >= self.n || col >= self.n {
            return None;
        }
        self.data.get(row * self.n + col)
    }

    pub fn get_flat(&self, index: usize) -> Option<&BigUint> {
        self.data.get(index)
    }

    /// `(flat index, record)` pairs in row-major order
    pub fn iter_flat(&self) -> impl Iterator<Item = (usize, &BigUint)> {
        self.data.iter().enumerate()
    }
}

/// Generate an `n x n` database from a cryptographically secure source
pub fn generate_database<R>(n: usize, num_bits: u32, rng: &mut R) -> Result<Database>
where
    R: RngCore + CryptoRng,
{
    Database::generate(n, num_bits, rng)
}
