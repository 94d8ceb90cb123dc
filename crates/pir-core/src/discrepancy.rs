//! Cross-server discrepancy detection

use crate::{decode::DecodedEntry, decode::DecodedVector, Error, Result};

/// Rows where the servers' decoded entries differ, with every server's claim.
///
/// `claims(s)[k]` is server `s`'s entry at row `positions()[k]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discrepancies {
    positions: Vec<usize>,
    claims: Vec<Vec<DecodedEntry>>,
}

impl Discrepancies {
    /// Disagreeing row positions in increasing order
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Claims made by one server at each disagreeing position
    pub fn claims(&self, server: usize) -> &[DecodedEntry] {
        self.claims.get(server).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn server_count(&self) -> usize {
        self.claims.len()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.positions.binary_search(&row).is_ok()
    }
}

/// Compare two servers' decoded vectors
pub fn compare(a: &DecodedVector, b: &DecodedVector) -> Result<Discrepancies> {
    compare_all(&[a, b])
}

/// Compare any number of decoded vectors; a row is reported if any two differ.
///
/// Entries differ when their values differ or when only one of them decoded
/// exactly.
pub fn compare_all(decoded: &[&DecodedVector]) -> Result<Discrepancies> {
    let [first, rest @ ..] = decoded else {
        return Err(Error::TooFewServers(0));
    };
    if rest.is_empty() {
        return Err(Error::TooFewServers(1));
    }
    for other in rest {
        if other.len() != first.len() {
            return Err(Error::DimensionMismatch {
                what: "decoded vector",
                expected: first.len(),
                actual: other.len(),
            });
        }
    }

    let mut found = Discrepancies {
        positions: Vec::new(),
        claims: vec![Vec::new(); decoded.len()],
    };

    for (row, reference) in first.entries().iter().enumerate() {
        let agree = rest.iter().all(|other| &other.entries()[row] == reference);
        if agree {
            continue;
        }

        found.positions.push(row);
        for (server, vector) in decoded.iter().enumerate() {
            found.claims[server].push(vector.entries()[row].clone());
        }
    }

    if !found.is_empty() {
        tracing::info!(
            count = found.len(),
            positions = ?found.positions,
            "Servers disagree"
        );
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;

    fn exact(values: &[i64]) -> DecodedVector {
        DecodedVector::new(values.iter().map(|&v| DecodedEntry::exact(v)).collect())
    }

    #[test]
    fn test_identical_vectors_have_no_discrepancies() {
        let x = exact(&[1, 2, 3, 4]);
        let found = compare(&x, &x).unwrap();
        assert!(found.is_empty());
        assert_eq!(found.server_count(), 2);
    }

    #[test]
    fn test_identical_inexact_vectors_have_no_discrepancies() {
        let x = DecodedVector::new(vec![DecodedEntry {
            value: BigInt::from(9),
            exact: false,
        }]);
        assert!(compare(&x, &x).unwrap().is_empty());
    }

    #[test]
    fn test_reports_positions_and_both_claims() {
        let a = exact(&[10, 20, 30, 40]);
        let b = exact(&[10, 21, 30, 39]);

        let found = compare(&a, &b).unwrap();
        assert_eq!(found.positions(), &[1, 3]);
        assert_eq!(found.claims(0), &[DecodedEntry::exact(20), DecodedEntry::exact(40)]);
        assert_eq!(found.claims(1), &[DecodedEntry::exact(21), DecodedEntry::exact(39)]);
        assert!(found.contains(3));
        assert!(!found.contains(0));
    }

    #[test]
    fn test_exactness_alone_is_a_discrepancy() {
        let a = exact(&[7]);
        let b = DecodedVector::new(vec![DecodedEntry {
            value: BigInt::from(7),
            exact: false,
        }]);
        assert_eq!(compare(&a, &b).unwrap().positions(), &[0]);
    }

    #[test]
    fn test_three_servers() {
        let a = exact(&[1, 2, 3]);
        let b = exact(&[1, 2, 3]);
        let c = exact(&[1, 5, 3]);

        let found = compare_all(&[&a, &b, &c]).unwrap();
        assert_eq!(found.positions(), &[1]);
        assert_eq!(found.server_count(), 3);
        assert_eq!(found.claims(2), &[DecodedEntry::exact(5)]);
        assert!(found.claims(3).is_empty());
    }

    #[test]
    fn test_requires_two_equal_length_vectors() {
        let a = exact(&[1, 2]);
        let b = exact(&[1]);
        assert!(matches!(compare_all(&[&a]), Err(Error::TooFewServers(1))));
        assert!(matches!(compare_all(&[]), Err(Error::TooFewServers(0))));
        assert!(matches!(
            compare(&a, &b),
            Err(Error::DimensionMismatch { expected: 2, actual: 1, .. })
        ));
    }
}
