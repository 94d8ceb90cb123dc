//! Reconciliation of disagreeing answers against the raw database
//!
//! For every disagreeing row, each server's claimed value is looked up in
//! the database. A claim is backed when the flat index the client actually
//! requested is one of the positions holding that value. If at least one
//! server is backed and every backed server claims the same value, the first
//! of them wins; otherwise the row stays unresolved. There is no tie-break
//! between different backed values.
//!
//! Claims that cannot be records (inexact or negative) match nothing.

use std::collections::HashMap;

use num_bigint::BigUint;
use serde::Serialize;

use crate::{
    coords::targets_by_row, database::Database, discrepancy::Discrepancies, Error, Result,
};

/// `matches[server][k]`: flat indices holding server's claim at the k-th disagreement
pub type MatchSets = Vec<Vec<Vec<usize>>>;

/// Value to positions multi-map over the whole database, built once per pass.
///
/// Duplicate records keep every position, in row-major order.
#[derive(Debug, Clone, Default)]
pub struct ValueIndex {
    positions: HashMap<BigUint, Vec<usize>>,
}

impl ValueIndex {
    pub fn build(db: &Database) -> Self {
        let mut positions: HashMap<BigUint, Vec<usize>> = HashMap::with_capacity(db.len());
        for (index, value) in db.iter_flat() {
            positions.entry(value.clone()).or_default().push(index);
        }
        Self { positions }
    }

    /// All flat indices holding `value`
    pub fn positions(&self, value: &BigUint) -> &[usize] {
        self.positions.get(value).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct values
    pub fn distinct_values(&self) -> usize {
        self.positions.len()
    }
}

/// Linear scan for every flat index holding `entry`
pub fn search_entry(entry: &BigUint, db: &Database) -> Vec<usize> {
    db.iter_flat()
        .filter(|(_, value)| *value == entry)
        .map(|(index, _)| index)
        .collect()
}

/// Find the candidate positions of every server's claims
pub fn reconcile(discrepancies: &Discrepancies, db: &Database) -> MatchSets {
    if discrepancies.is_empty() {
        return vec![Vec::new(); discrepancies.server_count()];
    }

    let index = ValueIndex::build(db);
    tracing::debug!(
        distinct = index.distinct_values(),
        cells = db.len(),
        "Built value index"
    );

    (0..discrepancies.server_count())
        .map(|server| {
            discrepancies
                .claims(server)
                .iter()
                .map(|claim| match claim.as_record() {
                    Some(value) => index.positions(&value).to_vec(),
                    None => Vec::new(),
                })
                .collect()
        })
        .collect()
}

/// Terminal outcome for one disagreeing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Resolved {
        server: usize,
        #[serde(with = "crate::decimal")]
        value: BigUint,
    },
    Unresolved,
}

/// Decide every disagreeing row.
///
/// `requested` holds the batch's flat indices, one per row in any order.
pub fn resolve(
    discrepancies: &Discrepancies,
    matches: &MatchSets,
    requested: &[usize],
) -> Result<Vec<Resolution>> {
    if matches.len() != discrepancies.server_count() {
        return Err(Error::DimensionMismatch {
            what: "match sets",
            expected: discrepancies.server_count(),
            actual: matches.len(),
        });
    }
    if let Some(bad) = matches.iter().find(|m| m.len() != discrepancies.len()) {
        return Err(Error::DimensionMismatch {
            what: "match sets per server",
            expected: discrepancies.len(),
            actual: bad.len(),
        });
    }

    let targets = targets_by_row(requested)?;

    discrepancies
        .positions()
        .iter()
        .enumerate()
        .map(|(k, &row)| {
            let target = *targets.get(row).ok_or(Error::DimensionMismatch {
                what: "requested indices",
                expected: row + 1,
                actual: requested.len(),
            })?;

            let backing: Vec<usize> = (0..matches.len())
                .filter(|&server| matches[server][k].contains(&target))
                .collect();
            let claims: Vec<Option<BigUint>> = backing
                .iter()
                .map(|&server| discrepancies.claims(server)[k].as_record())
                .collect();

            let resolution = match (backing.first(), claims.first()) {
                (Some(&server), Some(Some(value)))
                    if claims.iter().all(|claim| claim.as_ref() == Some(value)) =>
                {
                    Resolution::Resolved {
                        server,
                        value: value.clone(),
                    }
                }
                _ => Resolution::Unresolved,
            };

            match &resolution {
                Resolution::Resolved { server, .. } => {
                    tracing::info!(row, target, server, "Resolved disagreement")
                }
                Resolution::Unresolved => {
                    tracing::warn!(row, target, backing = ?backing, "Disagreement left unresolved")
                }
            }
            Ok(resolution)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;
    use crate::decode::{DecodedEntry, DecodedVector};
    use crate::discrepancy::{compare, compare_all};

    fn exact(values: &[i64]) -> DecodedVector {
        DecodedVector::new(values.iter().map(|&v| DecodedEntry::exact(v)).collect())
    }

    fn grid() -> Database {
        //  0: 11  1: 12  2: 13
        //  3: 14  4: 15  5: 11
        //  6: 17  7: 18  8: 19
        Database::from_u64_rows(&[vec![11, 12, 13], vec![14, 15, 11], vec![17, 18, 19]]).unwrap()
    }

    #[test]
    fn test_search_entry_finds_duplicates() {
        let db = grid();
        assert_eq!(search_entry(&BigUint::from(11u32), &db), vec![0, 5]);
        assert_eq!(search_entry(&BigUint::from(15u32), &db), vec![4]);
        assert!(search_entry(&BigUint::from(99u32), &db).is_empty());
    }

    #[test]
    fn test_value_index_agrees_with_linear_scan() {
        let db = grid();
        let index = ValueIndex::build(&db);
        assert_eq!(index.distinct_values(), 8);
        for value in 0u32..25 {
            let value = BigUint::from(value);
            assert_eq!(index.positions(&value), search_entry(&value, &db).as_slice());
        }
    }

    #[test]
    fn test_resolves_to_honest_server() {
        let db = grid();
        let requested = [0, 4, 8];
        // Server 0 lies on row 1 (claims 16), server 1 lies on row 2 (claims 18)
        let a = exact(&[11, 16, 19]);
        let b = exact(&[11, 15, 18]);

        let found = compare(&a, &b).unwrap();
        let matches = reconcile(&found, &db);
        assert_eq!(matches[0], vec![vec![], vec![8]]);
        assert_eq!(matches[1], vec![vec![4], vec![7]]);

        let resolutions = resolve(&found, &matches, &requested).unwrap();
        assert_eq!(
            resolutions,
            vec![
                Resolution::Resolved {
                    server: 1,
                    value: BigUint::from(15u32)
                },
                Resolution::Resolved {
                    server: 0,
                    value: BigUint::from(19u32)
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_value_does_not_vouch_for_wrong_position() {
        // Row 1 requests index 4 (value 15). The liar claims 11, which exists
        // in the database at 0 and 5, so its match set is non-empty, yet the
        // requested index is not in it.
        let db = grid();
        let requested = [0, 4, 8];
        let a = exact(&[11, 11, 19]);
        let b = exact(&[11, 15, 19]);

        let found = compare(&a, &b).unwrap();
        let matches = reconcile(&found, &db);
        assert_eq!(matches[0], vec![vec![0, 5]]);

        let resolutions = resolve(&found, &matches, &requested).unwrap();
        assert_eq!(
            resolutions,
            vec![Resolution::Resolved {
                server: 1,
                value: BigUint::from(15u32)
            }]
        );
    }

    #[test]
    fn test_ambiguous_when_neither_claim_backs_request() {
        // Both servers lie on row 1 with values that exist elsewhere in the
        // database; neither match set contains the requested index.
        let db = grid();
        let requested = [0, 4, 8];
        let a = exact(&[11, 11, 19]);
        let b = exact(&[11, 18, 19]);

        let found = compare(&a, &b).unwrap();
        let matches = reconcile(&found, &db);
        assert_eq!(matches[0], vec![vec![0, 5]]);
        assert_eq!(matches[1], vec![vec![7]]);

        let resolutions = resolve(&found, &matches, &requested).unwrap();
        assert_eq!(resolutions, vec![Resolution::Unresolved]);
    }

    #[test]
    fn test_ambiguous_when_both_match_sets_back_request() {
        // Hand-built match sets where the requested index appears for both
        // servers: no tie-break is applied.
        let db = grid();
        let a = exact(&[11]);
        let b = exact(&[12]);
        let found = compare(&a, &b).unwrap();
        let matches: MatchSets = vec![vec![vec![0]], vec![vec![0, 1]]];

        let resolutions = resolve(&found, &matches, &[0]).unwrap();
        assert_eq!(resolutions, vec![Resolution::Unresolved]);
        assert_eq!(search_entry(&BigUint::from(11u32), &db), vec![0, 5]);
    }

    #[test]
    fn test_agreeing_honest_majority_resolves() {
        let db = grid();
        let requested = [0, 4, 8];
        let liar = exact(&[11, 17, 19]);
        let honest = exact(&[11, 15, 19]);

        let found = compare_all(&[&liar, &honest, &honest]).unwrap();
        let matches = reconcile(&found, &db);
        assert_eq!(matches, vec![vec![vec![6]], vec![vec![4]], vec![vec![4]]]);

        let resolutions = resolve(&found, &matches, &requested).unwrap();
        assert_eq!(
            resolutions,
            vec![Resolution::Resolved {
                server: 1,
                value: BigUint::from(15u32)
            }]
        );
    }

    #[test]
    fn test_requested_indices_in_any_row_order() {
        let db = grid();
        let a = exact(&[11, 16, 19]);
        let b = exact(&[11, 15, 18]);
        let found = compare(&a, &b).unwrap();
        let matches = reconcile(&found, &db);

        let in_order = resolve(&found, &matches, &[0, 4, 8]).unwrap();
        let shuffled = resolve(&found, &matches, &[8, 0, 4]).unwrap();
        assert_eq!(in_order, shuffled);
        assert!(resolve(&found, &matches, &[0, 1, 8]).is_err());
    }

    #[test]
    fn test_untrustworthy_claims_match_nothing() {
        let db = grid();
        let a = DecodedVector::new(vec![DecodedEntry {
            value: BigInt::from(15),
            exact: false,
        }]);
        let b = exact(&[-15]);
        let found = compare(&a, &b).unwrap();

        let matches = reconcile(&found, &db);
        assert_eq!(matches, vec![vec![Vec::<usize>::new()], vec![Vec::<usize>::new()]]);
        assert_eq!(
            resolve(&found, &matches, &[0]).unwrap(),
            vec![Resolution::Unresolved]
        );
    }

    #[test]
    fn test_no_discrepancies_no_work() {
        let db = grid();
        let a = exact(&[11, 15, 19]);
        let found = compare(&a, &a).unwrap();
        let matches = reconcile(&found, &db);
        assert_eq!(matches, vec![Vec::<Vec<usize>>::new(), Vec::new()]);
        assert!(resolve(&found, &matches, &[0, 4, 8]).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_rejects_mismatched_match_sets() {
        let a = exact(&[1]);
        let b = exact(&[2]);
        let found = compare(&a, &b).unwrap();
        assert!(resolve(&found, &vec![vec![vec![0]]], &[0]).is_err());
        assert!(resolve(&found, &vec![vec![], vec![]], &[0]).is_err());
        assert!(resolve(&found, &vec![vec![vec![0]], vec![vec![1]]], &[]).is_err());
    }
}
