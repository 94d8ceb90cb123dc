//! PIR Core - Shared primitives for two-server batch PIR
//!
//! This crate provides:
//! - Database and secret vector generation
//! - Linear hint computation
//! - Query construction, answer computation and decoding
//! - Cross-server discrepancy detection and reconciliation
//!
//! # Protocol
//!
//! The client holds a secret vector `s` and, per database row, the hint
//! `h[i] = <DB[i], s>`. To fetch column `c` of row `i` it sends the row query
//! `alpha * s + beta * e_c`. Each server returns `<DB[i], q[i]>`, and the
//! client recovers `DB[i][c] = (answer[i] - alpha * h[i]) / beta`.
//!
//! All arithmetic is exact over unbounded integers. Two servers answer the
//! same query; rows where their decoded values differ are checked against the
//! raw database to find which server, if any, can be trusted.

pub mod answer;
pub mod config;
pub mod coords;
pub mod database;
pub mod decimal;
pub mod decode;
pub mod discrepancy;
mod error;
pub mod hint;
pub mod query;
pub mod reconcile;
pub mod result;
pub mod rng;
pub mod secret;

pub use answer::{compute_answer, AnswerVector};
pub use config::ProtocolConfig;
pub use coords::{
    cell_count, diagonal_indices, indices_for_columns, indices_to_coordinates, targets_by_row,
    AccessPattern, Coordinate,
};
pub use database::{generate_database, Database};
pub use decode::{decode, DecodedEntry, DecodedVector};
pub use discrepancy::{compare, compare_all, Discrepancies};
pub use error::{Error, Result};
pub use hint::{compute_hint, Hint};
pub use query::{build_queries, QueryMatrix, QueryParams};
pub use reconcile::{reconcile, resolve, search_entry, MatchSets, Resolution, ValueIndex};
pub use result::{assemble_results, ResultMap, Retrieved};
pub use rng::SessionRng;
pub use secret::{generate_secret_vector, SecretVector};

/// Secret coefficients are drawn from `[SECRET_COEFF_MIN, SECRET_COEFF_MAX)`
pub const SECRET_COEFF_MIN: u32 = 1;

/// Exclusive upper bound for secret coefficients
pub const SECRET_COEFF_MAX: u32 = 100;

/// Largest supported record width in bits
pub const MAX_NUM_BITS: u32 = 4096;
