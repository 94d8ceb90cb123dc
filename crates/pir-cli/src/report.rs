//! Session report

use std::collections::BTreeMap;

use num_bigint::BigUint;
use pir_core::{Resolution, ResultMap, Retrieved};
use serde::Serialize;

/// Phase durations in milliseconds
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timings {
    pub preprocess_ms: f64,
    pub query_ms: f64,
    pub server_ms: f64,
    pub client_ms: f64,
    pub online_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub n: usize,
    pub num_bits: u32,
    pub requested: Vec<usize>,
    pub disagreeing_rows: Vec<usize>,
    pub resolutions: Vec<Resolution>,
    pub results: ResultMap,
    /// Ground truth read straight from the database, for checking only
    #[serde(skip)]
    pub expected: BTreeMap<usize, BigUint>,
    pub timings: Timings,
}

impl Report {
    /// Every requested index resolved to the value actually stored there
    pub fn all_correct(&self) -> bool {
        self.requested
            .iter()
            .all(|index| self.results.value(*index) == self.expected.get(index))
    }

    /// Human-readable summary on stdout
    pub fn print(&self) {
        println!("n = {}, num_bits = {}", self.n, self.num_bits);
        if self.disagreeing_rows.is_empty() {
            println!("No Byzantine server detected");
        } else {
            println!("Disagreeing rows: {:?}", self.disagreeing_rows);
            for (row, resolution) in self.disagreeing_rows.iter().zip(&self.resolutions) {
                match resolution {
                    Resolution::Resolved { server, .. } => {
                        println!("  row {row}: trusted server {server}")
                    }
                    Resolution::Unresolved => println!("  row {row}: unresolved"),
                }
            }
        }

        for (index, retrieved) in self.results.iter() {
            match retrieved {
                Retrieved::Value(value) => println!("{index}: {value}"),
                Retrieved::Unresolved => println!("{index}: <unresolved>"),
            }
        }

        let t = &self.timings;
        println!(
            "preprocess {:.3} ms | query {:.3} ms | server {:.3} ms | client {:.3} ms | online {:.3} ms",
            t.preprocess_ms, t.query_ms, t.server_ms, t.client_ms, t.online_ms
        );
    }
}
