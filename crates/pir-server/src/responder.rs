//! Query responder - computes the per-row answer over the shared database

use std::sync::Arc;

use pir_core::{compute_answer, AnswerVector, Database, QueryMatrix};

use crate::Result;

/// Database handle for responding to queries
#[derive(Debug, Clone)]
pub struct Responder {
    db: Arc<Database>,
}

impl Responder {
    /// Create a responder over a shared database
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Process a query matrix and return one answer per row
    pub fn respond(&self, queries: &QueryMatrix) -> Result<AnswerVector> {
        let start = std::time::Instant::now();
        let answer = compute_answer(&self.db, queries)?;

        tracing::debug!(
            rows = answer.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Computed answer"
        );
        Ok(answer)
    }

    /// Database dimension
    pub fn dimension(&self) -> usize {
        self.db.dimension()
    }
}
