//! Indexed collection of servers answering the same query

use std::sync::Arc;

use pir_core::{AnswerVector, Database, QueryMatrix};
use rayon::prelude::*;

use crate::{responder::Responder, Result};

/// Anything that can answer a query matrix
pub trait AnswerServer: Send + Sync {
    fn respond(&self, queries: &QueryMatrix) -> Result<AnswerVector>;
}

impl AnswerServer for Responder {
    fn respond(&self, queries: &QueryMatrix) -> Result<AnswerVector> {
        Responder::respond(self, queries)
    }
}

/// Servers addressed by position; answer `i` always comes from server `i`
#[derive(Default)]
pub struct ServerSet {
    servers: Vec<Box<dyn AnswerServer>>,
}

impl ServerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two honest servers over the same database
    pub fn honest_pair(db: Arc<Database>) -> Self {
        Self::new()
            .with_server(Responder::new(Arc::clone(&db)))
            .with_server(Responder::new(db))
    }

    pub fn with_server(mut self, server: impl AnswerServer + 'static) -> Self {
        self.servers.push(Box::new(server));
        self
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Send the same query to every server, in parallel
    pub fn respond_all(&self, queries: &QueryMatrix) -> Result<Vec<AnswerVector>> {
        let start = std::time::Instant::now();
        let answers = self
            .servers
            .par_iter()
            .enumerate()
            .map(|(server, responder)| {
                tracing::debug!(server, "Answering query");
                responder.respond(queries)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            servers = answers.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "All servers answered"
        );
        Ok(answers)
    }
}
