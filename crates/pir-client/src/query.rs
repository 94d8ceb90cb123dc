//! Query construction and execution

use pir_core::{
    assemble_results, build_queries, compare_all, decode, indices_to_coordinates, reconcile,
    resolve, AccessPattern, AnswerVector, Coordinate, Database, DecodedVector, Discrepancies,
    MatchSets, QueryMatrix, QueryParams, Resolution, ResultMap, SessionRng,
};
use pir_server::ServerSet;

use crate::{hint_store::HintStore, ClientError, Result};

/// PIR client session
#[derive(Debug, Clone)]
pub struct PirClient {
    /// Local hint store
    hints: HintStore,
    /// Public blinding constants
    params: QueryParams,
}

/// One batch: a requested cell per row and the query that fetches them
#[derive(Debug, Clone)]
pub struct BatchQuery {
    /// Requested flat index for each row
    pub indices: Vec<usize>,
    pub coordinates: Vec<Coordinate>,
    /// The only part of the batch that is sent to servers
    pub queries: QueryMatrix,
}

/// Everything the client learned from one batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: ResultMap,
    pub discrepancies: Discrepancies,
    /// Candidate positions per server and disagreement; empty when all agree
    pub matches: MatchSets,
    pub resolutions: Vec<Resolution>,
}

impl BatchOutcome {
    /// True when every server agreed on every row
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

impl PirClient {
    pub fn new(hints: HintStore, params: QueryParams) -> Self {
        Self { hints, params }
    }

    /// Offline phase: draw the secret vector from the session's fast
    /// generator and precompute hints for `db`
    pub fn setup(db: &Database, params: QueryParams, rng: &mut SessionRng) -> Result<Self> {
        let hints = HintStore::build(db, rng.fast())?;
        Ok(Self::new(hints, params))
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn hints(&self) -> &HintStore {
        &self.hints
    }

    /// Build the query matrix for one cell per row
    pub fn build_batch(&self, pattern: &AccessPattern) -> Result<BatchQuery> {
        let n = self.hints.dimension();
        let indices = pattern.indices(n)?;
        let coordinates = indices_to_coordinates(&indices, n)?;
        let queries = build_queries(&coordinates, self.hints.vector(), &self.params)?;

        Ok(BatchQuery {
            indices,
            coordinates,
            queries,
        })
    }

    /// Decode every server's answer with the local hint
    pub fn decode_answers(&self, answers: &[AnswerVector]) -> Result<Vec<DecodedVector>> {
        answers
            .iter()
            .map(|answer| decode(answer, self.hints.hint(), &self.params).map_err(ClientError::from))
            .collect()
    }

    /// Compare decoded answers, reconcile disagreements against `db`, and
    /// assemble the result map
    pub fn finish(
        &self,
        batch: &BatchQuery,
        decoded: &[DecodedVector],
        db: &Database,
    ) -> Result<BatchOutcome> {
        let refs: Vec<&DecodedVector> = decoded.iter().collect();
        let discrepancies = compare_all(&refs)?;

        let (matches, resolutions) = if discrepancies.is_empty() {
            tracing::info!(rows = batch.indices.len(), "All servers agree");
            (MatchSets::new(), Vec::new())
        } else {
            let start = std::time::Instant::now();
            let matches = reconcile(&discrepancies, db);
            let resolutions = resolve(&discrepancies, &matches, &batch.indices)?;
            tracing::info!(
                disagreements = discrepancies.len(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Reconciled disagreements"
            );
            (matches, resolutions)
        };

        let agreed = decoded
            .first()
            .ok_or_else(|| ClientError::InvalidResponse("no decoded answers".to_string()))?;
        let results = assemble_results(&batch.indices, agreed, &discrepancies, &resolutions)?;

        Ok(BatchOutcome {
            results,
            discrepancies,
            matches,
            resolutions,
        })
    }

    /// Run one full online round against `servers`
    pub fn retrieve(
        &self,
        pattern: &AccessPattern,
        servers: &ServerSet,
        db: &Database,
    ) -> Result<BatchOutcome> {
        let batch = self.build_batch(pattern)?;
        let answers = servers.respond_all(&batch.queries)?;
        let decoded = self.decode_answers(&answers)?;
        self.finish(&batch, &decoded, db)
    }
}
