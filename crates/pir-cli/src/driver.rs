//! One protocol session, phase by phase

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use num_bigint::{BigInt, BigUint};
use pir_client::PirClient;
use pir_core::{generate_database, AccessPattern, ProtocolConfig, SessionRng};
use pir_server::{FaultPlan, FaultyResponder, Responder, ServerSet};

use crate::report::{Report, Timings};

/// How one server misbehaves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FaultSpec {
    #[default]
    Honest,
    /// Add `offset` to each listed row of the answer
    Rows { rows: Vec<usize>, offset: BigInt },
    /// Shift `count` random rows by random nonzero multiples of beta
    Random { count: usize },
}

impl FaultSpec {
    /// Shift `rows` by `multiple * beta`
    pub fn beta_multiple(rows: Vec<usize>, beta: &BigUint, multiple: i64) -> Self {
        Self::Rows {
            rows,
            offset: BigInt::from(beta.clone()) * multiple,
        }
    }

    fn plan(&self, n: usize, beta: &BigUint, rng: &mut SessionRng) -> anyhow::Result<FaultPlan> {
        let plan = match self {
            FaultSpec::Honest => FaultPlan::new(),
            FaultSpec::Rows { rows, offset } => rows
                .iter()
                .try_fold(FaultPlan::new(), |plan, &row| plan.with_fault(row, offset.clone()))?,
            FaultSpec::Random { count } => FaultPlan::random(n, *count, beta, rng.fast())?,
        };
        Ok(plan)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub pattern: AccessPattern,
    /// One entry per server; the protocol runs with two
    pub faults: [FaultSpec; 2],
    /// Fixed seed for a reproducible session; OS entropy otherwise
    pub seed: Option<u64>,
}

/// Read the config file if one is given; defaults otherwise
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ProtocolConfig> {
    match path {
        Some(path) => ProtocolConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ProtocolConfig::default()),
    }
}

/// Run one full session and report what the client retrieved
pub fn run(config: &ProtocolConfig, options: &RunOptions) -> anyhow::Result<Report> {
    config.validate().context("invalid protocol config")?;
    let params = config.query_params()?;

    let mut rng = match options.seed {
        Some(seed) => SessionRng::from_seed(seed),
        None => SessionRng::from_os().context("failed to seed session randomness")?,
    };

    tracing::info!("Preprocessing");
    let total_start = Instant::now();
    let preprocess_start = Instant::now();
    let db = Arc::new(generate_database(config.n, config.num_bits, rng.secure())?);
    let client = PirClient::setup(&db, params, &mut rng)?;
    let preprocess = preprocess_start.elapsed();
    tracing::info!(elapsed_ms = ms(preprocess), "Preprocess done");

    let mut servers = ServerSet::new();
    for (server, spec) in options.faults.iter().enumerate() {
        let plan = spec
            .plan(config.n, &config.beta, &mut rng)
            .with_context(|| format!("invalid fault plan for server {server}"))?;
        if !plan.is_empty() {
            tracing::info!(server, rows = ?plan.rows().collect::<Vec<_>>(), "Server will tamper");
        }
        servers = servers.with_server(FaultyResponder::new(Responder::new(Arc::clone(&db)), plan));
    }

    tracing::info!("Online");
    let online_start = Instant::now();
    let query_start = Instant::now();
    let batch = client.build_batch(&options.pattern)?;
    let query = query_start.elapsed();
    tracing::info!(elapsed_ms = ms(query), "Query constructed");

    let server_start = Instant::now();
    let answers = servers.respond_all(&batch.queries)?;
    let server = server_start.elapsed();
    tracing::info!(elapsed_ms = ms(server), "Servers answered");

    let client_start = Instant::now();
    let decoded = client.decode_answers(&answers)?;
    let outcome = client.finish(&batch, &decoded, &db)?;
    let client_time = client_start.elapsed();
    let online = online_start.elapsed();

    if outcome.is_clean() {
        tracing::info!("No Byzantine server detected");
    }
    tracing::info!(
        client_ms = ms(client_time),
        online_ms = ms(online),
        total_ms = ms(total_start.elapsed()),
        "Session finished"
    );

    let expected = batch
        .indices
        .iter()
        .filter_map(|&index| db.get_flat(index).map(|value| (index, value.clone())))
        .collect();

    Ok(Report {
        n: config.n,
        num_bits: config.num_bits,
        requested: batch.indices,
        disagreeing_rows: outcome.discrepancies.positions().to_vec(),
        resolutions: outcome.resolutions,
        results: outcome.results,
        expected,
        timings: Timings {
            preprocess_ms: ms(preprocess),
            query_ms: ms(query),
            server_ms: ms(server),
            client_ms: ms(client_time),
            online_ms: ms(online),
        },
    })
}

fn ms(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
