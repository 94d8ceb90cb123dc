//! Batch PIR CLI
//!
//! Runs one two-server batch PIR session over a random database, optionally
//! with one or both servers tampering with their answers, and prints what the
//! client retrieved.
//!
//! Usage:
//!   batch-pir --n 64 --num-bits 64 --tamper-a 3,7 --tamper-b 12 --tamper-multiple 2

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use num_bigint::{BigInt, BigUint};
use pir_cli::{load_config, run, FaultSpec, RunOptions};
use pir_core::AccessPattern;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "batch-pir")]
#[command(about = "Two-server batch PIR with Byzantine answer reconciliation")]
struct Args {
    /// Protocol config file (.json, or key = value lines)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database dimension (overrides the config file)
    #[arg(long)]
    n: Option<usize>,

    /// Record width in bits (overrides the config file)
    #[arg(long)]
    num_bits: Option<u32>,

    /// Secret scaling constant (overrides the config file)
    #[arg(long)]
    alpha: Option<BigUint>,

    /// Selection constant (overrides the config file)
    #[arg(long)]
    beta: Option<BigUint>,

    /// Rows server A tampers with
    #[arg(long, value_delimiter = ',')]
    tamper_a: Vec<usize>,

    /// Rows server B tampers with
    #[arg(long, value_delimiter = ',')]
    tamper_b: Vec<usize>,

    /// Server A adds `multiple * beta`, server B subtracts it
    #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
    tamper_multiple: i64,

    /// Raw offset instead of a beta multiple; decodes become inexact
    #[arg(long, allow_hyphen_values = true, conflicts_with = "tamper_multiple")]
    offset: Option<BigInt>,

    /// Tamper with this many random rows on server A, each by a random
    /// nonzero multiple of beta
    #[arg(long, conflicts_with_all = ["tamper_a", "offset"])]
    random_faults: Option<usize>,

    /// Column to read from each row (defaults to the diagonal)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<usize>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn fault(&self, rows: &[usize], beta: &BigUint, sign: i64) -> FaultSpec {
        if rows.is_empty() {
            return FaultSpec::Honest;
        }
        match &self.offset {
            Some(offset) => FaultSpec::Rows {
                rows: rows.to_vec(),
                offset: offset * sign,
            },
            None => FaultSpec::beta_multiple(rows.to_vec(), beta, self.tamper_multiple * sign),
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so that --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(n) = args.n {
        config.n = n;
    }
    if let Some(num_bits) = args.num_bits {
        config.num_bits = num_bits;
    }
    if let Some(alpha) = &args.alpha {
        config.alpha = alpha.clone();
    }
    if let Some(beta) = &args.beta {
        config.beta = beta.clone();
    }

    let pattern = if args.columns.is_empty() {
        AccessPattern::Diagonal
    } else {
        AccessPattern::Columns(args.columns.clone())
    };

    let fault_a = match args.random_faults {
        Some(count) => FaultSpec::Random { count },
        None => args.fault(&args.tamper_a, &config.beta, 1),
    };
    let fault_b = args.fault(&args.tamper_b, &config.beta, -1);

    tracing::info!(
        n = config.n,
        num_bits = config.num_bits,
        alpha = %config.alpha,
        beta = %config.beta,
        "Starting session"
    );

    let options = RunOptions {
        pattern,
        faults: [fault_a, fault_b],
        seed: args.seed,
    };
    let report = run(&config, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    if !report.all_correct() {
        tracing::warn!("Some requested records were not recovered");
    }

    Ok(())
}
