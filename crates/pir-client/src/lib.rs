//! PIR client
//!
//! The client owns everything the servers must never see: the secret
//! blinding vector and the hint derived from it. It builds batch queries,
//! decodes every server's answer, and reconciles disagreements against the
//! database before producing the final result map.

mod error;
pub mod hint_store;
pub mod query;

pub use error::{ClientError, Result};
pub use hint_store::HintStore;
pub use query::{BatchOutcome, BatchQuery, PirClient};
