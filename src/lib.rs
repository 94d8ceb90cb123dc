//! Two-server batch PIR with Byzantine answer reconciliation
//!
//! Re-exports the protocol primitives, the server side and the client so
//! that a single dependency covers a whole session.

pub use pir_client as client;
pub use pir_core as core;
pub use pir_server as server;

pub use pir_client::{BatchOutcome, BatchQuery, HintStore, PirClient};
pub use pir_core::{AccessPattern, Database, ProtocolConfig, QueryParams, ResultMap, Retrieved};
pub use pir_server::{FaultPlan, FaultyResponder, Responder, ServerSet};
