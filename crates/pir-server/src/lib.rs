//! PIR server side
//!
//! Each server holds the same read-only database and answers a query matrix
//! with one inner product per row. Servers never see the client's secret
//! vector or hint. A `FaultyResponder` simulates a Byzantine server by
//! perturbing an honest answer according to a `FaultPlan`.

mod error;
pub mod fault;
pub mod responder;
pub mod server_set;

pub use error::{Result, ServerError};
pub use fault::{FaultPlan, FaultyResponder};
pub use responder::Responder;
pub use server_set::{AnswerServer, ServerSet};
