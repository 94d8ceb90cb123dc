//! Batch PIR driver
//!
//! Sequences one protocol session:
//! 1. Generate the database and the client's hints (offline)
//! 2. Build the batch query and collect both servers' answers
//! 3. Decode, compare and reconcile into the final result map
//!
//! Either server can be made Byzantine through a fault plan.

pub mod driver;
pub mod report;

pub use driver::{load_config, run, FaultSpec, RunOptions};
pub use report::{Report, Timings};
