//! Process-based strategy: one OS process per row range, results returned
//! over per-worker pipes.

pub mod frame;
pub mod pool;
pub mod worker;

pub use pool::{ProcessPool, WORKER_SUBCOMMAND};
pub use worker::serve;
