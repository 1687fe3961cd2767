//! Error types for the multiplication strategies.

use std::process::ExitStatus;

use thiserror::Error;

use crate::process::frame::FrameError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid seed {seed:?}: {reason}")]
    InvalidSeed { seed: String, reason: &'static str },

    #[error("matrix is not square: {rows} rows, row {row} has {cols} columns")]
    NotSquare { rows: usize, row: usize, cols: usize },

    #[error("failed to spawn process worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn thread worker {worker}: {source}")]
    ThreadSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("channel to worker {worker} failed: {source}")]
    Channel {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("incomplete result from worker {worker}: expected {expected} bytes, received {received}")]
    IncompleteResult {
        worker: usize,
        expected: usize,
        received: usize,
    },

    #[error("malformed frame from worker {worker}: {reason}")]
    MalformedFrame { worker: usize, reason: String },

    #[error("worker {worker} exited with {status}")]
    WorkerExit { worker: usize, status: ExitStatus },

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
