//! Square integer matrix multiplication, five ways.
//!
//! Every strategy splits the output rows into contiguous ranges, one per
//! worker, and runs the same row kernel. They differ only in what a worker
//! is and how its rows get back:
//!
//! - sequential: one thread, the correctness baseline
//! - processes: one OS process per range, rows returned over a pipe
//! - joined threads: scoped threads writing straight into the result
//! - mixed threads: half detached, half joined, each worker self-checking
//! - detached threads: nobody joins, completion tracked by a handle
//!
//! ## Usage
//!
//! ```
//! use matmul_strategies::{Matrix, multiply_joined, multiply_sequential, verify};
//!
//! let a = Matrix::from_digits(8, "1211553").unwrap();
//! let b = Matrix::from_digits(8, "2426740659").unwrap();
//!
//! let baseline = multiply_sequential(&a, &b);
//! let joined = multiply_joined(&a, &b, 4).unwrap();
//!
//! assert!(verify(&joined, &baseline).is_identical());
//! ```
//!
//! Detached workers report through a channel and expose a handle to wait on:
//!
//! ```
//! use std::sync::Arc;
//! use matmul_strategies::{Matrix, Operands, multiply_sequential, spawn_detached};
//!
//! let a = Arc::new(Matrix::from_digits(8, "42").unwrap());
//! let b = Arc::new(Matrix::from_digits(8, "7").unwrap());
//! let baseline = Arc::new(multiply_sequential(&a, &b));
//!
//! let (tx, rx) = crossbeam_channel::unbounded();
//! let handle = spawn_detached(&Operands::new(a, b, baseline.clone()), 4, &tx).unwrap();
//!
//! handle.wait();
//! assert_eq!(handle.result().as_ref(), Some(&*baseline));
//! drop(tx);
//! assert_eq!(rx.iter().count(), 4);
//! ```

pub mod config;
pub mod error;
pub mod matrix;
pub mod process;
pub mod threaded;
pub mod timing;

pub use config::BenchConfig;
pub use error::{Error, Result};
pub use matrix::dense::{Element, Matrix};
pub use matrix::naive_ijk::multiply_sequential;
pub use matrix::partition::{RowRange, partition, row_range};
pub use matrix::seed::seeded_inputs;
pub use matrix::slots::RowSlots;
pub use matrix::store::MatrixStore;
pub use matrix::verify::{Verdict, identical, verify};
pub use process::ProcessPool;
pub use threaded::{
    DetachedHandle, Operands, Reporter, Role, WorkerReport, multiply_joined, multiply_mixed,
    spawn_detached,
};
