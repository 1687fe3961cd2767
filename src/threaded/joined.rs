use std::thread;

use tracing::debug;

use crate::error::{Error, Result};
use crate::matrix::dense::Matrix;
use crate::matrix::naive_ijk::matmul_rows;
use crate::matrix::partition::partition;

/// Multi-threaded product with every worker joined.
///
/// The output is split into one disjoint `&mut` chunk per row range before
/// any thread starts, and each thread gets its own chunk and worker index by
/// move. Threads are joined in spawn order; nothing is returned until the
/// last one has.
///
/// # Arguments
///
/// * `workers` - Thread count, at most `a.size()`
pub fn multiply_joined(a: &Matrix, b: &Matrix, workers: usize) -> Result<Matrix> {
    assert_eq!(a.size(), b.size(), "A and B must have the same size");

    let n = a.size();
    let ranges = partition(n, workers);
    let mut c = Matrix::zeros(n);
    let mut rest = c.as_mut_slice();

    thread::scope(|s| -> Result<()> {
        let mut handles = Vec::with_capacity(ranges.len());

        for (worker, range) in ranges.iter().copied().enumerate() {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * n);
            rest = tail;

            let handle = thread::Builder::new()
                .name(format!("joined-{}", worker))
                .spawn_scoped(s, move || {
                    matmul_rows(a.as_slice(), b.as_slice(), chunk, n, range);
                })
                .map_err(|source| Error::ThreadSpawn { worker, source })?;
            handles.push((worker, handle));
        }

        for (worker, handle) in handles {
            handle.join().map_err(|_| Error::WorkerPanicked(worker))?;
            debug!(worker, "joined thread worker");
        }
        Ok(())
    })?;

    Ok(c)
}
