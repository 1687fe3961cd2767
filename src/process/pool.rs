use std::borrow::Cow;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use super::frame::{FrameError, ResultFrame, TaskFrame, read_frame, write_frame};
use crate::error::{Error, Result};
use crate::matrix::dense::{Element, Matrix};
use crate::matrix::partition::{RowRange, partition};

/// Subcommand the driver binary answers as a process worker.
pub const WORKER_SUBCOMMAND: &str = "worker";

/// Multiplies by handing each row range to a separate OS process.
///
/// Each worker is a fresh process with its own memory. Its stdin and stdout
/// pipes are created as part of spawning it; the parent sends the task on
/// stdin and reads the result frame from stdout.
#[derive(Clone, Debug)]
pub struct ProcessPool {
    program: PathBuf,
    args: Vec<OsString>,
    workers: usize,
}

impl ProcessPool {
    /// Pool that re-runs the current executable as its workers.
    pub fn new(workers: usize) -> Result<Self> {
        Ok(Self::with_program(std::env::current_exe()?, workers))
    }

    /// Pool that runs `program worker` for each worker.
    pub fn with_program(program: impl Into<PathBuf>, workers: usize) -> Self {
        Self {
            program: program.into(),
            args: vec![WORKER_SUBCOMMAND.into()],
            workers,
        }
    }

    /// Replaces the arguments passed to the worker program.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Computes `A × B`.
    ///
    /// All workers are spawned before any result is read. Results are then
    /// collected in spawn order: each worker's frame is read in full before
    /// waiting on its exit, so a worker is never blocked on a full pipe
    /// while the parent waits for it.
    ///
    /// A spawn failure aborts the whole run before it starts computing;
    /// workers already started are killed. A short or malformed result
    /// fails with [`Error::IncompleteResult`] or [`Error::MalformedFrame`].
    ///
    /// # Panics
    ///
    /// Panics if A and B differ in size, or the pool has zero workers.
    pub fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        assert_eq!(a.size(), b.size(), "A and B must have the same size");

        let n = a.size();
        let ranges = partition(n, self.workers);

        let mut children = Vec::with_capacity(ranges.len());
        for (worker, range) in ranges.iter().enumerate() {
            match self.spawn_worker(worker, *range, a, b) {
                Ok(child) => children.push(child),
                Err(e) => {
                    abort(children);
                    return Err(e);
                }
            }
        }

        let mut c = Matrix::zeros(n);
        let mut first_error = None;

        for (worker, (mut child, range)) in children.into_iter().zip(ranges).enumerate() {
            let collected = collect(worker, &mut child, range, n);
            let status = child.wait().map_err(|source| Error::Channel { worker, source });

            let outcome = collected.and_then(|cells| match status? {
                s if s.success() => Ok(cells),
                status => Err(Error::WorkerExit { worker, status }),
            });

            match outcome {
                Ok(cells) => {
                    c.rows_mut(range).copy_from_slice(&cells);
                    debug!(worker, %range, "collected process worker");
                }
                Err(e) => {
                    warn!(worker, error = %e, "process worker failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(c),
        }
    }

    fn spawn_worker(&self, worker: usize, range: RowRange, a: &Matrix, b: &Matrix) -> Result<Child> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::Spawn { worker, source })?;

        debug!(worker, %range, pid = child.id(), "spawned process worker");

        let task = TaskFrame {
            worker,
            range,
            a: Cow::Borrowed(a),
            b: Cow::Borrowed(b),
        };

        // Dropping stdin after the task closes the worker's input.
        let sent = match child.stdin.take() {
            Some(mut stdin) => write_frame(&mut stdin, &task).map_err(|e| match e {
                FrameError::Io(source) => Error::Spawn { worker, source },
                other => Error::Frame(other),
            }),
            None => Err(Error::Spawn {
                worker,
                source: std::io::Error::other("worker stdin was not piped"),
            }),
        };

        match sent {
            Ok(()) => Ok(child),
            Err(e) => {
                abort(vec![child]);
                Err(e)
            }
        }
    }
}

fn collect(worker: usize, child: &mut Child, range: RowRange, n: usize) -> Result<Vec<Element>> {
    let mut stdout = child.stdout.take().ok_or_else(|| Error::Channel {
        worker,
        source: std::io::Error::other("worker stdout was not piped"),
    })?;

    let frame: ResultFrame = read_frame(&mut stdout).map_err(|e| match e {
        FrameError::Truncated { expected, received } => Error::IncompleteResult {
            worker,
            expected,
            received,
        },
        FrameError::Io(source) => Error::Channel { worker, source },
        other => Error::MalformedFrame {
            worker,
            reason: other.to_string(),
        },
    })?;

    if frame.worker != worker || frame.range != range {
        return Err(Error::MalformedFrame {
            worker,
            reason: format!(
                "expected worker {} rows {}, got worker {} rows {}",
                worker, range, frame.worker, frame.range
            ),
        });
    }
    if frame.cells.len() != range.len() * n {
        return Err(Error::MalformedFrame {
            worker,
            reason: format!(
                "expected {} cells, got {}",
                range.len() * n,
                frame.cells.len()
            ),
        });
    }

    Ok(frame.cells)
}

fn abort(children: Vec<Child>) {
    for mut child in children {
        let _ = child.kill();
        let _ = child.wait();
    }
}
