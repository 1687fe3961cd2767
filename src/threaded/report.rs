//! Per-worker completion reports and the single consumer that prints them.

use std::fmt;
use std::io::Write;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use tracing::{debug, warn};

use crate::error::Result;
use crate::matrix::verify::Verdict;

/// Whether a worker's spawner waits for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Detached,
    Joined,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Detached => f.write_str("detached"),
            Role::Joined => f.write_str("join"),
        }
    }
}

/// What a self-checking worker sends once its rows are done.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkerReport {
    pub strategy: &'static str,
    pub worker: usize,
    pub role: Role,
    pub elapsed: Duration,
    pub verdict: Verdict,
}

impl fmt::Display for WorkerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] From {} thread No. {}, ",
            self.strategy, self.role, self.worker
        )?;
        match self.verdict {
            Verdict::Identical => write!(
                f,
                "the required work was completed successfully within {:.6} seconds",
                self.elapsed.as_secs_f64()
            ),
            Verdict::Divergent => write!(
                f,
                "the result is {} ({:.6} seconds)",
                self.verdict,
                self.elapsed.as_secs_f64()
            ),
        }
    }
}

/// Serializes worker reports onto one sink.
///
/// Workers only ever send on the channel; a dedicated consumer thread
/// writes one whole line per report, in arrival order.
pub struct Reporter {
    sender: Sender<WorkerReport>,
    consumer: JoinHandle<usize>,
}

impl Reporter {
    pub fn spawn<W>(mut sink: W) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        let (sender, receiver): (Sender<WorkerReport>, Receiver<WorkerReport>) = unbounded();

        let consumer = thread::Builder::new()
            .name("report-consumer".into())
            .spawn(move || {
                let mut written = 0;
                for report in receiver {
                    if let Err(e) = writeln!(sink, "{}", report).and_then(|_| sink.flush()) {
                        warn!(error = %e, "failed to write worker report");
                        continue;
                    }
                    written += 1;
                }
                debug!(written, "report channel closed");
                written
            })?;

        Ok(Self { sender, consumer })
    }

    /// A sender for workers to report on.
    pub fn sender(&self) -> Sender<WorkerReport> {
        self.sender.clone()
    }

    /// Closes this end of the channel and waits for the consumer to drain
    /// it. Blocks while any worker still holds a sender. Returns the number
    /// of reports written.
    pub fn finish(self) -> usize {
        drop(self.sender);
        self.consumer.join().unwrap_or_else(|_| {
            warn!("report consumer panicked");
            0
        })
    }
}
