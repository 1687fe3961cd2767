use crate::error::{Error, Result};

pub const MATRIX_SIZE: usize = 100;
pub const NUM_PROCESSES: usize = 4;
pub const NUM_THREADS: usize = 4;

/// Sizes fixed for one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    pub size: usize,
    pub processes: usize,
    pub threads: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: MATRIX_SIZE,
            processes: NUM_PROCESSES,
            threads: NUM_THREADS,
        }
    }
}

impl BenchConfig {
    /// Every worker count must leave at least one row per worker.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfig("matrix size must be positive".into()));
        }
        for (name, count) in [("processes", self.processes), ("threads", self.threads)] {
            if count == 0 || count > self.size {
                return Err(Error::InvalidConfig(format!(
                    "{} must be between 1 and the matrix size {}, got {}",
                    name, self.size, count
                )));
            }
        }
        Ok(())
    }

    /// Whether both worker counts divide the rows evenly.
    pub fn is_balanced(&self) -> bool {
        self.size % self.processes == 0 && self.size % self.threads == 0
    }
}
