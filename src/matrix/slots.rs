//! Write-once result storage for workers that may outlive their pool call.

use std::sync::OnceLock;

use super::dense::{Element, Matrix};
use super::partition::{RowRange, partition};

/// One write-once slot per worker, each holding the cells of that worker's
/// [`RowRange`].
///
/// Detached workers cannot borrow a `&mut` slice of a matrix owned by
/// someone else, so each publishes its finished rows here exactly once.
/// Readers can look at any time; a slot that is still empty just means its
/// worker has not finished.
#[derive(Debug)]
pub struct RowSlots {
    n: usize,
    ranges: Vec<RowRange>,
    slots: Vec<OnceLock<Vec<Element>>>,
}

impl RowSlots {
    pub fn new(n: usize, workers: usize) -> Self {
        let ranges = partition(n, workers);
        let slots = ranges.iter().map(|_| OnceLock::new()).collect();
        Self { n, ranges, slots }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn workers(&self) -> usize {
        self.ranges.len()
    }

    pub fn range(&self, worker: usize) -> RowRange {
        self.ranges[worker]
    }

    /// Publishes `worker`'s rows. Returns `false` (and drops `cells`) if the
    /// slot was already filled or `cells` has the wrong length.
    pub fn fill(&self, worker: usize, cells: Vec<Element>) -> bool {
        if cells.len() != self.ranges[worker].len() * self.n {
            return false;
        }
        self.slots[worker].set(cells).is_ok()
    }

    pub fn rows(&self, worker: usize) -> Option<&[Element]> {
        self.slots[worker].get().map(Vec::as_slice)
    }

    /// Number of workers that have published.
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == self.slots.len()
    }

    /// Assembled matrix, only once every worker has published.
    pub fn to_matrix(&self) -> Option<Matrix> {
        if !self.is_complete() {
            return None;
        }
        Some(self.snapshot())
    }

    /// Current contents, with zeros for rows nobody has published yet.
    pub fn snapshot(&self) -> Matrix {
        let mut m = Matrix::zeros(self.n);
        for (range, slot) in self.ranges.iter().zip(&self.slots) {
            if let Some(cells) = slot.get() {
                m.rows_mut(*range).copy_from_slice(cells);
            }
        }
        m
    }
}
