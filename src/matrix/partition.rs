use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Half-open range of output rows `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "row range {}..{} is reversed", start, end);
        Self { start, end }
    }

    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, row: usize) -> bool {
        self.start <= row && row < self.end
    }

    pub fn overlaps(&self, other: &RowRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Cell offsets of the range in a row-major `n`-wide matrix.
    pub fn cells(&self, n: usize) -> Range<usize> {
        self.start * n..self.end * n
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Rows assigned to `worker` out of `workers` over an `n`-row matrix.
///
/// Every worker gets `n / workers` rows; the last one also absorbs the
/// remainder, so its range always ends at `n`.
///
/// # Panics
///
/// Panics if `workers` is zero or `worker >= workers`.
pub fn row_range(worker: usize, workers: usize, n: usize) -> RowRange {
    assert!(workers > 0, "worker count must be positive");
    assert!(worker < workers, "worker {} out of {}", worker, workers);

    let rows_per_worker = n / workers;
    let start = worker * rows_per_worker;
    let end = if worker == workers - 1 {
        n
    } else {
        start + rows_per_worker
    };

    RowRange::new(start, end)
}

/// Splits `n` rows into `workers` contiguous, disjoint ranges covering `[0, n)`.
///
/// # Panics
///
/// Panics if `workers` is zero.
pub fn partition(n: usize, workers: usize) -> Vec<RowRange> {
    assert!(workers > 0, "worker count must be positive");
    (0..workers).map(|w| row_range(w, workers, n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split() {
        let ranges = partition(100, 4);
        assert_eq!(
            ranges,
            vec![
                RowRange::new(0, 25),
                RowRange::new(25, 50),
                RowRange::new(50, 75),
                RowRange::new(75, 100),
            ]
        );
    }

    #[test]
    fn last_worker_absorbs_remainder() {
        let lens: Vec<usize> = partition(10, 4).iter().map(RowRange::len).collect();
        assert_eq!(lens, vec![2, 2, 2, 4]);
    }

    #[test]
    fn ranges_cover_exactly_once() {
        for n in 1..=40 {
            for workers in 1..=n {
                let ranges = partition(n, workers);
                assert_eq!(ranges.len(), workers);

                let mut hits = vec![0u32; n];
                for range in &ranges {
                    for row in range.start..range.end {
                        hits[row] += 1;
                    }
                }
                assert!(hits.iter().all(|&h| h == 1), "n={} workers={}", n, workers);

                let last = ranges[workers - 1];
                assert_eq!(last.len(), n - (workers - 1) * (n / workers));
                assert_eq!(last.end, n);
            }
        }
    }

    #[test]
    fn distinct_workers_never_overlap() {
        let ranges = partition(37, 6);
        for (i, a) in ranges.iter().enumerate() {
            for b in &ranges[i + 1..] {
                assert!(!a.overlaps(b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    #[should_panic(expected = "worker count must be positive")]
    fn zero_workers_panics() {
        partition(4, 0);
    }

    #[test]
    fn cell_offsets() {
        let range = RowRange::new(2, 4);
        assert_eq!(range.cells(5), 10..20);
        assert!(range.contains(3));
        assert!(!range.contains(4));
    }
}
