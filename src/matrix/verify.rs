use std::fmt;

use super::dense::{Element, Matrix};
use super::partition::RowRange;

/// Outcome of comparing a result with the sequential baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Identical,
    Divergent,
}

impl Verdict {
    pub fn is_identical(self) -> bool {
        self == Verdict::Identical
    }
}

impl From<bool> for Verdict {
    fn from(identical: bool) -> Self {
        if identical {
            Verdict::Identical
        } else {
            Verdict::Divergent
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Identical => f.write_str("identical to the sequential baseline"),
            Verdict::Divergent => f.write_str("not identical to the sequential baseline"),
        }
    }
}

/// Exact cell-wise equality.
pub fn identical(a: &Matrix, b: &Matrix) -> bool {
    a.size() == b.size() && a.as_slice() == b.as_slice()
}

pub fn verify(result: &Matrix, baseline: &Matrix) -> Verdict {
    identical(result, baseline).into()
}

/// Compares the cells a worker produced for `range` against the same rows
/// of the baseline.
pub fn verify_rows(rows: &[Element], baseline: &Matrix, range: RowRange) -> Verdict {
    (rows == baseline.rows(range)).into()
}

/// First `(row, col)` where the matrices differ, if any.
pub fn first_divergence(a: &Matrix, b: &Matrix) -> Option<(usize, usize)> {
    let n = a.size().min(b.size()).max(1);
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .position(|(x, y)| x != y)
        .map(|idx| (idx / n, idx % n))
}
