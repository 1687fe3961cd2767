//! Dense square integer matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::partition::RowRange;
use crate::error::{Error, Result};

/// Cell type of every matrix in a run.
pub type Element = i64;

/// `n × n` matrix stored row-major in one contiguous buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    n: usize,
    data: Vec<Element>,
}

/// Wire shape of [`Matrix`] before the cell count is checked.
#[derive(Deserialize)]
struct RawMatrix {
    n: usize,
    data: Vec<Element>,
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = String;

    fn try_from(raw: RawMatrix) -> std::result::Result<Self, Self::Error> {
        match raw.n.checked_mul(raw.n) {
            Some(cells) if cells == raw.data.len() => Ok(Self {
                n: raw.n,
                data: raw.data,
            }),
            _ => Err(format!(
                "{}x{} matrix with {} cells",
                raw.n,
                raw.n,
                raw.data.len()
            )),
        }
    }
}

impl Matrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0; n * n],
        }
    }

    /// Builds a matrix from nested rows.
    ///
    /// Fails with [`Error::NotSquare`] unless every row has exactly
    /// `rows.len()` columns.
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != n {
                return Err(Error::NotSquare {
                    rows: n,
                    row,
                    cols: cells.len(),
                });
            }
            data.extend(cells);
        }
        Ok(Self { n, data })
    }

    /// Fills the matrix row-major by cycling over the decimal digits of
    /// `digits`, one digit per cell.
    ///
    /// ```
    /// use matmul_strategies::Matrix;
    ///
    /// let m = Matrix::from_digits(2, "123").unwrap();
    /// assert_eq!(m.as_slice(), &[1, 2, 3, 1]);
    /// ```
    pub fn from_digits(n: usize, digits: &str) -> Result<Self> {
        let values = digits
            .chars()
            .map(|c| c.to_digit(10).map(Element::from))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::InvalidSeed {
                seed: digits.to_string(),
                reason: "seed must contain decimal digits only",
            })?;

        if values.is_empty() {
            return Err(Error::InvalidSeed {
                seed: digits.to_string(),
                reason: "seed is empty",
            });
        }

        let data = values.iter().copied().cycle().take(n * n).collect();
        Ok(Self { n, data })
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> Element {
        self.data[row * self.n + col]
    }

    /// Cells of `range`, row-major.
    pub fn rows(&self, range: RowRange) -> &[Element] {
        &self.data[range.cells(self.n)]
    }

    pub fn rows_mut(&mut self, range: RowRange) -> &mut [Element] {
        let cells = range.cells(self.n);
        &mut self.data[cells]
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.data
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.n.max(1)) {
            let mut first = true;
            for cell in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell)?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
