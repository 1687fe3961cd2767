use super::dense::{Element, Matrix};
use super::partition::RowRange;

/// Textbook i-j-k product of the rows in `rows`.
///
/// Every worker strategy runs this same kernel over its own range, so the
/// only difference between strategies is how ranges are dispatched and how
/// results travel back.
///
/// # Arguments
///
/// * `a` - Matrix A (n × n), row-major
/// * `b` - Matrix B (n × n), row-major
/// * `c` - Output cells for `rows` only (`rows.len() × n`), overwritten
/// * `n` - Side length
/// * `rows` - Rows of A (and of the full product) to compute
///
/// # Panics
///
/// Panics if `c` is not exactly `rows.len() * n` cells long.
pub fn matmul_rows(a: &[Element], b: &[Element], c: &mut [Element], n: usize, rows: RowRange) {
    assert_eq!(
        c.len(),
        rows.len() * n,
        "C: expected {}x{}={} cells",
        rows.len(),
        n,
        rows.len() * n
    );

    for (local, i) in (rows.start..rows.end).enumerate() {
        for j in 0..n {
            let mut sum = 0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[local * n + j] = sum;
        }
    }
}

/// Computes `rows` of `A × B` into a fresh buffer.
pub fn multiply_range(a: &Matrix, b: &Matrix, rows: RowRange) -> Vec<Element> {
    let n = a.size();
    let mut cells = vec![0; rows.len() * n];
    matmul_rows(a.as_slice(), b.as_slice(), &mut cells, n, rows);
    cells
}

/// Full product in the calling thread. This is the baseline every other
/// strategy is checked against.
///
/// # Panics
///
/// Panics if A and B differ in size.
pub fn multiply_sequential(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.size(), b.size(), "A and B must have the same size");

    let n = a.size();
    let mut c = Matrix::zeros(n);
    matmul_rows(
        a.as_slice(),
        b.as_slice(),
        c.as_mut_slice(),
        n,
        RowRange::new(0, n),
    );
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sixteen() -> Matrix {
        Matrix::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![5, 6, 7, 8],
            vec![9, 10, 11, 12],
            vec![13, 14, 15, 16],
        ])
        .unwrap()
    }

    #[test]
    fn four_by_four_product() {
        let m = sixteen();
        let c = multiply_sequential(&m, &m);
        assert_eq!(c.get(0, 0), 90);
        assert_eq!(
            c.as_slice(),
            &[
                90, 100, 110, 120, 202, 228, 254, 280, 314, 356, 398, 440, 426, 484, 542, 600
            ]
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let a = Matrix::from_digits(9, "1211553").unwrap();
        let b = Matrix::from_digits(9, "2426840659").unwrap();
        assert_eq!(multiply_sequential(&a, &b), multiply_sequential(&a, &b));
    }

    #[test]
    fn range_matches_full_product() {
        let a = Matrix::from_digits(7, "31415").unwrap();
        let b = Matrix::from_digits(7, "2718").unwrap();
        let full = multiply_sequential(&a, &b);
        let range = RowRange::new(2, 5);
        assert_eq!(multiply_range(&a, &b, range), full.rows(range));
    }

    #[test]
    fn output_is_overwritten_not_accumulated() {
        let m = sixteen();
        let mut c = vec![1_000; 4];
        matmul_rows(m.as_slice(), m.as_slice(), &mut c, 4, RowRange::new(0, 1));
        assert_eq!(c, vec![90, 100, 110, 120]);
    }
}
