use std::io::{Read, Write};

use tracing::debug;

use super::frame::{ResultFrame, TaskFrame, read_frame, write_frame};
use crate::error::{Error, Result};
use crate::matrix::naive_ijk::multiply_range;

/// Worker side of the process strategy: reads one task frame, computes the
/// requested rows and writes one result frame back.
pub fn serve<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<()> {
    let task: TaskFrame<'static> = read_frame(reader)?;
    let n = task.a.size();

    if task.b.size() != n {
        return Err(Error::InvalidConfig(format!(
            "task inputs differ in size: {} and {}",
            n,
            task.b.size()
        )));
    }
    if task.range.end > n || task.range.start > task.range.end {
        return Err(Error::InvalidConfig(format!(
            "row range {} outside {}x{} matrix",
            task.range, n, n
        )));
    }

    debug!(worker = task.worker, range = %task.range, "computing rows");
    let cells = multiply_range(&task.a, &task.b, task.range);

    write_frame(
        writer,
        &ResultFrame {
            worker: task.worker,
            range: task.range,
            cells,
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;
    use crate::matrix::dense::Matrix;
    use crate::matrix::naive_ijk::multiply_sequential;
    use crate::matrix::partition::RowRange;

    fn task_bytes(a: &Matrix, b: &Matrix, range: RowRange) -> Vec<u8> {
        let mut buf = Vec::new();
        let task = TaskFrame {
            worker: 3,
            range,
            a: Cow::Borrowed(a),
            b: Cow::Borrowed(b),
        };
        write_frame(&mut buf, &task).unwrap();
        buf
    }

    #[test]
    fn answers_with_requested_rows() {
        let a = Matrix::from_digits(6, "1211553").unwrap();
        let b = Matrix::from_digits(6, "2426740659").unwrap();
        let range = RowRange::new(3, 6);

        let input = task_bytes(&a, &b, range);
        let mut output = Vec::new();
        serve(&mut input.as_slice(), &mut output).unwrap();

        let result: ResultFrame = read_frame(&mut output.as_slice()).unwrap();
        assert_eq!(result.worker, 3);
        assert_eq!(result.range, range);
        assert_eq!(result.cells, multiply_sequential(&a, &b).rows(range));
    }

    #[test]
    fn rejects_out_of_bounds_range() {
        let a = Matrix::zeros(2);
        let input = task_bytes(&a, &a, RowRange::new(0, 3));
        let mut output = Vec::new();
        assert!(matches!(
            serve(&mut input.as_slice(), &mut output),
            Err(Error::InvalidConfig(_))
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn short_matrix_is_a_frame_error() {
        // Same layout as a task frame, but A claims 3x3 with only two cells.
        let bogus = (
            0usize,
            RowRange::new(0, 1),
            (3usize, vec![1i64, 2]),
            (3usize, vec![0i64; 9]),
        );
        let mut input = Vec::new();
        write_frame(&mut input, &bogus).unwrap();

        let mut output = Vec::new();
        assert!(matches!(
            serve(&mut input.as_slice(), &mut output),
            Err(Error::Frame(_))
        ));
        assert!(output.is_empty());
    }

    #[test]
    fn empty_input_is_a_frame_error() {
        let mut output = Vec::new();
        assert!(matches!(
            serve(&mut &[0u8; 0][..], &mut output),
            Err(Error::Frame(_))
        ));
    }
}
