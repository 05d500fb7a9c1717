//! The column reader contract and its implementations.

use framecol_common::{Result, error::Error};
use framecol_format::Frame;
use framecol_vector::{ColumnVector, Value};

pub mod complex;
pub mod numeric;
pub mod string;
pub mod unsupported;

pub use complex::ComplexColumnReader;
pub use numeric::{DoubleColumnReader, FloatColumnReader, LongColumnReader, NumericColumnReader};
pub use string::StringColumnReader;
pub use unsupported::UnsupportedColumnReader;

/// Decodes one column of a columnar frame.
///
/// A reader is bound to a column position and type, not to a particular frame: the
/// frame is passed to every call, so one reader serves all frames sharing the same
/// column signature. Readers hold no per-frame state and are safe to share across
/// threads.
pub trait ColumnReader: Send + Sync {
    /// Number of rows in the column, after checking that the column region is
    /// consistent with the reader's type.
    fn row_count(&self, frame: &Frame) -> Result<usize>;

    /// Returns `true` if `row` is a valid row position in the column.
    fn has_row(&self, frame: &Frame, row: usize) -> Result<bool> {
        Ok(row < self.row_count(frame)?)
    }

    /// Decodes the value at `row`. Nulls are returned as [`Value::Null`].
    fn read_value(&self, frame: &Frame, row: usize) -> Result<Value>;

    /// Decodes up to `count` values starting at row `start` into `dest`.
    ///
    /// `dest` is cleared first and then holds exactly the returned number of values,
    /// `min(count, row_count - start)`. `start == row_count` yields an empty batch.
    ///
    /// Fails with `InvalidArgument` before touching `dest` when its variant does not
    /// match the reader. A malformed value discovered mid-batch leaves the values
    /// decoded so far in `dest`.
    fn read_batch(
        &self,
        frame: &Frame,
        start: usize,
        count: usize,
        dest: &mut ColumnVector,
    ) -> Result<usize>;

    /// Name of the logical type the reader decodes, e.g. `LONG` or `ARRAY<STRING>`.
    fn value_type_name(&self) -> String;
}

/// A reader bound by [`FrameColumnReaders`](crate::FrameColumnReaders).
///
/// The set of variants is closed; matching on it is exhaustive, so adding a decoder
/// forces every dispatch site to handle it.
#[derive(Debug, Clone)]
pub enum FrameColumnReader {
    Long(LongColumnReader),
    Float(FloatColumnReader),
    Double(DoubleColumnReader),
    /// Scalar `STRING` columns and `ARRAY<STRING>` columns.
    String(StringColumnReader),
    Complex(ComplexColumnReader),
    /// Columns whose type has no decoder. Every read fails.
    Unsupported(UnsupportedColumnReader),
}

impl FrameColumnReader {
    /// Returns `false` for the [`Unsupported`](FrameColumnReader::Unsupported) reader.
    pub fn is_supported(&self) -> bool {
        !matches!(self, FrameColumnReader::Unsupported(_))
    }

    /// Creates an empty batch destination accepted by this reader, `None` for the
    /// unsupported reader.
    pub fn new_vector(&self) -> Option<ColumnVector> {
        use framecol_vector::{
            complex_vector::ComplexVector,
            numeric_vector::NumericVector,
            string_vector::StringArrayVector,
        };

        match self {
            FrameColumnReader::Long(_) => Some(ColumnVector::Long(NumericVector::new())),
            FrameColumnReader::Float(_) => Some(ColumnVector::Float(NumericVector::new())),
            FrameColumnReader::Double(_) => Some(ColumnVector::Double(NumericVector::new())),
            FrameColumnReader::String(r) if r.is_array() => {
                Some(ColumnVector::StringArray(StringArrayVector::new()))
            }
            FrameColumnReader::String(_) => {
                Some(ColumnVector::StringArray(StringArrayVector::with_scalar_rows()))
            }
            FrameColumnReader::Complex(_) => Some(ColumnVector::Complex(ComplexVector::new())),
            FrameColumnReader::Unsupported(_) => None,
        }
    }

    fn as_dyn(&self) -> &dyn ColumnReader {
        match self {
            FrameColumnReader::Long(r) => r,
            FrameColumnReader::Float(r) => r,
            FrameColumnReader::Double(r) => r,
            FrameColumnReader::String(r) => r,
            FrameColumnReader::Complex(r) => r,
            FrameColumnReader::Unsupported(r) => r,
        }
    }
}

impl ColumnReader for FrameColumnReader {
    fn row_count(&self, frame: &Frame) -> Result<usize> {
        self.as_dyn().row_count(frame)
    }

    fn has_row(&self, frame: &Frame, row: usize) -> Result<bool> {
        self.as_dyn().has_row(frame, row)
    }

    fn read_value(&self, frame: &Frame, row: usize) -> Result<Value> {
        self.as_dyn().read_value(frame, row)
    }

    fn read_batch(
        &self,
        frame: &Frame,
        start: usize,
        count: usize,
        dest: &mut ColumnVector,
    ) -> Result<usize> {
        self.as_dyn().read_batch(frame, start, count, dest)
    }

    fn value_type_name(&self) -> String {
        self.as_dyn().value_type_name()
    }
}

/// Verifies that `row` addresses a row of the column.
#[inline]
pub(crate) fn check_row(column: usize, row: usize, row_count: usize) -> Result<()> {
    if row < row_count {
        Ok(())
    } else {
        Err(Error::row_out_of_range(column, row, row_count))
    }
}

/// Returns the number of rows a batch read starting at `start` produces.
#[inline]
pub(crate) fn batch_len(column: usize, start: usize, count: usize, row_count: usize) -> Result<usize> {
    if start > row_count {
        return Err(Error::row_out_of_range(column, start, row_count));
    }
    Ok(count.min(row_count - start))
}

#[cold]
pub(crate) fn dest_mismatch(reader_type: &str, dest: &ColumnVector) -> Error {
    Error::invalid_arg(
        "dest",
        format!(
            "a {} vector cannot receive values of a {reader_type} column",
            dest.kind_name()
        ),
    )
}

/// Region-level error for column `ordinal`.
#[cold]
pub(crate) fn malformed_column(ordinal: usize, message: impl Into<String>) -> Error {
    Error::malformed(format!("column #{ordinal}"), message)
}
