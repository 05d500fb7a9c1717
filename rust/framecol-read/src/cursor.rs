//! Sequential traversal of a frame column.

use framecol_common::Result;
use framecol_format::Frame;
use framecol_vector::{ColumnVector, Value};

use crate::column_reader::{ColumnReader, FrameColumnReader};

/// A position within one column of one frame.
///
/// The cursor borrows the reader and the frame; the reader itself stays stateless
/// and can back any number of cursors. Iterating the cursor yields the remaining
/// values and stops after the first error.
pub struct ColumnCursor<'a, R: ColumnReader + ?Sized = FrameColumnReader> {
    reader: &'a R,
    frame: &'a Frame,
    row: usize,
    failed: bool,
}

impl<'a, R: ColumnReader + ?Sized> ColumnCursor<'a, R> {
    /// Creates a cursor positioned at the first row.
    pub fn new(reader: &'a R, frame: &'a Frame) -> Self {
        ColumnCursor {
            reader,
            frame,
            row: 0,
            failed: false,
        }
    }

    /// Current row position.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns `true` once the cursor has moved past the last row.
    pub fn is_done(&self) -> Result<bool> {
        Ok(!self.reader.has_row(self.frame, self.row)?)
    }

    /// Moves to the next row.
    #[inline]
    pub fn advance(&mut self) {
        self.row += 1;
    }

    /// Moves back to the first row.
    pub fn reset(&mut self) {
        self.row = 0;
        self.failed = false;
    }

    /// Decodes the value at the current row.
    pub fn get(&self) -> Result<Value> {
        self.reader.read_value(self.frame, self.row)
    }

    /// Decodes up to `max` values from the current row into `dest` and advances past
    /// them. Returns the number of values read, zero at the end of the column.
    pub fn next_batch(&mut self, dest: &mut ColumnVector, max: usize) -> Result<usize> {
        let n = self.reader.read_batch(self.frame, self.row, max, dest)?;
        self.row += n;
        Ok(n)
    }
}

impl<R: ColumnReader + ?Sized> ColumnCursor<'_, R> {
    fn next_value(&mut self) -> Result<Option<Value>> {
        if self.is_done()? {
            return Ok(None);
        }
        let value = self.get()?;
        self.advance();
        Ok(Some(value))
    }
}

impl<R: ColumnReader + ?Sized> Iterator for ColumnCursor<'_, R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_value() {
            Ok(value) => value.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use framecol_format::ColumnType;
    use framecol_testkit::FrameBuilder;
    use framecol_vector::numeric_vector::NumericVector;

    use super::*;
    use crate::create;

    #[test]
    fn test_cursor_walks_column() {
        let frame = FrameBuilder::new()
            .add_long(&[Some(10), None, Some(30)])
            .build();
        let reader = create("n", 0, &ColumnType::LONG);
        let mut cursor = ColumnCursor::new(&reader, &frame);

        let mut seen = Vec::new();
        while !cursor.is_done().unwrap() {
            seen.push(cursor.get().unwrap());
            cursor.advance();
        }
        assert_eq!(seen, vec![Value::Long(10), Value::Null, Value::Long(30)]);
        assert_eq!(cursor.row(), 3);

        cursor.reset();
        assert_eq!(cursor.get().unwrap(), Value::Long(10));
        assert_eq!(cursor.map(|v| v.unwrap()).count(), 3);
    }

    #[test]
    fn test_next_batch_advances() {
        let data = (0..10i64).map(|v| Some(v * 2)).collect::<Vec<_>>();
        let frame = FrameBuilder::new().add_long(&data).build();
        let reader = create("n", 0, &ColumnType::LONG);
        let mut cursor = ColumnCursor::new(&reader, &frame);
        let mut dest = ColumnVector::Long(NumericVector::new());

        let mut sizes = Vec::new();
        loop {
            let n = cursor.next_batch(&mut dest, 4).unwrap();
            if n == 0 {
                break;
            }
            assert_eq!(dest.value_at(0), Value::Long((cursor.row() - n) as i64 * 2));
            sizes.push(n);
        }
        assert_eq!(sizes, vec![4, 4, 2]);
        assert!(cursor.is_done().unwrap());
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let frame = FrameBuilder::new().add_long(&[Some(1)]).build();
        let reader = create("g", 0, &ColumnType::unknown("GEOMETRY"));
        let mut cursor = ColumnCursor::new(&reader, &frame);
        assert!(cursor.next().unwrap().unwrap_err().is_unsupported_column_type());
        assert!(cursor.next().is_none());
    }
}
