//! Reader bound to columns whose type has no decoder.

use framecol_common::{Result, error::Error};
use framecol_format::{ColumnType, Frame};
use framecol_vector::{ColumnVector, Value};

use super::ColumnReader;

/// Stands in for a column of an unsupported type.
///
/// Binding always succeeds; every read fails with `UnsupportedColumnType` naming
/// the column and its declared type. The frame and the destination vector are
/// never accessed.
#[derive(Debug, Clone)]
pub struct UnsupportedColumnReader {
    column_name: String,
    column_type: ColumnType,
}

impl UnsupportedColumnReader {
    pub fn new(column_name: impl Into<String>, column_type: ColumnType) -> UnsupportedColumnReader {
        UnsupportedColumnReader {
            column_name: column_name.into(),
            column_type,
        }
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// The error reported by every read.
    pub fn error(&self) -> Error {
        Error::unsupported_column_type(&self.column_name, self.column_type.to_string())
    }
}

impl ColumnReader for UnsupportedColumnReader {
    fn row_count(&self, _frame: &Frame) -> Result<usize> {
        Err(self.error())
    }

    fn has_row(&self, _frame: &Frame, _row: usize) -> Result<bool> {
        Err(self.error())
    }

    fn read_value(&self, _frame: &Frame, _row: usize) -> Result<Value> {
        Err(self.error())
    }

    fn read_batch(
        &self,
        _frame: &Frame,
        _start: usize,
        _count: usize,
        _dest: &mut ColumnVector,
    ) -> Result<usize> {
        Err(self.error())
    }

    fn value_type_name(&self) -> String {
        self.column_type.to_string()
    }
}
