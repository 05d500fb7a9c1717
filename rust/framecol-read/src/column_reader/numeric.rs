//! Readers for fixed-width numeric columns (`LONG`, `FLOAT`, `DOUBLE`).

use std::marker::PhantomData;

use framecol_bytes::le;
use framecol_common::Result;
use framecol_format::{
    Frame,
    layout::{ColumnTypeCode, NOT_NULL_ROW, NUMERIC_DATA_OFFSET},
};
use framecol_vector::{
    ColumnVector, Value,
    numeric_vector::{NumericElement, NumericVector},
};
use num_traits::{FromBytes, ToBytes};

use super::{ColumnReader, batch_len, check_row, dest_mismatch, malformed_column};

/// A numeric type stored in frame columns.
pub trait FrameNumeric:
    NumericElement + FromBytes<Bytes: Sized> + ToBytes<Bytes = <Self as FromBytes>::Bytes>
{
    /// Type code of columns holding this type.
    const TYPE_CODE: ColumnTypeCode;

    /// Logical type name.
    const TYPE_NAME: &'static str;

    /// Decodes a value from the first `size_of::<Self>()` bytes of `src`.
    #[inline]
    fn read_le(src: &[u8]) -> Self {
        let mut bytes = Self::default().to_le_bytes();
        let buf = bytes.as_mut();
        let width = buf.len();
        buf.copy_from_slice(&src[..width]);
        <Self as FromBytes>::from_le_bytes(&bytes)
    }

    /// Returns the matching variant of `dest`.
    fn vector_mut(dest: &mut ColumnVector) -> Option<&mut NumericVector<Self>>;
}

macro_rules! impl_frame_numeric {
    ($t:ty, $code:ident, $name:literal, $variant:ident) => {
        impl FrameNumeric for $t {
            const TYPE_CODE: ColumnTypeCode = ColumnTypeCode::$code;
            const TYPE_NAME: &'static str = $name;

            #[inline]
            fn vector_mut(dest: &mut ColumnVector) -> Option<&mut NumericVector<Self>> {
                match dest {
                    ColumnVector::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_frame_numeric!(i64, Long, "LONG", Long);
impl_frame_numeric!(f32, Float, "FLOAT", Float);
impl_frame_numeric!(f64, Double, "DOUBLE", Double);

/// Reader of a numeric column holding values of type `T`.
///
/// Each row occupies a fixed-width cell, so positional reads are O(1). When the
/// column carries no null indicators, batch reads reinterpret the value bytes in
/// place instead of decoding cell by cell.
pub struct NumericColumnReader<T> {
    ordinal: usize,
    _p: PhantomData<fn() -> T>,
}

pub type LongColumnReader = NumericColumnReader<i64>;
pub type FloatColumnReader = NumericColumnReader<f32>;
pub type DoubleColumnReader = NumericColumnReader<f64>;

impl<T: FrameNumeric> NumericColumnReader<T> {
    pub fn new(ordinal: usize) -> NumericColumnReader<T> {
        NumericColumnReader {
            ordinal,
            _p: PhantomData,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn layout<'f>(&self, frame: &'f Frame) -> Result<NumericLayout<'f>> {
        let region = frame.region(self.ordinal)?;
        let code = le::read_u8(region, 0)
            .ok_or_else(|| malformed_column(self.ordinal, "empty numeric column region"))?;
        if code != T::TYPE_CODE.as_u8() {
            return Err(malformed_column(
                self.ordinal,
                format!(
                    "expected {} column type code {}, found {code}",
                    T::TYPE_NAME,
                    T::TYPE_CODE.as_u8()
                ),
            ));
        }
        let has_nulls = le::read_u8(region, 1)
            .ok_or_else(|| malformed_column(self.ordinal, "truncated numeric column header"))?
            != 0;

        let row_count = frame.row_count();
        let cell_width = std::mem::size_of::<T>() + has_nulls as usize;
        let expected_len = row_count
            .checked_mul(cell_width)
            .and_then(|len| len.checked_add(NUMERIC_DATA_OFFSET));
        if expected_len != Some(region.len()) {
            return Err(malformed_column(
                self.ordinal,
                format!(
                    "{} region of {} bytes does not hold {row_count} cells of {cell_width} bytes",
                    T::TYPE_NAME,
                    region.len()
                ),
            ));
        }

        Ok(NumericLayout {
            cells: &region[NUMERIC_DATA_OFFSET..],
            has_nulls,
            cell_width,
            row_count,
        })
    }
}

impl<T: FrameNumeric> ColumnReader for NumericColumnReader<T> {
    fn row_count(&self, frame: &Frame) -> Result<usize> {
        Ok(self.layout(frame)?.row_count)
    }

    fn read_value(&self, frame: &Frame, row: usize) -> Result<Value> {
        let layout = self.layout(frame)?;
        check_row(self.ordinal, row, layout.row_count)?;
        Ok(layout.get::<T>(row).map_or(Value::Null, T::into_value))
    }

    fn read_batch(
        &self,
        frame: &Frame,
        start: usize,
        count: usize,
        dest: &mut ColumnVector,
    ) -> Result<usize> {
        let Some(dest) = T::vector_mut(dest) else {
            return Err(dest_mismatch(T::TYPE_NAME, dest));
        };
        let layout = self.layout(frame)?;
        let len = batch_len(self.ordinal, start, count, layout.row_count)?;
        dest.clear();

        let cells = &layout.cells[start * layout.cell_width..(start + len) * layout.cell_width];
        if !layout.has_nulls {
            match le::try_cast_values::<T>(cells) {
                Some(values) => dest.extend_from_slice(values),
                None => {
                    for cell in cells.chunks_exact(layout.cell_width) {
                        dest.push_value(T::read_le(cell));
                    }
                }
            }
        } else {
            for cell in cells.chunks_exact(layout.cell_width) {
                if cell[0] == NOT_NULL_ROW {
                    dest.push_value(T::read_le(&cell[1..]));
                } else {
                    dest.push_null();
                }
            }
        }

        log::trace!(
            "read {len} {} values of column #{} starting at row {start}",
            T::TYPE_NAME,
            self.ordinal
        );
        Ok(len)
    }

    fn value_type_name(&self) -> String {
        T::TYPE_NAME.to_string()
    }
}

impl<T> Clone for NumericColumnReader<T> {
    fn clone(&self) -> Self {
        NumericColumnReader {
            ordinal: self.ordinal,
            _p: PhantomData,
        }
    }
}

impl<T: FrameNumeric> std::fmt::Debug for NumericColumnReader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumericColumnReader")
            .field("type", &T::TYPE_NAME)
            .field("ordinal", &self.ordinal)
            .finish()
    }
}

/// Validated view of a numeric column region.
struct NumericLayout<'f> {
    cells: &'f [u8],
    has_nulls: bool,
    cell_width: usize,
    row_count: usize,
}

impl NumericLayout<'_> {
    #[inline]
    fn get<T: FrameNumeric>(&self, row: usize) -> Option<T> {
        let cell = &self.cells[row * self.cell_width..(row + 1) * self.cell_width];
        if self.has_nulls {
            (cell[0] == NOT_NULL_ROW).then(|| T::read_le(&cell[1..]))
        } else {
            Some(T::read_le(cell))
        }
    }
}

#[cfg(test)]
mod tests {
    use framecol_common::error::ErrorKind;
    use framecol_testkit::FrameBuilder;
    use framecol_vector::string_vector::StringVector;

    use super::*;

    #[test]
    fn test_read_le() {
        let mut src = (-5i64).to_le_bytes().to_vec();
        src.push(0xAA);
        assert_eq!(i64::read_le(&src), -5);
        assert_eq!(f32::read_le(&1.5f32.to_le_bytes()), 1.5);
        assert_eq!(f64::read_le(&(-0.25f64).to_le_bytes()), -0.25);
    }

    #[test]
    fn test_read_long_values() {
        let frame = FrameBuilder::new()
            .add_long(&[Some(1), Some(-2), Some(i64::MAX)])
            .build();
        let reader = LongColumnReader::new(0);
        assert_eq!(reader.row_count(&frame).unwrap(), 3);
        assert_eq!(reader.read_value(&frame, 1).unwrap(), Value::Long(-2));
        assert_eq!(reader.read_value(&frame, 2).unwrap(), Value::Long(i64::MAX));
        assert!(reader.has_row(&frame, 2).unwrap());
        assert!(!reader.has_row(&frame, 3).unwrap());
    }

    #[test]
    fn test_read_nullable_doubles() {
        let frame = FrameBuilder::new()
            .add_double(&[Some(0.5), None, Some(-1.25)])
            .build();
        let reader = DoubleColumnReader::new(0);
        assert_eq!(reader.read_value(&frame, 0).unwrap(), Value::Double(0.5));
        assert_eq!(reader.read_value(&frame, 1).unwrap(), Value::Null);

        let mut dest = ColumnVector::Double(NumericVector::new());
        assert_eq!(reader.read_batch(&frame, 0, 10, &mut dest).unwrap(), 3);
        let ColumnVector::Double(values) = &dest else {
            panic!("unexpected vector {dest:?}");
        };
        assert_eq!(values.get(0), Some(0.5));
        assert_eq!(values.get(1), None);
        assert_eq!(values.get(2), Some(-1.25));
        assert_eq!(values.presence().count_nulls(), 1);
    }

    #[test]
    fn test_float_batch_windows() {
        let data = (0..100).map(|i| Some(i as f32 * 0.5)).collect::<Vec<_>>();
        let frame = FrameBuilder::new().add_float(&data).build();
        let reader = FloatColumnReader::new(0);
        let mut dest = ColumnVector::Float(NumericVector::new());

        let mut start = 0;
        while start < 100 {
            let n = reader.read_batch(&frame, start, 7, &mut dest).unwrap();
            assert_eq!(n, 7.min(100 - start));
            assert_eq!(dest.len(), n);
            for i in 0..n {
                assert_eq!(dest.value_at(i), Value::Float((start + i) as f32 * 0.5));
            }
            start += n;
        }
        assert_eq!(reader.read_batch(&frame, 100, 7, &mut dest).unwrap(), 0);
        assert!(dest.is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let frame = FrameBuilder::new().add_long(&[Some(1)]).build();
        let reader = LongColumnReader::new(0);
        let err = reader.read_value(&frame, 1).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::RowOutOfRange { row: 1, row_count: 1, .. }));

        let mut dest = ColumnVector::Long(NumericVector::new());
        assert!(reader.read_batch(&frame, 2, 1, &mut dest).is_err());
    }

    #[test]
    fn test_dest_mismatch_leaves_dest_untouched() {
        let frame = FrameBuilder::new().add_long(&[Some(1)]).build();
        let reader = LongColumnReader::new(0);
        let mut strings = StringVector::new();
        strings.push_str("keep");
        let mut dest = ColumnVector::String(strings);
        let err = reader.read_batch(&frame, 0, 1, &mut dest).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
        assert_eq!(dest.len(), 1);
    }

    #[test]
    fn test_type_code_mismatch() {
        let frame = FrameBuilder::new().add_long(&[Some(1)]).build();
        let reader = DoubleColumnReader::new(0);
        let err = reader.read_value(&frame, 0).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_truncated_region() {
        let mut builder = FrameBuilder::new().with_row_count(2);
        let mut region = vec![ColumnTypeCode::Long.as_u8(), 0];
        region.extend_from_slice(&5i64.to_le_bytes());
        builder.add_raw_region(region);
        let frame = builder.build();

        let reader = LongColumnReader::new(0);
        let err = reader.row_count(&frame).unwrap_err();
        assert!(err.to_string().contains("does not hold 2 cells"), "{err}");
    }

    #[test]
    fn test_missing_region() {
        let frame = FrameBuilder::new().add_long(&[Some(1)]).build();
        let err = LongColumnReader::new(3).row_count(&frame).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn test_random_nullable_longs() {
        let data = framecol_testkit::data_gen::nullable_longs(1000, 0.2, 42);
        let frame = FrameBuilder::new().add_long(&data).build();
        let reader = LongColumnReader::new(0);
        let mut dest = ColumnVector::Long(NumericVector::new());
        assert_eq!(reader.read_batch(&frame, 0, 1000, &mut dest).unwrap(), 1000);
        for (i, expected) in data.iter().enumerate() {
            let expected = expected.map_or(Value::Null, Value::Long);
            assert_eq!(dest.value_at(i), expected);
            assert_eq!(reader.read_value(&frame, i).unwrap(), expected);
        }
    }
}
