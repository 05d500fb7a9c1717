//! Reader for `STRING` and `ARRAY<STRING>` columns.

use std::{borrow::Cow, ops::Range};

use framecol_bytes::le;
use framecol_common::{Result, error::Error};
use framecol_format::{
    Frame,
    layout::{ColumnTypeCode, NULL_STRING_MARKER, STRING_DATA_OFFSET},
};
use framecol_vector::{ColumnVector, Value};

use super::{ColumnReader, batch_len, check_row, dest_mismatch, malformed_column};

/// Reader of a string column.
///
/// In scalar mode (`STRING` columns) a single-value row reads as a string, and a
/// multi-value row reads as null (no values), as its only value, or as an array.
/// In array mode (`ARRAY<STRING>` columns) the column must be multi-value, and
/// every non-null row reads as an array.
///
/// Batch reads accept a [`StringArrayVector`] in both modes. In scalar mode, one
/// created with [`StringArrayVector::with_scalar_rows`] reads back exactly the values
/// of [`read_value`](ColumnReader::read_value); a plain one reports every non-null row
/// as an array. A [`StringVector`] is accepted in scalar mode as long as no row in the
/// batch holds more than one value.
///
/// [`StringArrayVector`]: framecol_vector::string_vector::StringArrayVector
/// [`StringArrayVector::with_scalar_rows`]: framecol_vector::string_vector::StringArrayVector::with_scalar_rows
/// [`StringVector`]: framecol_vector::string_vector::StringVector
#[derive(Debug, Clone)]
pub struct StringColumnReader {
    ordinal: usize,
    as_array: bool,
    lossy_utf8: bool,
}

impl StringColumnReader {
    pub fn new(ordinal: usize, as_array: bool) -> StringColumnReader {
        StringColumnReader {
            ordinal,
            as_array,
            lossy_utf8: false,
        }
    }

    /// Replaces invalid UTF-8 with `U+FFFD` instead of failing.
    pub fn with_lossy_utf8(mut self, lossy: bool) -> Self {
        self.lossy_utf8 = lossy;
        self
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns `true` for a reader of `ARRAY<STRING>` columns.
    pub fn is_array(&self) -> bool {
        self.as_array
    }

    fn expected_type_code(&self) -> ColumnTypeCode {
        if self.as_array {
            ColumnTypeCode::StringArray
        } else {
            ColumnTypeCode::String
        }
    }

    fn layout<'f>(&self, frame: &'f Frame) -> Result<StringLayout<'f>> {
        let layout = StringLayout::parse(
            frame,
            self.ordinal,
            self.expected_type_code(),
            self.lossy_utf8,
        )?;
        if self.as_array && !layout.multi_value {
            return Err(malformed_column(
                self.ordinal,
                "ARRAY<STRING> column is not stored as multi-value",
            ));
        }
        Ok(layout)
    }

    fn row_value(&self, layout: &StringLayout, row: usize) -> Result<Value> {
        let Some(values) = layout.row_values(row)? else {
            return Ok(Value::Null);
        };
        if !self.as_array && values.len() <= 1 {
            return match values.len() {
                0 => Ok(Value::Null),
                _ => layout.string_value(values.start),
            };
        }
        values
            .map(|i| layout.string_value(i))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl ColumnReader for StringColumnReader {
    fn row_count(&self, frame: &Frame) -> Result<usize> {
        Ok(self.layout(frame)?.row_count)
    }

    fn read_value(&self, frame: &Frame, row: usize) -> Result<Value> {
        let layout = self.layout(frame)?;
        check_row(self.ordinal, row, layout.row_count)?;
        self.row_value(&layout, row)
    }

    fn read_batch(
        &self,
        frame: &Frame,
        start: usize,
        count: usize,
        dest: &mut ColumnVector,
    ) -> Result<usize> {
        let scalar_rows = matches!(dest, ColumnVector::StringArray(v) if v.has_scalar_rows());
        if self.as_array && scalar_rows {
            return Err(dest_mismatch(&self.value_type_name(), dest));
        }
        match dest {
            ColumnVector::String(dest) if !self.as_array => {
                let layout = self.layout(frame)?;
                let len = batch_len(self.ordinal, start, count, layout.row_count)?;
                dest.clear();
                for row in start..start + len {
                    match layout.row_values(row)? {
                        Some(values) if values.len() == 1 => {
                            dest.push(layout.value(values.start)?.as_deref());
                        }
                        Some(values) if values.len() > 1 => {
                            return Err(Error::invalid_arg(
                                "dest",
                                format!(
                                    "row {row} of column #{} holds {} values; \
                                     multi-value rows need a string array vector",
                                    self.ordinal,
                                    values.len()
                                ),
                            ));
                        }
                        _ => dest.push_null(),
                    }
                }
                Ok(len)
            }
            ColumnVector::StringArray(dest) => {
                let layout = self.layout(frame)?;
                let len = batch_len(self.ordinal, start, count, layout.row_count)?;
                dest.clear();
                for row in start..start + len {
                    let Some(values) = layout.row_values(row)? else {
                        dest.push_null_row();
                        continue;
                    };
                    if !layout.multi_value {
                        match layout.value(values.start)? {
                            Some(s) => dest.push_row([Some(&*s)]),
                            None => dest.push_null_row(),
                        }
                        continue;
                    }
                    let elements = values
                        .map(|i| layout.value(i))
                        .collect::<Result<Vec<_>>>()?;
                    dest.push_row(elements.iter().map(|e| e.as_deref()));
                }
                Ok(len)
            }
            other => Err(dest_mismatch(&self.value_type_name(), other)),
        }
    }

    fn value_type_name(&self) -> String {
        self.expected_type_code().logical_type().to_string()
    }
}

/// Validated view of a string column region.
///
/// Multi-value regions start with one `i32` per row holding the cumulative number of
/// values up to and including that row; a null row stores the bitwise complement of
/// its cumulative count. Both layouts continue with one `u32` cumulative byte end
/// per value and the string pool.
struct StringLayout<'f> {
    region: &'f [u8],
    ordinal: usize,
    row_count: usize,
    multi_value: bool,
    value_count: usize,
    value_ends_start: usize,
    pool: &'f [u8],
    lossy_utf8: bool,
}

impl<'f> StringLayout<'f> {
    fn parse(
        frame: &'f Frame,
        ordinal: usize,
        expected: ColumnTypeCode,
        lossy_utf8: bool,
    ) -> Result<StringLayout<'f>> {
        let region = frame.region(ordinal)?;
        let code = le::read_u8(region, 0)
            .ok_or_else(|| malformed_column(ordinal, "empty string column region"))?;
        if code != expected.as_u8() {
            return Err(malformed_column(
                ordinal,
                format!(
                    "expected {} column type code {}, found {code}",
                    expected.logical_type(),
                    expected.as_u8()
                ),
            ));
        }
        let multi_value = le::read_u8(region, 1)
            .ok_or_else(|| malformed_column(ordinal, "truncated string column header"))?
            != 0;

        let row_count = frame.row_count();
        let mut pos = STRING_DATA_OFFSET;
        let value_count = if multi_value {
            pos = table_end(region, pos, row_count).ok_or_else(|| {
                malformed_column(ordinal, format!("row table of {row_count} rows is truncated"))
            })?;
            match row_count.checked_sub(1) {
                Some(last) => {
                    let entry = le::read_i32_at_index(region, STRING_DATA_OFFSET, last)
                        .ok_or_else(|| malformed_column(ordinal, "truncated row table"))?;
                    decode_row_end(entry).0
                }
                None => 0,
            }
        } else {
            row_count
        };

        let value_ends_start = pos;
        let pool_start = table_end(region, pos, value_count).ok_or_else(|| {
            malformed_column(
                ordinal,
                format!("offset table of {value_count} values is truncated"),
            )
        })?;

        Ok(StringLayout {
            region,
            ordinal,
            row_count,
            multi_value,
            value_count,
            value_ends_start,
            pool: &region[pool_start..],
            lossy_utf8,
        })
    }

    /// Value indices of `row`, `None` for a null row.
    fn row_values(&self, row: usize) -> Result<Option<Range<usize>>> {
        if !self.multi_value {
            return Ok(Some(row..row + 1));
        }
        let (end, is_null) = decode_row_end(self.row_entry(row)?);
        let start = match row.checked_sub(1) {
            Some(prev) => decode_row_end(self.row_entry(prev)?).0,
            None => 0,
        };
        if start > end || end > self.value_count {
            return Err(malformed_column(
                self.ordinal,
                format!(
                    "row {row} spans values {start}..{end} of {}",
                    self.value_count
                ),
            ));
        }
        if is_null && start != end {
            return Err(malformed_column(
                self.ordinal,
                format!("null row {row} spans values {start}..{end}"),
            ));
        }
        Ok((!is_null).then_some(start..end))
    }

    fn row_entry(&self, row: usize) -> Result<i32> {
        le::read_i32_at_index(self.region, STRING_DATA_OFFSET, row)
            .ok_or_else(|| malformed_column(self.ordinal, "truncated row table"))
    }

    fn value_end(&self, index: usize) -> Result<usize> {
        le::read_u32_at_index(self.region, self.value_ends_start, index)
            .map(|end| end as usize)
            .ok_or_else(|| malformed_column(self.ordinal, "truncated offset table"))
    }

    /// Decodes value `index`, `None` for the null marker.
    fn value(&self, index: usize) -> Result<Option<Cow<'f, str>>> {
        let end = self.value_end(index)?;
        let start = match index.checked_sub(1) {
            Some(prev) => self.value_end(prev)?,
            None => 0,
        };
        if start > end || end > self.pool.len() {
            return Err(malformed_column(
                self.ordinal,
                format!(
                    "value #{index} spans bytes {start}..{end} of a {} byte pool",
                    self.pool.len()
                ),
            ));
        }

        let bytes = &self.pool[start..end];
        if bytes == NULL_STRING_MARKER {
            return Ok(None);
        }
        if self.lossy_utf8 {
            return Ok(Some(String::from_utf8_lossy(bytes)));
        }
        std::str::from_utf8(bytes)
            .map(|s| Some(Cow::Borrowed(s)))
            .map_err(|e| {
                malformed_column(
                    self.ordinal,
                    format!("value #{index} is not valid UTF-8: {e}"),
                )
            })
    }

    fn string_value(&self, index: usize) -> Result<Value> {
        Ok(Value::from_opt_str(self.value(index)?.as_deref()))
    }
}

/// Splits a row table entry into the cumulative value count and the null flag.
#[inline]
fn decode_row_end(entry: i32) -> (usize, bool) {
    if entry < 0 {
        ((!entry) as usize, true)
    } else {
        (entry as usize, false)
    }
}

/// End position of a table of `count` 4-byte entries starting at `start`, if the
/// table fits in `region`.
fn table_end(region: &[u8], start: usize, count: usize) -> Option<usize> {
    count
        .checked_mul(4)
        .and_then(|len| start.checked_add(len))
        .filter(|&end| end <= region.len())
}

#[cfg(test)]
mod tests {
    use framecol_common::error::ErrorKind;
    use framecol_testkit::FrameBuilder;
    use framecol_vector::{
        numeric_vector::NumericVector,
        string_vector::{StringArrayVector, StringVector},
    };

    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn test_scalar_single_value() {
        let frame = FrameBuilder::new()
            .add_string(&[Some("a"), None, Some(""), Some("héllo")])
            .build();
        let reader = StringColumnReader::new(0, false);
        assert_eq!(reader.row_count(&frame).unwrap(), 4);
        assert_eq!(reader.read_value(&frame, 0).unwrap(), s("a"));
        assert_eq!(reader.read_value(&frame, 1).unwrap(), Value::Null);
        assert_eq!(reader.read_value(&frame, 2).unwrap(), s(""));
        assert_eq!(reader.read_value(&frame, 3).unwrap(), s("héllo"));
        assert_eq!(reader.value_type_name(), "STRING");

        let mut dest = ColumnVector::String(StringVector::new());
        assert_eq!(reader.read_batch(&frame, 1, 10, &mut dest).unwrap(), 3);
        let ColumnVector::String(values) = &dest else {
            panic!("unexpected vector {dest:?}");
        };
        assert_eq!(
            values.iter().collect::<Vec<_>>(),
            vec![None, Some(""), Some("héllo")]
        );
    }

    #[test]
    fn test_scalar_multi_value() {
        let frame = FrameBuilder::new()
            .add_multi_value_string(&[
                Some(vec![Some("x")]),
                Some(vec![]),
                None,
                Some(vec![Some("p"), None, Some("q")]),
            ])
            .build();
        let reader = StringColumnReader::new(0, false);
        assert_eq!(reader.read_value(&frame, 0).unwrap(), s("x"));
        assert_eq!(reader.read_value(&frame, 1).unwrap(), Value::Null);
        assert_eq!(reader.read_value(&frame, 2).unwrap(), Value::Null);
        assert_eq!(
            reader.read_value(&frame, 3).unwrap(),
            Value::Array(vec![s("p"), Value::Null, s("q")])
        );

        let mut dest = ColumnVector::String(StringVector::new());
        assert_eq!(reader.read_batch(&frame, 0, 3, &mut dest).unwrap(), 3);
        assert_eq!(
            dest.values().collect::<Vec<_>>(),
            vec![s("x"), Value::Null, Value::Null]
        );
        let err = reader.read_batch(&frame, 0, 4, &mut dest).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

        let mut dest = ColumnVector::StringArray(StringArrayVector::with_scalar_rows());
        assert_eq!(reader.read_batch(&frame, 0, 4, &mut dest).unwrap(), 4);
        assert_eq!(
            dest.values().collect::<Vec<_>>(),
            vec![
                s("x"),
                Value::Null,
                Value::Null,
                Value::Array(vec![s("p"), Value::Null, s("q")]),
            ]
        );

        let mut dest = ColumnVector::StringArray(StringArrayVector::new());
        assert_eq!(reader.read_batch(&frame, 0, 4, &mut dest).unwrap(), 4);
        assert_eq!(
            dest.values().collect::<Vec<_>>(),
            vec![
                Value::Array(vec![s("x")]),
                Value::Array(vec![]),
                Value::Null,
                Value::Array(vec![s("p"), Value::Null, s("q")]),
            ]
        );
    }

    #[test]
    fn test_array_mode() {
        let frame = FrameBuilder::new()
            .add_string_array(&[Some(vec![Some("a"), Some("b")]), None, Some(vec![])])
            .build();
        let reader = StringColumnReader::new(0, true);
        assert_eq!(reader.value_type_name(), "ARRAY<STRING>");
        assert_eq!(
            reader.read_value(&frame, 0).unwrap(),
            Value::Array(vec![s("a"), s("b")])
        );
        assert_eq!(reader.read_value(&frame, 1).unwrap(), Value::Null);
        assert_eq!(reader.read_value(&frame, 2).unwrap(), Value::Array(vec![]));

        let mut dest = ColumnVector::String(StringVector::new());
        let err = reader.read_batch(&frame, 0, 1, &mut dest).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));

        let mut dest = ColumnVector::StringArray(StringArrayVector::with_scalar_rows());
        let err = reader.read_batch(&frame, 0, 1, &mut dest).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
        assert!(dest.is_empty());
    }

    #[test]
    fn test_scalar_rows_into_array_vector() {
        let frame = FrameBuilder::new().add_string(&[Some("a"), None]).build();
        let reader = StringColumnReader::new(0, false);
        let mut dest = ColumnVector::StringArray(StringArrayVector::new());
        assert_eq!(reader.read_batch(&frame, 0, 2, &mut dest).unwrap(), 2);
        assert_eq!(dest.value_at(0), Value::Array(vec![s("a")]));
        assert_eq!(dest.value_at(1), Value::Null);
    }

    #[test]
    fn test_single_row_batches_match_read_value() {
        let frame = FrameBuilder::new()
            .add_multi_value_string(&[
                Some(vec![Some("x")]),
                Some(vec![Some("p"), Some("q")]),
                Some(vec![None]),
                Some(vec![]),
                None,
            ])
            .build();
        let reader = StringColumnReader::new(0, false);
        let mut dest = ColumnVector::StringArray(StringArrayVector::with_scalar_rows());
        for row in 0..5 {
            assert_eq!(reader.read_batch(&frame, row, 1, &mut dest).unwrap(), 1);
            assert_eq!(dest.value_at(0), reader.read_value(&frame, row).unwrap());
        }
    }

    #[test]
    fn test_type_code_mismatch() {
        let frame = FrameBuilder::new().add_string(&[Some("a")]).build();
        let err = StringColumnReader::new(0, true).read_value(&frame, 0).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));

        let frame = FrameBuilder::new()
            .add_string_array(&[Some(vec![Some("a")])])
            .build();
        let err = StringColumnReader::new(0, false).row_count(&frame).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut region = vec![ColumnTypeCode::String.as_u8(), 0];
        region.extend_from_slice(&2u32.to_le_bytes());
        region.extend_from_slice(&[b'a', 0xC3]);
        let mut builder = FrameBuilder::new().with_row_count(1);
        builder.add_raw_region(region);
        let frame = builder.build();

        let strict = StringColumnReader::new(0, false);
        let err = strict.read_value(&frame, 0).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"), "{err}");

        let lossy = StringColumnReader::new(0, false).with_lossy_utf8(true);
        assert_eq!(lossy.read_value(&frame, 0).unwrap(), s("a\u{FFFD}"));
    }

    #[test]
    fn test_offsets_outside_pool() {
        let mut region = vec![ColumnTypeCode::String.as_u8(), 0];
        region.extend_from_slice(&1u32.to_le_bytes());
        region.extend_from_slice(&9u32.to_le_bytes());
        region.extend_from_slice(b"abc");
        let mut builder = FrameBuilder::new().with_row_count(2);
        builder.add_raw_region(region);
        let frame = builder.build();

        let reader = StringColumnReader::new(0, false);
        assert_eq!(reader.read_value(&frame, 0).unwrap(), s("a"));
        let err = reader.read_value(&frame, 1).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_null_row_spanning_values() {
        let mut region = vec![ColumnTypeCode::StringArray.as_u8(), 1];
        region.extend_from_slice(&(!2i32).to_le_bytes());
        region.extend_from_slice(&3i32.to_le_bytes());
        for end in 1u32..=3 {
            region.extend_from_slice(&end.to_le_bytes());
        }
        region.extend_from_slice(b"abc");
        let mut builder = FrameBuilder::new().with_row_count(2);
        builder.add_raw_region(region);
        let frame = builder.build();

        let reader = StringColumnReader::new(0, true);
        let err = reader.read_value(&frame, 0).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
        assert!(err.to_string().contains("null row 0"), "{err}");

        let mut dest = ColumnVector::StringArray(StringArrayVector::new());
        let err = reader.read_batch(&frame, 0, 2, &mut dest).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_truncated_offset_table() {
        let mut region = vec![ColumnTypeCode::String.as_u8(), 0];
        region.extend_from_slice(&1u32.to_le_bytes());
        let mut builder = FrameBuilder::new().with_row_count(3);
        builder.add_raw_region(region);
        let frame = builder.build();
        let err = StringColumnReader::new(0, false).row_count(&frame).unwrap_err();
        assert!(err.to_string().contains("truncated"), "{err}");
    }

    #[test]
    fn test_numeric_dest_rejected() {
        let frame = FrameBuilder::new().add_string(&[Some("a")]).build();
        let mut dest = ColumnVector::Long(NumericVector::new());
        let err = StringColumnReader::new(0, false)
            .read_batch(&frame, 0, 1, &mut dest)
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn test_random_string_lists() {
        use framecol_testkit::data_gen::{as_str_lists, nullable_string_lists};

        let rows = nullable_string_lists(500, 4, 0.15, 11);
        let frame = FrameBuilder::new()
            .add_string_array(&as_str_lists(&rows))
            .build();
        let reader = StringColumnReader::new(0, true);
        let mut dest = ColumnVector::StringArray(StringArrayVector::new());
        assert_eq!(reader.read_batch(&frame, 0, 500, &mut dest).unwrap(), 500);
        for (i, row) in rows.iter().enumerate() {
            let expected = match row {
                Some(values) => Value::Array(
                    values
                        .iter()
                        .map(|v| Value::from_opt_str(v.as_deref()))
                        .collect(),
                ),
                None => Value::Null,
            };
            assert_eq!(dest.value_at(i), expected);
            assert_eq!(reader.read_value(&frame, i).unwrap(), expected);
        }
    }
}
