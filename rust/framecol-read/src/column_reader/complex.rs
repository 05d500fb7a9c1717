//! Reader for `COMPLEX<name>` columns.

use std::sync::Arc;

use framecol_bytes::le;
use framecol_common::Result;
use framecol_format::{
    ColumnType, Frame,
    layout::{COMPLEX_NAME_LEN_OFFSET, ColumnTypeCode, NOT_NULL_ROW},
};
use framecol_vector::{ColumnVector, Value};

use super::{ColumnReader, batch_len, check_row, dest_mismatch, malformed_column};
use crate::complex_type::{ComplexTypeRegistry, ComplexTypeSerde};

/// Reader of a complex column.
///
/// The type name stored in the column region selects the handler that deserializes
/// row payloads. A declared type name, when present, must match the stored one.
#[derive(Debug, Clone)]
pub struct ComplexColumnReader {
    ordinal: usize,
    declared_type_name: Option<String>,
    registry: Arc<ComplexTypeRegistry>,
}

impl ComplexColumnReader {
    pub fn new(
        ordinal: usize,
        declared_type_name: Option<String>,
        registry: Arc<ComplexTypeRegistry>,
    ) -> ComplexColumnReader {
        ComplexColumnReader {
            ordinal,
            declared_type_name,
            registry,
        }
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn declared_type_name(&self) -> Option<&str> {
        self.declared_type_name.as_deref()
    }

    /// Returns the complex type name stored in the column region of `frame`.
    pub fn stored_type_name<'f>(&self, frame: &'f Frame) -> Result<&'f str> {
        Ok(self.layout(frame)?.type_name)
    }

    fn layout<'f>(&self, frame: &'f Frame) -> Result<ComplexLayout<'f>> {
        let layout = ComplexLayout::parse(frame, self.ordinal)?;
        if let Some(declared) = &self.declared_type_name {
            if declared != layout.type_name {
                return Err(malformed_column(
                    self.ordinal,
                    format!(
                        "column declared as COMPLEX<{declared}> holds COMPLEX<{}>",
                        layout.type_name
                    ),
                ));
            }
        }
        Ok(layout)
    }

    fn handler(&self, layout: &ComplexLayout) -> Result<&Arc<dyn ComplexTypeSerde>> {
        self.registry.resolve(layout.type_name)
    }
}

impl ColumnReader for ComplexColumnReader {
    fn row_count(&self, frame: &Frame) -> Result<usize> {
        Ok(self.layout(frame)?.row_count)
    }

    fn read_value(&self, frame: &Frame, row: usize) -> Result<Value> {
        let layout = self.layout(frame)?;
        let handler = self.handler(&layout)?;
        check_row(self.ordinal, row, layout.row_count)?;
        match layout.payload(row)? {
            Some(payload) => handler.deserialize(payload).map(Value::Complex),
            None => Ok(Value::Null),
        }
    }

    fn read_batch(
        &self,
        frame: &Frame,
        start: usize,
        count: usize,
        dest: &mut ColumnVector,
    ) -> Result<usize> {
        let ColumnVector::Complex(dest) = dest else {
            return Err(dest_mismatch(&self.value_type_name(), dest));
        };
        let layout = self.layout(frame)?;
        let handler = self.handler(&layout)?;
        let len = batch_len(self.ordinal, start, count, layout.row_count)?;
        dest.clear();
        for row in start..start + len {
            let value = match layout.payload(row)? {
                Some(payload) => Some(handler.deserialize(payload)?),
                None => None,
            };
            dest.push(value);
        }
        Ok(len)
    }

    fn value_type_name(&self) -> String {
        match &self.declared_type_name {
            Some(name) => ColumnType::complex(name.as_str()).to_string(),
            None => ColumnType::COMPLEX.to_string(),
        }
    }
}

/// Validated view of a complex column region.
struct ComplexLayout<'f> {
    region: &'f [u8],
    ordinal: usize,
    type_name: &'f str,
    row_count: usize,
    row_ends_start: usize,
    payloads: &'f [u8],
}

impl<'f> ComplexLayout<'f> {
    fn parse(frame: &'f Frame, ordinal: usize) -> Result<ComplexLayout<'f>> {
        let region = frame.region(ordinal)?;
        let code = le::read_u8(region, 0)
            .ok_or_else(|| malformed_column(ordinal, "empty complex column region"))?;
        if code != ColumnTypeCode::Complex.as_u8() {
            return Err(malformed_column(
                ordinal,
                format!(
                    "expected COMPLEX column type code {}, found {code}",
                    ColumnTypeCode::Complex.as_u8()
                ),
            ));
        }

        let name_len = le::read_u32(region, COMPLEX_NAME_LEN_OFFSET)
            .ok_or_else(|| malformed_column(ordinal, "truncated complex column header"))?
            as usize;
        let name_start = COMPLEX_NAME_LEN_OFFSET + 4;
        let name = name_start
            .checked_add(name_len)
            .and_then(|end| region.get(name_start..end))
            .ok_or_else(|| malformed_column(ordinal, "truncated complex type name"))?;
        let type_name = std::str::from_utf8(name)
            .map_err(|_| malformed_column(ordinal, "complex type name is not valid UTF-8"))?;

        let row_count = frame.row_count();
        let row_ends_start = name_start + name_len;
        let payload_start = row_count
            .checked_mul(4)
            .and_then(|len| len.checked_add(row_ends_start))
            .filter(|&end| end <= region.len())
            .ok_or_else(|| {
                malformed_column(ordinal, format!("offset table of {row_count} rows is truncated"))
            })?;

        Ok(ComplexLayout {
            region,
            ordinal,
            type_name,
            row_count,
            row_ends_start,
            payloads: &region[payload_start..],
        })
    }

    fn row_end(&self, row: usize) -> Result<usize> {
        le::read_u32_at_index(self.region, self.row_ends_start, row)
            .map(|end| end as usize)
            .ok_or_else(|| malformed_column(self.ordinal, "truncated offset table"))
    }

    /// Payload bytes of `row` following the null indicator, `None` for a null row.
    fn payload(&self, row: usize) -> Result<Option<&'f [u8]>> {
        let end = self.row_end(row)?;
        let start = match row.checked_sub(1) {
            Some(prev) => self.row_end(prev)?,
            None => 0,
        };
        if start >= end || end > self.payloads.len() {
            return Err(malformed_column(
                self.ordinal,
                format!(
                    "row {row} spans payload bytes {start}..{end} of {}",
                    self.payloads.len()
                ),
            ));
        }
        let payload = &self.payloads[start..end];
        Ok((payload[0] == NOT_NULL_ROW).then(|| &payload[1..]))
    }
}

#[cfg(test)]
mod tests {
    use framecol_common::error::ErrorKind;
    use framecol_testkit::FrameBuilder;
    use framecol_vector::{complex_vector::ComplexVector, numeric_vector::NumericVector};
    use serde_json::json;

    use super::*;

    fn reader(declared: Option<&str>) -> ComplexColumnReader {
        ComplexColumnReader::new(
            0,
            declared.map(str::to_string),
            Arc::new(ComplexTypeRegistry::with_builtins()),
        )
    }

    #[test]
    fn test_read_json() {
        let frame = FrameBuilder::new()
            .add_json(&[Some(json!({"k": 1})), None, Some(json!([true, null]))])
            .build();
        let reader = reader(Some("json"));
        assert_eq!(reader.row_count(&frame).unwrap(), 3);
        assert_eq!(reader.stored_type_name(&frame).unwrap(), "json");
        assert_eq!(reader.value_type_name(), "COMPLEX<json>");

        let value = reader.read_value(&frame, 0).unwrap();
        let complex = value.as_complex().unwrap();
        assert_eq!(complex.type_name(), "json");
        assert_eq!(
            complex.downcast_ref::<serde_json::Value>(),
            Some(&json!({"k": 1}))
        );
        assert_eq!(reader.read_value(&frame, 1).unwrap(), Value::Null);

        let mut dest = ColumnVector::Complex(ComplexVector::new());
        assert_eq!(reader.read_batch(&frame, 1, 5, &mut dest).unwrap(), 2);
        let ColumnVector::Complex(values) = &dest else {
            panic!("unexpected vector {dest:?}");
        };
        assert!(values.get(0).is_none());
        assert_eq!(
            values.get(1).and_then(|v| v.downcast_ref::<serde_json::Value>()),
            Some(&json!([true, null]))
        );
    }

    #[test]
    fn test_undeclared_name_uses_stored_handler() {
        let frame = FrameBuilder::new()
            .add_complex("bytes", &[Some(&[1, 2, 3][..]), Some(&[][..])])
            .build();
        let reader = reader(None);
        assert_eq!(reader.value_type_name(), "COMPLEX");
        let value = reader.read_value(&frame, 1).unwrap();
        assert_eq!(
            value.as_complex().and_then(|c| c.downcast_ref::<Vec<u8>>()),
            Some(&vec![])
        );
    }

    #[test]
    fn test_declared_name_mismatch() {
        let frame = FrameBuilder::new().add_complex("bytes", &[None]).build();
        let err = reader(Some("json")).read_value(&frame, 0).unwrap_err();
        assert!(err.to_string().contains("COMPLEX<json>"), "{err}");
    }

    #[test]
    fn test_unknown_handler_fails_at_access() {
        let frame = FrameBuilder::new()
            .add_complex("hyperUnique", &[Some(&[7][..])])
            .build();
        let reader = reader(Some("hyperUnique"));
        assert_eq!(reader.row_count(&frame).unwrap(), 1);
        let err = reader.read_value(&frame, 0).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnknownComplexType { .. }));
    }

    #[test]
    fn test_json_decode_failure() {
        let frame = FrameBuilder::new()
            .add_complex("json", &[Some(&b"{oops"[..])])
            .build();
        let err = reader(None).read_value(&frame, 0).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ComplexDecode { .. }));
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        let mut region = vec![ColumnTypeCode::Complex.as_u8()];
        region.extend_from_slice(&5u32.to_le_bytes());
        region.extend_from_slice(b"bytes");
        region.extend_from_slice(&1u32.to_le_bytes());
        region.extend_from_slice(&1u32.to_le_bytes());
        region.push(NOT_NULL_ROW);
        let mut builder = FrameBuilder::new().with_row_count(2);
        builder.add_raw_region(region);
        let frame = builder.build();

        let reader = reader(None);
        assert!(reader.read_value(&frame, 0).is_ok());
        let err = reader.read_value(&frame, 1).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_dest_mismatch() {
        let frame = FrameBuilder::new().add_complex("bytes", &[None]).build();
        let mut dest = ColumnVector::Double(NumericVector::new());
        let err = reader(None).read_batch(&frame, 0, 1, &mut dest).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
    }
}
