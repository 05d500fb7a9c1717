//! Serializes column data into columnar frames.

use framecol_bytes::Bytes;
use framecol_format::{
    Frame, FrameType,
    layout::{ColumnTypeCode, FRAME_HEADER_SIZE, NOT_NULL_ROW, NULL_ROW, NULL_STRING_MARKER, REGION_END_SIZE},
};

/// Builds a columnar frame one column at a time.
///
/// Every column must have the same number of rows; the first added column
/// determines the frame row count.
///
/// # Panics
///
/// The builder panics on inconsistent input (row count mismatch), since it is only
/// used to produce test fixtures.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    row_count: Option<usize>,
    regions: Vec<Vec<u8>>,
}

impl FrameBuilder {
    pub fn new() -> FrameBuilder {
        FrameBuilder::default()
    }

    /// Sets the row count explicitly, for frames whose columns are all raw regions.
    pub fn with_row_count(mut self, row_count: usize) -> FrameBuilder {
        self.set_row_count(row_count);
        self
    }

    pub fn add_long(&mut self, values: &[Option<i64>]) -> &mut Self {
        self.set_row_count(values.len());
        self.regions
            .push(encode_numeric(ColumnTypeCode::Long, values, |v, buf| {
                buf.extend_from_slice(&v.to_le_bytes())
            }));
        self
    }

    pub fn add_float(&mut self, values: &[Option<f32>]) -> &mut Self {
        self.set_row_count(values.len());
        self.regions
            .push(encode_numeric(ColumnTypeCode::Float, values, |v, buf| {
                buf.extend_from_slice(&v.to_le_bytes())
            }));
        self
    }

    pub fn add_double(&mut self, values: &[Option<f64>]) -> &mut Self {
        self.set_row_count(values.len());
        self.regions
            .push(encode_numeric(ColumnTypeCode::Double, values, |v, buf| {
                buf.extend_from_slice(&v.to_le_bytes())
            }));
        self
    }

    /// Adds a single-value string column.
    pub fn add_string(&mut self, values: &[Option<&str>]) -> &mut Self {
        self.set_row_count(values.len());
        let mut region = vec![ColumnTypeCode::String.as_u8(), 0];
        encode_string_values(values.iter().copied(), &mut region);
        self.regions.push(region);
        self
    }

    /// Adds a multi-value string column (type code `STRING`, multi-value flag set).
    pub fn add_multi_value_string(&mut self, rows: &[Option<Vec<Option<&str>>>]) -> &mut Self {
        self.set_row_count(rows.len());
        self.regions
            .push(encode_multi_value(ColumnTypeCode::String, rows));
        self
    }

    /// Adds an `ARRAY<STRING>` column.
    pub fn add_string_array(&mut self, rows: &[Option<Vec<Option<&str>>>]) -> &mut Self {
        self.set_row_count(rows.len());
        self.regions
            .push(encode_multi_value(ColumnTypeCode::StringArray, rows));
        self
    }

    /// Adds a complex column holding already-serialized payloads.
    pub fn add_complex(&mut self, type_name: &str, values: &[Option<&[u8]>]) -> &mut Self {
        self.set_row_count(values.len());
        let mut region = vec![ColumnTypeCode::Complex.as_u8()];
        region.extend_from_slice(&(type_name.len() as u32).to_le_bytes());
        region.extend_from_slice(type_name.as_bytes());

        let mut payloads = Vec::new();
        for value in values {
            match value {
                Some(bytes) => {
                    payloads.push(NOT_NULL_ROW);
                    payloads.extend_from_slice(bytes);
                }
                None => payloads.push(NULL_ROW),
            }
            region.extend_from_slice(&(payloads.len() as u32).to_le_bytes());
        }
        region.extend_from_slice(&payloads);
        self.regions.push(region);
        self
    }

    /// Adds a `COMPLEX<json>` column.
    pub fn add_json(&mut self, values: &[Option<serde_json::Value>]) -> &mut Self {
        let serialized = values
            .iter()
            .map(|v| v.as_ref().map(|v| v.to_string().into_bytes()))
            .collect::<Vec<_>>();
        let payloads = serialized.iter().map(|v| v.as_deref()).collect::<Vec<_>>();
        self.add_complex("json", &payloads)
    }

    /// Adds a region verbatim.
    pub fn add_raw_region(&mut self, region: Vec<u8>) -> &mut Self {
        self.regions.push(region);
        self
    }

    /// Serializes the frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let row_count = self.row_count.unwrap_or(0);
        let data_len: usize = self.regions.iter().map(|r| r.len()).sum();
        let total = FRAME_HEADER_SIZE + self.regions.len() * REGION_END_SIZE + data_len;

        let mut buf = Vec::with_capacity(total);
        buf.push(FrameType::Columnar.as_u8());
        buf.extend_from_slice(&(total as u64).to_le_bytes());
        buf.extend_from_slice(&(row_count as u32).to_le_bytes());
        buf.extend_from_slice(&(self.regions.len() as u32).to_le_bytes());
        buf.push(0);
        let mut end = 0u64;
        for region in &self.regions {
            end += region.len() as u64;
            buf.extend_from_slice(&end.to_le_bytes());
        }
        for region in &self.regions {
            buf.extend_from_slice(region);
        }
        assert_eq!(buf.len(), total);
        buf
    }

    /// Serializes and wraps the frame.
    pub fn build(&self) -> Frame {
        Frame::wrap(Bytes::from(self.to_bytes())).expect("valid frame")
    }

    fn set_row_count(&mut self, row_count: usize) {
        match self.row_count {
            Some(existing) => assert_eq!(existing, row_count, "row count mismatch"),
            None => self.row_count = Some(row_count),
        }
    }
}

fn encode_numeric<T: Copy + Default>(
    code: ColumnTypeCode,
    values: &[Option<T>],
    put: impl Fn(T, &mut Vec<u8>),
) -> Vec<u8> {
    let has_nulls = values.iter().any(Option::is_none);
    let mut region = vec![code.as_u8(), has_nulls as u8];
    for value in values {
        if has_nulls {
            region.push(if value.is_some() { NOT_NULL_ROW } else { NULL_ROW });
        }
        put(value.unwrap_or_default(), &mut region);
    }
    region
}

fn encode_multi_value(code: ColumnTypeCode, rows: &[Option<Vec<Option<&str>>>]) -> Vec<u8> {
    let mut region = vec![code.as_u8(), 1];
    let mut cumulative = 0i32;
    for row in rows {
        match row {
            Some(values) => {
                cumulative += values.len() as i32;
                region.extend_from_slice(&cumulative.to_le_bytes());
            }
            None => region.extend_from_slice(&(!cumulative).to_le_bytes()),
        }
    }
    let values = rows.iter().flatten().flatten().copied();
    encode_string_values(values, &mut region);
    region
}

fn encode_string_values<'a>(values: impl Iterator<Item = Option<&'a str>>, region: &mut Vec<u8>) {
    let mut pool = Vec::new();
    for value in values {
        match value {
            Some(s) => pool.extend_from_slice(s.as_bytes()),
            None => pool.extend_from_slice(NULL_STRING_MARKER),
        }
        region.extend_from_slice(&(pool.len() as u32).to_le_bytes());
    }
    region.extend_from_slice(&pool);
}
