//! Inspect command implementation

use anyhow::Result;
use framecol_format::{ColumnType, Frame, layout::ColumnTypeCode};
use framecol_read::column_reader::ComplexColumnReader;
use serde::Serialize;

use crate::commands::read_frame;

#[derive(Serialize)]
struct InspectSummary {
    total_size: usize,
    row_count: usize,
    region_count: usize,
    columns: Vec<ColumnInfo>,
}

#[derive(Serialize)]
struct ColumnInfo {
    ordinal: usize,
    offset: usize,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_code: Option<u8>,
    /// Type implied by the region header, absent when the header is unrecognized.
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    inferred_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    multi_value: Option<bool>,
}

/// Run the inspect command
pub fn run(frame_path: String) -> Result<()> {
    let frame = read_frame(&frame_path)?;
    let summary = summarize(&frame)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn summarize(frame: &Frame) -> Result<InspectSummary> {
    let columns = (0..frame.region_count())
        .map(|ordinal| create_column_info(frame, ordinal))
        .collect::<Result<Vec<_>>>()?;
    Ok(InspectSummary {
        total_size: frame.bytes().len(),
        row_count: frame.row_count(),
        region_count: frame.region_count(),
        columns,
    })
}

fn create_column_info(frame: &Frame, ordinal: usize) -> Result<ColumnInfo> {
    let range = frame.region_range(ordinal)?;
    let region = frame.region(ordinal)?;
    let type_code = region.first().copied();
    let code = type_code.and_then(ColumnTypeCode::from_u8);

    let inferred_type = match code {
        Some(ColumnTypeCode::Complex) => {
            let reader = ComplexColumnReader::new(ordinal, None, Default::default());
            Some(match reader.stored_type_name(frame) {
                Ok(name) => ColumnType::complex(name).to_string(),
                Err(_) => ColumnType::COMPLEX.to_string(),
            })
        }
        Some(code) => Some(code.logical_type().to_string()),
        None => None,
    };
    let multi_value = match code {
        Some(ColumnTypeCode::String | ColumnTypeCode::StringArray) => {
            region.get(1).map(|&flag| flag != 0)
        }
        _ => None,
    };

    Ok(ColumnInfo {
        ordinal,
        offset: range.start,
        size: range.len(),
        type_code,
        inferred_type,
        multi_value,
    })
}
