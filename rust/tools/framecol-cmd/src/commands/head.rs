//! Head command implementation

use anyhow::{Result, bail};
use framecol_format::{ColumnType, Frame};
use framecol_read::{ColumnReader, FrameColumnReaders, FrameReaderOptions};

use crate::commands::{read_frame, value_to_json};

/// Run the head command
pub fn run(
    types: String,
    names: Option<String>,
    rows: usize,
    lossy_utf8: bool,
    frame_path: String,
) -> Result<()> {
    let column_types = ColumnType::parse_list(&types)?;
    let column_names = column_names(names.as_deref(), column_types.len())?;
    let frame = read_frame(&frame_path)?;
    let options = FrameReaderOptions::new().with_lossy_utf8(lossy_utf8);

    for line in head_rows(&frame, &column_names, &column_types, rows, options) {
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

fn column_names(names: Option<&str>, count: usize) -> Result<Vec<String>> {
    let Some(names) = names else {
        return Ok((0..count).map(|i| format!("c{i}")).collect());
    };
    let names = names
        .split(',')
        .map(|name| name.trim().to_string())
        .collect::<Vec<_>>();
    if names.len() != count {
        bail!(
            "{} column names given for {} column types",
            names.len(),
            count
        );
    }
    Ok(names)
}

/// Decodes up to `limit` rows into JSON objects keyed by column name.
///
/// A cell that cannot be decoded is rendered as `{"error": "<message>"}`, so one
/// unreadable column does not hide the others.
fn head_rows(
    frame: &Frame,
    names: &[String],
    types: &[ColumnType],
    limit: usize,
    options: FrameReaderOptions,
) -> Vec<serde_json::Value> {
    let readers = FrameColumnReaders::new(options)
        .create_all(names.iter().map(String::as_str).zip(types.iter()));

    (0..frame.row_count().min(limit))
        .map(|row| {
            let mut object = serde_json::Map::new();
            for (name, reader) in names.iter().zip(&readers) {
                let cell = match reader.read_value(frame, row) {
                    Ok(value) => value_to_json(&value),
                    Err(e) => serde_json::json!({ "error": e.to_string() }),
                };
                object.insert(name.clone(), cell);
            }
            serde_json::Value::Object(object)
        })
        .collect()
}
