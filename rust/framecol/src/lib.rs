//! # framecol: column readers for columnar frames
//!
//! A frame is a self-describing binary batch of rows laid out column by column: a
//! header with the row count, a table of per-column byte regions, and the regions
//! themselves. Query engines exchange frames between operators and read them back
//! column by column.
//!
//! This crate re-exports the framecol components through a single dependency.
//!
//! ## Module Organization
//!
//! * [`common`] - Error type and result alias shared by all components
//! * [`format`] - Logical column types, frame layout constants and the [`format::Frame`]
//!   container
//! * [`vector`] - Decoded values and reusable batch destinations
//! * [`read`] - The type dispatcher binding a reader to each column, and the readers
//!   themselves
//!
//! ### Support Modules
//!
//! * [`support::bytes`] - Shared byte buffers and little-endian decoding helpers
//!
//! ## Reading a column
//!
//! ```
//! use framecol::format::{ColumnType, Frame};
//! use framecol::read::{ColumnReader, create};
//! use framecol::support::bytes::Bytes;
//! use framecol::vector::Value;
//!
//! // A single LONG column without null indicators, holding one row.
//! let mut region = vec![1u8, 0];
//! region.extend_from_slice(&42i64.to_le_bytes());
//! let len = region.len();
//! let frame = Frame::from_parts(Bytes::from(region), 1, vec![0..len])?;
//!
//! let reader = create("answer", 0, &ColumnType::LONG);
//! assert_eq!(reader.read_value(&frame, 0)?, Value::Long(42));
//!
//! // Binding a column of an unknown type succeeds; reading it does not.
//! let shape = create("shape", 0, &"GEOMETRY".parse()?);
//! assert!(shape.read_value(&frame, 0).unwrap_err().is_unsupported_column_type());
//! # Ok::<(), framecol::common::error::Error>(())
//! ```

pub use framecol_common as common;
pub use framecol_format as format;
pub use framecol_read as read;
pub use framecol_vector as vector;

pub mod support {
    pub use framecol_bytes as bytes;
}
