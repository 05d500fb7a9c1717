//! Column readers for columnar frames.
//!
//! Given a column's name, ordinal and logical [`ColumnType`](framecol_format::ColumnType),
//! [`FrameColumnReaders::create`] binds a [`FrameColumnReader`] able to decode that
//! column from any frame sharing the same signature. Binding never fails and never
//! touches frame memory: a column whose type has no decoder gets the
//! [`Unsupported`](FrameColumnReader::Unsupported) reader, which reports
//! [`ErrorKind::UnsupportedColumnType`](framecol_common::error::ErrorKind::UnsupportedColumnType)
//! only when the column is actually read. Queries that never touch such a column
//! proceed normally.
//!
//! # Main Components
//!
//! - [`FrameColumnReaders`]: the type dispatcher, configured by [`FrameReaderOptions`].
//! - [`ColumnReader`]: the reader contract (row count, positional and batch reads).
//! - [`FrameColumnReader`]: the closed set of decoders returned by the dispatcher.
//! - [`ColumnCursor`]: sequential traversal of one column of one frame.
//! - [`ComplexTypeRegistry`]: name-keyed handlers for `COMPLEX<name>` payloads.

pub mod column_reader;
pub mod complex_type;
pub mod cursor;
pub mod frame_column_readers;
pub mod options;

pub use column_reader::{ColumnReader, FrameColumnReader};
pub use complex_type::{ComplexTypeRegistry, ComplexTypeSerde};
pub use cursor::ColumnCursor;
pub use frame_column_readers::{FrameColumnReaders, create};
pub use options::FrameReaderOptions;
