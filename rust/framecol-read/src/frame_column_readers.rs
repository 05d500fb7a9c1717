//! Binding of column readers to logical column types.

use std::sync::LazyLock;

use framecol_format::{ColumnType, ValueType};

use crate::{
    column_reader::{
        ComplexColumnReader, DoubleColumnReader, FloatColumnReader, FrameColumnReader,
        LongColumnReader, StringColumnReader, UnsupportedColumnReader,
    },
    options::FrameReaderOptions,
};

/// Selects the decoder for each column of a frame signature.
///
/// Creation is total and pure: every `(name, ordinal, type)` triple yields a reader,
/// no frame is accessed, and equal inputs yield equivalent readers. Columns of types
/// without a decoder are bound to [`FrameColumnReader::Unsupported`], so the failure
/// surfaces only if the column is read.
#[derive(Debug, Clone, Default)]
pub struct FrameColumnReaders {
    options: FrameReaderOptions,
}

impl FrameColumnReaders {
    pub fn new(options: FrameReaderOptions) -> FrameColumnReaders {
        FrameColumnReaders { options }
    }

    pub fn options(&self) -> &FrameReaderOptions {
        &self.options
    }

    /// Creates the reader for column `column_ordinal` named `column_name`.
    ///
    /// | column type            | reader                                  |
    /// |------------------------|-----------------------------------------|
    /// | `LONG`                 | [`FrameColumnReader::Long`]             |
    /// | `FLOAT`                | [`FrameColumnReader::Float`]            |
    /// | `DOUBLE`               | [`FrameColumnReader::Double`]           |
    /// | `STRING`               | [`FrameColumnReader::String`], scalar   |
    /// | `COMPLEX`, `COMPLEX<n>`| [`FrameColumnReader::Complex`]          |
    /// | `ARRAY<STRING>`        | [`FrameColumnReader::String`], array    |
    /// | any other array        | [`FrameColumnReader::Unsupported`]      |
    /// | unknown                | [`FrameColumnReader::Unsupported`]      |
    pub fn create(
        &self,
        column_name: &str,
        column_ordinal: usize,
        column_type: &ColumnType,
    ) -> FrameColumnReader {
        match column_type.value_type() {
            ValueType::Long => FrameColumnReader::Long(LongColumnReader::new(column_ordinal)),
            ValueType::Float => FrameColumnReader::Float(FloatColumnReader::new(column_ordinal)),
            ValueType::Double => {
                FrameColumnReader::Double(DoubleColumnReader::new(column_ordinal))
            }
            ValueType::String => FrameColumnReader::String(
                StringColumnReader::new(column_ordinal, false)
                    .with_lossy_utf8(self.options.lossy_utf8()),
            ),
            ValueType::Complex => FrameColumnReader::Complex(ComplexColumnReader::new(
                column_ordinal,
                column_type.complex_type_name().map(str::to_string),
                self.options.complex_types().clone(),
            )),
            ValueType::Array
                if column_type
                    .element_type()
                    .is_some_and(|t| *t.value_type() == ValueType::String) =>
            {
                FrameColumnReader::String(
                    StringColumnReader::new(column_ordinal, true)
                        .with_lossy_utf8(self.options.lossy_utf8()),
                )
            }
            ValueType::Array | ValueType::Unknown(_) => {
                log::debug!(
                    "column '{column_name}' (#{column_ordinal}) of type {column_type} \
                     has no decoder; reads will fail"
                );
                FrameColumnReader::Unsupported(UnsupportedColumnReader::new(
                    column_name,
                    column_type.clone(),
                ))
            }
        }
    }

    /// Creates one reader per column of a frame signature, bound to consecutive
    /// ordinals.
    pub fn create_all<'a>(
        &self,
        columns: impl IntoIterator<Item = (&'a str, &'a ColumnType)>,
    ) -> Vec<FrameColumnReader> {
        columns
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, column_type))| self.create(name, ordinal, column_type))
            .collect()
    }
}

static DEFAULT_READERS: LazyLock<FrameColumnReaders> = LazyLock::new(FrameColumnReaders::default);

/// Creates a reader with the default [`FrameReaderOptions`].
///
/// See [`FrameColumnReaders::create`].
pub fn create(column_name: &str, column_ordinal: usize, column_type: &ColumnType) -> FrameColumnReader {
    DEFAULT_READERS.create(column_name, column_ordinal, column_type)
}
