use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns `true` if this is the deferred failure of a column whose logical
    /// type has no decoder.
    pub fn is_unsupported_column_type(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnsupportedColumnType { .. })
    }

    pub fn unsupported_column_type(
        column: impl Into<String>,
        column_type: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::UnsupportedColumnType {
                column: column.into(),
                column_type: column_type.into(),
            }
            .into(),
        )
    }

    pub fn row_out_of_range(column: usize, row: usize, row_count: usize) -> Error {
        Error(
            ErrorKind::RowOutOfRange {
                column,
                row,
                row_count,
            }
            .into(),
        )
    }

    pub fn malformed(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn unknown_complex_type(type_name: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnknownComplexType {
                type_name: type_name.into(),
            }
            .into(),
        )
    }

    pub fn not_implemented(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::NotImplemented {
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn complex_decode<E>(type_name: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::ComplexDecode {
                type_name: type_name.into(),
                source: Box::new(source),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("unsupported column type for column '{column}': {column_type}")]
    UnsupportedColumnType { column: String, column_type: String },

    #[error("row {row} is out of range for column #{column} with {row_count} rows")]
    RowOutOfRange {
        column: usize,
        row: usize,
        row_count: usize,
    },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid frame format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("no handler registered for complex type '{type_name}'")]
    UnknownComplexType { type_name: String },

    #[error("failed to decode complex value of type '{type_name}': {source}")]
    ComplexDecode {
        type_name: String,
        source: StdErrorBoxed,
    },

    #[error("not yet implemented: {message}")]
    NotImplemented { message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
