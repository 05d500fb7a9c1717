//! Physical layout constants of columnar frames.
//!
//! Every column region starts with a one-byte [`ColumnTypeCode`]. The remaining
//! layout depends on the code:
//!
//! * numeric (`LONG`, `FLOAT`, `DOUBLE`): `[code][has_nulls]` followed by one cell
//!   per row. A cell is an optional null byte (present iff `has_nulls != 0`)
//!   followed by the little-endian value.
//! * string (`STRING`, `ARRAY<STRING>`): `[code][multi_value]`, then (multi-value only)
//!   one `i32` cumulative value count per row, then one `u32` cumulative byte end
//!   offset per value, then the string pool.
//! * complex: `[code][name_len: u32][name]`, then one `u32` cumulative end offset per
//!   row, then the payloads. Each payload starts with a null byte.
//!
//! All integers are little-endian.

use crate::column_type::ColumnType;

/// Size of the frame header preceding the region end table:
/// type `u8`, total size `u64`, row count `u32`, region count `u32`, permuted `u8`.
pub const FRAME_HEADER_SIZE: usize = 18;

/// Size of one entry of the region end table.
pub const REGION_END_SIZE: usize = 8;

/// Offset of the first numeric cell within a numeric column region.
pub const NUMERIC_DATA_OFFSET: usize = 2;

/// Null indicator value of a numeric cell or complex payload.
pub const NULL_ROW: u8 = 1;

/// Non-null indicator value of a numeric cell or complex payload.
pub const NOT_NULL_ROW: u8 = 0;

/// Offset of the first section following the string column header.
pub const STRING_DATA_OFFSET: usize = 2;

/// The complete encoding of a null string value in the string pool.
/// `0xFF` never occurs in valid UTF-8, so it cannot collide with a real value.
pub const NULL_STRING_MARKER: &[u8] = &[0xFF];

/// Offset of the type name length within a complex column region.
pub const COMPLEX_NAME_LEN_OFFSET: usize = 1;

/// Type code stored in the first byte of every column region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColumnTypeCode {
    Long = 1,
    Float = 2,
    Double = 3,
    String = 4,
    Complex = 5,
    StringArray = 6,
}

impl ColumnTypeCode {
    pub fn from_u8(code: u8) -> Option<ColumnTypeCode> {
        match code {
            1 => Some(ColumnTypeCode::Long),
            2 => Some(ColumnTypeCode::Float),
            3 => Some(ColumnTypeCode::Double),
            4 => Some(ColumnTypeCode::String),
            5 => Some(ColumnTypeCode::Complex),
            6 => Some(ColumnTypeCode::StringArray),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Logical type implied by the code alone. Complex columns carry their type name
    /// in the region itself, so the returned type has no declared name.
    pub fn logical_type(self) -> ColumnType {
        match self {
            ColumnTypeCode::Long => ColumnType::LONG,
            ColumnTypeCode::Float => ColumnType::FLOAT,
            ColumnTypeCode::Double => ColumnType::DOUBLE,
            ColumnTypeCode::String => ColumnType::STRING,
            ColumnTypeCode::Complex => ColumnType::COMPLEX,
            ColumnTypeCode::StringArray => ColumnType::array(ColumnType::STRING),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_code_round_trip() {
        for code in 1..=6u8 {
            let tc = ColumnTypeCode::from_u8(code).unwrap();
            assert_eq!(tc.as_u8(), code);
        }
        assert_eq!(ColumnTypeCode::from_u8(0), None);
        assert_eq!(ColumnTypeCode::from_u8(7), None);
    }

    #[test]
    fn test_logical_type() {
        assert_eq!(
            ColumnTypeCode::StringArray.logical_type().to_string(),
            "ARRAY<STRING>"
        );
        assert_eq!(ColumnTypeCode::Complex.logical_type().to_string(), "COMPLEX");
    }
}
