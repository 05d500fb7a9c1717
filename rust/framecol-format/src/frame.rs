//! The frame container: a shared byte buffer plus the per-column region table.

use std::{ops::Range, sync::Arc};

use framecol_bytes::{Bytes, le};
use framecol_common::{Result, error::Error, verify_arg, verify_data};

use crate::layout::{FRAME_HEADER_SIZE, REGION_END_SIZE};

/// Physical organization of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// One region per column.
    Columnar,
    /// One region holding row-major records.
    RowBased,
}

impl FrameType {
    pub const COLUMNAR_CODE: u8 = 0x11;
    pub const ROW_BASED_CODE: u8 = 0x12;

    pub fn from_u8(code: u8) -> Option<FrameType> {
        match code {
            Self::COLUMNAR_CODE => Some(FrameType::Columnar),
            Self::ROW_BASED_CODE => Some(FrameType::RowBased),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            FrameType::Columnar => Self::COLUMNAR_CODE,
            FrameType::RowBased => Self::ROW_BASED_CODE,
        }
    }
}

/// An immutable columnar frame.
///
/// The frame owns its bytes through a shared [`Bytes`] buffer; cloning a frame is cheap
/// and never copies data. Region `i` holds the bytes of column `i`. Readers are bound
/// to a column by ordinal and resolve the region through [`Frame::region`] on each
/// access.
#[derive(Debug, Clone)]
pub struct Frame {
    bytes: Bytes,
    row_count: usize,
    regions: Arc<[Range<usize>]>,
}

impl Frame {
    /// Interprets `bytes` as a complete serialized columnar frame.
    ///
    /// Verifies only what is needed to never address memory outside the buffer:
    /// the header fits, the region table fits, and every region lies within the
    /// declared frame size.
    pub fn wrap(bytes: impl Into<Bytes>) -> Result<Frame> {
        let bytes = bytes.into();
        verify_data!(frame_header, bytes.len() >= FRAME_HEADER_SIZE);

        let type_code = bytes[0];
        match FrameType::from_u8(type_code) {
            Some(FrameType::Columnar) => (),
            Some(FrameType::RowBased) => {
                return Err(Error::not_implemented("row-based frames"));
            }
            None => {
                return Err(Error::malformed(
                    "frame_header",
                    format!("unknown frame type code {type_code:#04x}"),
                ));
            }
        }

        let total_size = header_u64(&bytes, 1)?;
        verify_data!(total_size, total_size <= bytes.len() as u64);
        let total_size = total_size as usize;
        let row_count = le::read_u32(&bytes, 9).ok_or_else(truncated_header)? as usize;
        let region_count = le::read_u32(&bytes, 13).ok_or_else(truncated_header)? as usize;
        let permuted = le::read_u8(&bytes, 17).ok_or_else(truncated_header)?;
        if permuted != 0 {
            return Err(Error::not_implemented("permuted frames"));
        }

        let data_start = region_count
            .checked_mul(REGION_END_SIZE)
            .and_then(|len| len.checked_add(FRAME_HEADER_SIZE))
            .filter(|&start| start <= total_size)
            .ok_or_else(|| {
                Error::malformed(
                    "region_table",
                    format!("{region_count} regions do not fit in a frame of {total_size} bytes"),
                )
            })?;

        let mut regions = Vec::with_capacity(region_count);
        let mut start = data_start;
        for i in 0..region_count {
            let end = header_u64(&bytes, FRAME_HEADER_SIZE + i * REGION_END_SIZE)?;
            let end = (end as usize)
                .checked_add(data_start)
                .filter(|&end| end >= start && end <= total_size)
                .ok_or_else(|| {
                    Error::malformed(
                        "region_table",
                        format!("region #{i} end {end} is outside of the frame data"),
                    )
                })?;
            regions.push(start..end);
            start = end;
        }

        log::trace!(
            "wrapped columnar frame: {} bytes, {} rows, {} regions",
            total_size,
            row_count,
            region_count
        );

        Ok(Frame {
            bytes: bytes.slice(..total_size),
            row_count,
            regions: regions.into(),
        })
    }

    /// Builds a frame from a byte buffer and an explicit region table.
    ///
    /// Each range addresses the bytes of the column with the same ordinal.
    pub fn from_parts(bytes: Bytes, row_count: usize, regions: Vec<Range<usize>>) -> Result<Frame> {
        verify_arg!(
            regions,
            regions
                .iter()
                .all(|r| r.start <= r.end && r.end <= bytes.len())
        );
        Ok(Frame {
            bytes,
            row_count,
            regions: regions.into(),
        })
    }

    /// Number of rows in every column of the frame.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of regions (columns) in the frame.
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Returns the byte range of the region relative to [`Frame::bytes`].
    pub fn region_range(&self, ordinal: usize) -> Result<Range<usize>> {
        self.regions.get(ordinal).cloned().ok_or_else(|| {
            Error::invalid_arg(
                "column_ordinal",
                format!(
                    "column #{ordinal} does not exist in a frame with {} columns",
                    self.regions.len()
                ),
            )
        })
    }

    /// Returns the bytes of the region holding column `ordinal`.
    #[inline]
    pub fn region(&self, ordinal: usize) -> Result<&[u8]> {
        let range = self.region_range(ordinal)?;
        Ok(&self.bytes[range])
    }

    /// Returns a shared, zero-copy handle on the region holding column `ordinal`.
    pub fn region_bytes(&self, ordinal: usize) -> Result<Bytes> {
        let range = self.region_range(ordinal)?;
        Ok(self.bytes.slice(range))
    }

    /// The complete frame buffer.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

fn header_u64(bytes: &[u8], offset: usize) -> Result<u64> {
    le::read_u64(bytes, offset).ok_or_else(truncated_header)
}

#[cold]
fn truncated_header() -> Error {
    Error::malformed("frame_header", "truncated frame header")
}
