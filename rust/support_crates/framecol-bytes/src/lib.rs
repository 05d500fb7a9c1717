//! Shared immutable byte buffers for frame data, plus bounds-checked
//! little-endian accessors used by the column decoders.

use std::{
    ops::{Bound, Range, RangeBounds},
    sync::Arc,
};

pub mod le;

/// A contiguous, immutable memory region that can be shared with other buffers and across
/// thread boundaries.
///
/// `Bytes` can be sliced and cloned without copying the underlying data.
#[derive(Clone)]
pub struct Bytes {
    buf: Arc<[u8]>,
    range: Range<usize>,
}

impl Bytes {
    /// Creates a new empty `Bytes`.
    #[inline]
    pub fn new() -> Self {
        Bytes {
            buf: Arc::from(Vec::new()),
            range: 0..0,
        }
    }

    /// Returns the length of the `Bytes`.
    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Returns `true` if the `Bytes` is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Creates a new `Bytes` by copying data from a slice.
    pub fn copy_from_slice(data: &[u8]) -> Bytes {
        Bytes::from(data.to_vec())
    }

    /// Creates a new `Bytes` by slicing the current `Bytes` within the given range.
    ///
    /// This operation is zero-copy; it does not allocate new memory.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Bytes {
        let range = self.resolve_range(range);
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "slice {range:?} out of bounds for Bytes of length {}",
            self.len()
        );
        Bytes {
            buf: self.buf.clone(),
            range: self.range.start + range.start..self.range.start + range.end,
        }
    }

    /// Same as [`Bytes::slice`], but returns `None` instead of panicking when the range
    /// does not fit.
    pub fn try_slice(&self, range: Range<usize>) -> Option<Bytes> {
        (range.start <= range.end && range.end <= self.len()).then(|| self.slice(range))
    }

    /// Returns `true` if both instances share the same backing allocation.
    pub fn shares_buffer(&self, other: &Bytes) -> bool {
        Arc::ptr_eq(&self.buf, &other.buf)
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.range.clone()]
    }

    fn resolve_range(&self, range: impl RangeBounds<usize>) -> Range<usize> {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.len(),
        };
        start..end
    }
}

impl std::ops::Deref for Bytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl AsRef<[u8]> for Bytes {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Default for Bytes {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bytes")
            .field("len", &self.len())
            .field("range", &self.range)
            .finish()
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(vec: Vec<u8>) -> Self {
        let len = vec.len();
        Bytes {
            buf: Arc::from(vec),
            range: 0..len,
        }
    }
}

impl From<&[u8]> for Bytes {
    fn from(s: &[u8]) -> Self {
        Self::copy_from_slice(s)
    }
}

impl From<String> for Bytes {
    fn from(s: String) -> Self {
        Self::from(s.into_bytes())
    }
}
