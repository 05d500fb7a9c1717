//! A collection of offsets for variable-length data.

use std::ops::Range;

/// Monotonically non-decreasing offsets, where each pair of adjacent offsets defines
/// the range of a single item. The leading `0` is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offsets(Vec<u64>);

impl Offsets {
    /// Creates a new empty `Offsets` collection holding the single leading offset.
    pub fn new() -> Offsets {
        Self::with_capacity(0)
    }

    /// Creates a new `Offsets` collection with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Offsets {
        let mut buf = Vec::with_capacity(capacity + 1);
        buf.push(0u64);
        Offsets(buf)
    }

    /// Returns the number of items represented by these offsets.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.0.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Returns the last offset, which marks the end of the last item.
    #[inline]
    pub fn last(&self) -> u64 {
        self.0[self.0.len() - 1]
    }

    /// Returns the range of the item at `index`.
    #[inline]
    pub fn range_at(&self, index: usize) -> Range<usize> {
        self.0[index] as usize..self.0[index + 1] as usize
    }

    /// Adds a new item of length `len`.
    #[inline]
    pub fn push_length(&mut self, len: usize) {
        let last = self.last();
        self.0.push(last + len as u64);
    }

    /// Adds an empty item.
    #[inline]
    pub fn push_empty(&mut self) {
        self.push_length(0);
    }

    /// Removes all items, keeping the leading offset.
    pub fn clear(&mut self) {
        self.0.truncate(1);
    }
}

impl Default for Offsets {
    fn default() -> Self {
        Self::new()
    }
}
