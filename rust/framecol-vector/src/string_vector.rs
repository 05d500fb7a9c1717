//! Destination vectors for string and multi-value string columns.

use crate::{offsets::Offsets, presence::Presence, value::Value};

/// A reusable batch of nullable strings stored in a single byte pool.
#[derive(Debug, Clone, Default)]
pub struct StringVector {
    offsets: Offsets,
    data: Vec<u8>,
    presence: Presence,
}

impl StringVector {
    pub fn new() -> StringVector {
        StringVector::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.item_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
        self.data.clear();
        self.presence.clear();
    }

    #[inline]
    pub fn push_str(&mut self, value: &str) {
        self.data.extend_from_slice(value.as_bytes());
        self.offsets.push_length(value.len());
        self.presence.push_non_null();
    }

    #[inline]
    pub fn push_null(&mut self) {
        self.offsets.push_empty();
        self.presence.push_null();
    }

    #[inline]
    pub fn push(&mut self, value: Option<&str>) {
        match value {
            Some(s) => self.push_str(s),
            None => self.push_null(),
        }
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn offsets(&self) -> &Offsets {
        &self.offsets
    }

    /// Returns the string at `index`, `None` for a null slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Option<&str> {
        if self.presence.is_null(index) {
            return None;
        }
        // Only `&str` values are ever appended to the pool.
        std::str::from_utf8(&self.data[self.offsets.range_at(index)]).ok()
    }

    pub fn value_at(&self, index: usize) -> Value {
        Value::from_opt_str(self.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

/// A reusable batch of nullable string lists.
///
/// Each row is either null or a (possibly empty) list of nullable strings. Elements of
/// all rows share one [`StringVector`].
///
/// A vector created with [`StringArrayVector::with_scalar_rows`] holds the rows of a
/// `STRING` column that may carry several values per row: [`value_at`] reports an
/// empty row as null, a one-element row as that element, and only longer rows as
/// arrays.
///
/// [`value_at`]: StringArrayVector::value_at
#[derive(Debug, Clone, Default)]
pub struct StringArrayVector {
    row_offsets: Offsets,
    presence: Presence,
    elements: StringVector,
    scalar_rows: bool,
}

impl StringArrayVector {
    pub fn new() -> StringArrayVector {
        StringArrayVector::default()
    }

    pub fn with_scalar_rows() -> StringArrayVector {
        StringArrayVector {
            scalar_rows: true,
            ..Default::default()
        }
    }

    /// Returns `true` if rows with at most one element read as scalars.
    #[inline]
    pub fn has_scalar_rows(&self) -> bool {
        self.scalar_rows
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.row_offsets.item_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_offsets.is_empty()
    }

    pub fn clear(&mut self) {
        self.row_offsets.clear();
        self.presence.clear();
        self.elements.clear();
    }

    /// Appends an element to the row under construction.
    #[inline]
    pub fn push_element(&mut self, value: Option<&str>) {
        self.elements.push(value);
    }

    /// Completes the row under construction, consisting of all elements appended
    /// since the previous row was completed.
    #[inline]
    pub fn finish_row(&mut self) {
        let count = self.elements.len() - self.row_offsets.last() as usize;
        self.row_offsets.push_length(count);
        self.presence.push_non_null();
    }

    /// Appends a null row.
    #[inline]
    pub fn push_null_row(&mut self) {
        debug_assert_eq!(self.elements.len(), self.row_offsets.last() as usize);
        self.row_offsets.push_empty();
        self.presence.push_null();
    }

    /// Appends a complete row.
    pub fn push_row<'a>(&mut self, values: impl IntoIterator<Item = Option<&'a str>>) {
        for value in values {
            self.push_element(value);
        }
        self.finish_row();
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn elements(&self) -> &StringVector {
        &self.elements
    }

    /// Returns the elements of row `index`, `None` for a null row.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn row(&self, index: usize) -> Option<Vec<Option<&str>>> {
        if self.presence.is_null(index) {
            return None;
        }
        Some(
            self.row_offsets
                .range_at(index)
                .map(|i| self.elements.get(i))
                .collect(),
        )
    }

    pub fn value_at(&self, index: usize) -> Value {
        match self.row(index) {
            Some(elements) if self.scalar_rows && elements.len() <= 1 => {
                Value::from_opt_str(elements.first().copied().flatten())
            }
            Some(elements) => {
                Value::Array(elements.into_iter().map(Value::from_opt_str).collect())
            }
            None => Value::Null,
        }
    }
}
