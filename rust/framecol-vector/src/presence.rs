//! A byte buffer used to encode validity for the values in a vector.

/// Validity of the values in a vector.
///
/// - `Trivial`: all values are valid (non-null), no per-value storage
/// - `Nulls`: all values are null, no per-value storage
/// - `Bytes`: mixed, one byte per value (`1` = present, `0` = null)
#[derive(Debug, Clone)]
pub enum Presence {
    /// All values are valid (present).
    Trivial(usize),

    /// All values are null.
    Nulls(usize),

    /// Presence encoded as byte array, where a byte at position `i` indicates whether
    /// the value at position `i` is valid or not.
    Bytes(Vec<u8>),
}

impl Presence {
    /// Returns the number of values tracked by this presence.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Trivial(len) => *len,
            Self::Nulls(len) => *len,
            Self::Bytes(presence) => presence.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of null values.
    pub fn count_nulls(&self) -> usize {
        match self {
            Self::Trivial(_) => 0,
            Self::Nulls(len) => *len,
            Self::Bytes(presence) => presence.iter().filter(|&&b| b == 0).count(),
        }
    }

    /// Returns `true` if the value at the specified index is null.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds for the `Bytes` representation.
    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        match self {
            Self::Trivial(_) => false,
            Self::Nulls(_) => true,
            Self::Bytes(presence) => presence[index] == 0,
        }
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        !self.is_null(index)
    }

    /// Appends a single value slot.
    #[inline]
    pub fn push(&mut self, valid: bool) {
        if valid {
            self.push_non_null()
        } else {
            self.push_null()
        }
    }

    pub fn push_null(&mut self) {
        match self {
            Presence::Trivial(0) => *self = Presence::Nulls(1),
            Presence::Trivial(_) => {
                self.convert_to_bytes(self.len() + 1);
                self.push_null();
            }
            Presence::Nulls(len) => *len += 1,
            Presence::Bytes(presence) => presence.push(0),
        }
    }

    pub fn push_non_null(&mut self) {
        match self {
            Presence::Trivial(len) => *len += 1,
            Presence::Nulls(0) => *self = Presence::Trivial(1),
            Presence::Nulls(_) => {
                self.convert_to_bytes(self.len() + 1);
                self.push_non_null();
            }
            Presence::Bytes(presence) => presence.push(1),
        }
    }

    /// Extends this presence with the specified number of null values.
    pub fn extend_with_nulls(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if self.is_empty() {
            *self = Self::Nulls(count);
            return;
        }
        match self {
            Self::Nulls(len) => *len += count,
            _ => {
                self.convert_to_bytes(self.len() + count);
                if let Self::Bytes(presence) = self {
                    presence.resize(presence.len() + count, 0);
                }
            }
        }
    }

    /// Extends this presence with the specified number of non-null values.
    pub fn extend_with_non_nulls(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if self.is_empty() {
            *self = Self::Trivial(count);
            return;
        }
        match self {
            Self::Trivial(len) => *len += count,
            _ => {
                self.convert_to_bytes(self.len() + count);
                if let Self::Bytes(presence) = self {
                    presence.resize(presence.len() + count, 1);
                }
            }
        }
    }

    /// Removes all values, keeping any allocated byte storage for reuse.
    pub fn clear(&mut self) {
        match self {
            Self::Bytes(presence) => presence.clear(),
            _ => *self = Self::Trivial(0),
        }
    }

    fn convert_to_bytes(&mut self, capacity: usize) {
        match std::mem::take(self) {
            Self::Trivial(len) => {
                let mut presence = Vec::with_capacity(len.max(capacity));
                presence.resize(len, 1);
                *self = Self::Bytes(presence);
            }
            Self::Nulls(len) => {
                let mut presence = Vec::with_capacity(len.max(capacity));
                presence.resize(len, 0);
                *self = Self::Bytes(presence);
            }
            bytes @ Self::Bytes(_) => *self = bytes,
        }
    }
}

impl PartialEq for Presence {
    /// Compares logical validity, regardless of the representation.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && (0..self.len()).all(|i| self.is_null(i) == other.is_null(i))
    }
}

impl Default for Presence {
    fn default() -> Self {
        Presence::Trivial(0)
    }
}
