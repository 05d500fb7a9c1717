//! Destination vector for fixed-width numeric columns.

use crate::{presence::Presence, value::Value};

/// Element type of a [`NumericVector`].
pub trait NumericElement:
    bytemuck::Pod + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static
{
    /// Wraps the element into the matching [`Value`] variant.
    fn into_value(self) -> Value;
}

impl NumericElement for i64 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Long(self)
    }
}

impl NumericElement for f32 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl NumericElement for f64 {
    #[inline]
    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

/// A reusable batch of nullable fixed-width values.
///
/// Null slots hold `T::default()` in the value buffer, so `values()` always has one
/// entry per row and can be consumed without consulting the presence first.
#[derive(Debug, Clone, Default)]
pub struct NumericVector<T> {
    values: Vec<T>,
    presence: Presence,
}

impl<T: NumericElement> NumericVector<T> {
    pub fn new() -> NumericVector<T> {
        NumericVector {
            values: Vec::new(),
            presence: Presence::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> NumericVector<T> {
        NumericVector {
            values: Vec::with_capacity(capacity),
            presence: Presence::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.presence.clear();
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    #[inline]
    pub fn push_value(&mut self, value: T) {
        self.values.push(value);
        self.presence.push_non_null();
    }

    #[inline]
    pub fn push_null(&mut self) {
        self.values.push(T::default());
        self.presence.push_null();
    }

    #[inline]
    pub fn push(&mut self, value: Option<T>) {
        match value {
            Some(value) => self.push_value(value),
            None => self.push_null(),
        }
    }

    /// Appends non-null values in bulk.
    pub fn extend_from_slice(&mut self, values: &[T]) {
        self.values.extend_from_slice(values);
        self.presence.extend_with_non_nulls(values.len());
    }

    /// Returns the value at `index`, `None` for a null slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        let value = self.values[index];
        self.presence.is_valid(index).then_some(value)
    }

    pub fn value_at(&self, index: usize) -> Value {
        self.get(index).map_or(Value::Null, T::into_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_vector_push_and_get() {
        let mut v = NumericVector::<i64>::new();
        v.push_value(7);
        v.push_null();
        v.extend_from_slice(&[1, 2]);
        assert_eq!(v.len(), 4);
        assert_eq!(v.values(), &[7, 0, 1, 2]);
        assert_eq!(v.get(0), Some(7));
        assert_eq!(v.get(1), None);
        assert_eq!(v.value_at(1), Value::Null);
        assert_eq!(v.value_at(3), Value::Long(2));
        assert_eq!(v.presence().count_nulls(), 1);

        v.clear();
        assert!(v.is_empty());
        assert!(v.presence().is_empty());
    }

    #[test]
    fn test_float_vector_values() {
        let mut v = NumericVector::<f32>::with_capacity(2);
        v.push(Some(1.5));
        v.push(None);
        assert_eq!(v.value_at(0), Value::Float(1.5));
        assert!(v.value_at(1).is_null());
    }
}
