//! Destination vector for complex columns.

use crate::value::{ComplexValue, Value};

/// A reusable batch of decoded complex values.
#[derive(Debug, Clone, Default)]
pub struct ComplexVector {
    values: Vec<Option<ComplexValue>>,
}

impl ComplexVector {
    pub fn new() -> ComplexVector {
        ComplexVector::default()
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
    }

    #[inline]
    pub fn push(&mut self, value: Option<ComplexValue>) {
        self.values.push(value);
    }

    pub fn get(&self, index: usize) -> Option<&ComplexValue> {
        self.values[index].as_ref()
    }

    pub fn value_at(&self, index: usize) -> Value {
        self.get(index)
            .map_or(Value::Null, |v| Value::Complex(v.clone()))
    }

    pub fn count_nulls(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}
