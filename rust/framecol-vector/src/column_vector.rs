//! The type-erased batch destination accepted by column readers.

use framecol_format::{ColumnType, ValueType};

use crate::{
    complex_vector::ComplexVector,
    numeric_vector::NumericVector,
    string_vector::{StringArrayVector, StringVector},
    value::Value,
};

/// A reusable destination for vectorized batch reads.
///
/// Every batch read clears the vector before writing into it. Readers accept only the
/// variants matching their decoder family and reject others before touching the
/// vector.
#[derive(Debug, Clone)]
pub enum ColumnVector {
    Long(NumericVector<i64>),
    Float(NumericVector<f32>),
    Double(NumericVector<f64>),
    String(StringVector),
    StringArray(StringArrayVector),
    Complex(ComplexVector),
}

impl ColumnVector {
    /// Creates an empty vector suitable for batch reads of a column of `column_type`.
    ///
    /// `STRING` columns get a [`StringArrayVector`] with scalar rows, which also holds
    /// rows carrying several values.
    ///
    /// Returns `None` for types without a decoder.
    pub fn for_type(column_type: &ColumnType) -> Option<ColumnVector> {
        match column_type.value_type() {
            ValueType::Long => Some(ColumnVector::Long(NumericVector::new())),
            ValueType::Float => Some(ColumnVector::Float(NumericVector::new())),
            ValueType::Double => Some(ColumnVector::Double(NumericVector::new())),
            ValueType::String => Some(ColumnVector::StringArray(
                StringArrayVector::with_scalar_rows(),
            )),
            ValueType::Complex => Some(ColumnVector::Complex(ComplexVector::new())),
            ValueType::Array => match column_type.element_type().map(|t| t.value_type()) {
                Some(ValueType::String) => {
                    Some(ColumnVector::StringArray(StringArrayVector::new()))
                }
                _ => None,
            },
            ValueType::Unknown(_) => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ColumnVector::Long(_) => "LONG",
            ColumnVector::Float(_) => "FLOAT",
            ColumnVector::Double(_) => "DOUBLE",
            ColumnVector::String(_) => "STRING",
            ColumnVector::StringArray(v) if v.has_scalar_rows() => "STRING",
            ColumnVector::StringArray(_) => "ARRAY<STRING>",
            ColumnVector::Complex(_) => "COMPLEX",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnVector::Long(v) => v.len(),
            ColumnVector::Float(v) => v.len(),
            ColumnVector::Double(v) => v.len(),
            ColumnVector::String(v) => v.len(),
            ColumnVector::StringArray(v) => v.len(),
            ColumnVector::Complex(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            ColumnVector::Long(v) => v.clear(),
            ColumnVector::Float(v) => v.clear(),
            ColumnVector::Double(v) => v.clear(),
            ColumnVector::String(v) => v.clear(),
            ColumnVector::StringArray(v) => v.clear(),
            ColumnVector::Complex(v) => v.clear(),
        }
    }

    /// Returns the value at `index` as a [`Value`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn value_at(&self, index: usize) -> Value {
        match self {
            ColumnVector::Long(v) => v.value_at(index),
            ColumnVector::Float(v) => v.value_at(index),
            ColumnVector::Double(v) => v.value_at(index),
            ColumnVector::String(v) => v.value_at(index),
            ColumnVector::StringArray(v) => v.value_at(index),
            ColumnVector::Complex(v) => v.value_at(index),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(|i| self.value_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_type() {
        let cases = [
            (ColumnType::LONG, Some("LONG")),
            (ColumnType::FLOAT, Some("FLOAT")),
            (ColumnType::DOUBLE, Some("DOUBLE")),
            (ColumnType::STRING, Some("STRING")),
            (ColumnType::complex("json"), Some("COMPLEX")),
            (ColumnType::array(ColumnType::STRING), Some("ARRAY<STRING>")),
            (ColumnType::array(ColumnType::LONG), None),
            (ColumnType::unknown("VARIANT"), None),
        ];
        for (column_type, expected) in cases {
            let vector = ColumnVector::for_type(&column_type);
            assert_eq!(vector.as_ref().map(|v| v.kind_name()), expected);
            assert!(vector.is_none_or(|v| v.is_empty()));
        }
    }

    #[test]
    fn test_values_and_clear() {
        let mut v = ColumnVector::Double(NumericVector::new());
        if let ColumnVector::Double(inner) = &mut v {
            inner.push(Some(1.0));
            inner.push(None);
        }
        assert_eq!(
            v.values().collect::<Vec<_>>(),
            vec![Value::Double(1.0), Value::Null]
        );
        v.clear();
        assert!(v.is_empty());
    }
}
