//! Scalar values returned by positional column reads.

use std::{any::Any, fmt, sync::Arc};

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Typed null marker: the cell exists but holds no value.
    Null,
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// A multi-value cell. Elements are `String` or `Null`.
    Array(Vec<Value>),
    Complex(ComplexValue),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexValue> {
        match self {
            Value::Complex(v) => Some(v),
            _ => None,
        }
    }

    /// Builds a string cell from an optional string.
    pub fn from_opt_str(s: Option<&str>) -> Value {
        s.map_or(Value::Null, |s| Value::String(s.to_string()))
    }
}

/// An object produced by a complex type handler.
///
/// Implemented for every `'static` type that is `Debug + PartialEq + Send + Sync`, so
/// handlers can return their natural Rust representation.
pub trait ComplexObject: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Equality across type-erased objects: `false` when the concrete types differ.
    fn dyn_eq(&self, other: &dyn ComplexObject) -> bool;
}

impl<T> ComplexObject for T
where
    T: Any + Send + Sync + fmt::Debug + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ComplexObject) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// A decoded value of a complex column, tagged with the complex type name.
#[derive(Clone)]
pub struct ComplexValue {
    type_name: Arc<str>,
    object: Arc<dyn ComplexObject>,
}

impl ComplexValue {
    pub fn new(type_name: impl Into<Arc<str>>, object: impl ComplexObject) -> ComplexValue {
        ComplexValue {
            type_name: type_name.into(),
            object: Arc::new(object),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn object(&self) -> &dyn ComplexObject {
        self.object.as_ref()
    }

    /// Returns the decoded object as `T`, if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for ComplexValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.object.dyn_eq(other.object.as_ref())
    }
}

impl fmt::Debug for ComplexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COMPLEX<{}>({:?})", self.type_name, self.object)
    }
}
