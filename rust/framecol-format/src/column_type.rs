//! Logical column types.

use std::{fmt, str::FromStr};

use framecol_common::{Result, error::Error};

/// Base kind of a logical column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Long,
    Float,
    Double,
    String,
    /// Opaque value interpreted by a registered complex type handler.
    Complex,
    /// Multi-value cell; the element kind is carried by [`ColumnType::element_type`].
    Array,
    /// A type name the engine does not recognize. Kept verbatim for diagnostics.
    Unknown(String),
}

impl ValueType {
    /// Returns `true` for the fixed-width numeric kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Long | ValueType::Float | ValueType::Double)
    }

    fn keyword(&self) -> &str {
        match self {
            ValueType::Long => "LONG",
            ValueType::Float => "FLOAT",
            ValueType::Double => "DOUBLE",
            ValueType::String => "STRING",
            ValueType::Complex => "COMPLEX",
            ValueType::Array => "ARRAY",
            ValueType::Unknown(name) => name,
        }
    }
}

/// Logical type of a frame column: a base kind plus, for arrays, the element type
/// and, for complex columns, the registered complex type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnType {
    value_type: ValueType,
    element_type: Option<Box<ColumnType>>,
    complex_type_name: Option<String>,
}

impl ColumnType {
    pub const LONG: ColumnType = ColumnType::scalar(ValueType::Long);
    pub const FLOAT: ColumnType = ColumnType::scalar(ValueType::Float);
    pub const DOUBLE: ColumnType = ColumnType::scalar(ValueType::Double);
    pub const STRING: ColumnType = ColumnType::scalar(ValueType::String);
    /// Complex type without a declared type name.
    pub const COMPLEX: ColumnType = ColumnType::scalar(ValueType::Complex);

    const fn scalar(value_type: ValueType) -> ColumnType {
        ColumnType {
            value_type,
            element_type: None,
            complex_type_name: None,
        }
    }

    /// `ARRAY<element_type>`.
    pub fn array(element_type: ColumnType) -> ColumnType {
        ColumnType {
            value_type: ValueType::Array,
            element_type: Some(Box::new(element_type)),
            complex_type_name: None,
        }
    }

    /// `COMPLEX<type_name>`.
    pub fn complex(type_name: impl Into<String>) -> ColumnType {
        ColumnType {
            value_type: ValueType::Complex,
            element_type: None,
            complex_type_name: Some(type_name.into()),
        }
    }

    /// A type the engine has no base kind for.
    pub fn unknown(name: impl Into<String>) -> ColumnType {
        ColumnType::scalar(ValueType::Unknown(name.into()))
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Element type of an array type, `None` for all other kinds.
    pub fn element_type(&self) -> Option<&ColumnType> {
        self.element_type.as_deref()
    }

    /// Declared complex type name, if any.
    pub fn complex_type_name(&self) -> Option<&str> {
        self.complex_type_name.as_deref()
    }

    pub fn is_array(&self) -> bool {
        self.value_type == ValueType::Array
    }

    /// Parses a comma-separated list of column types, splitting only on commas
    /// that are not nested inside `<...>`.
    pub fn parse_list(s: &str) -> Result<Vec<ColumnType>> {
        let mut types = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, c) in s.char_indices() {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        Error::invalid_arg("column_type", format!("unbalanced '>' in '{s}'"))
                    })?
                }
                ',' if depth == 0 => {
                    types.push(s[start..i].parse()?);
                    start = i + 1;
                }
                _ => (),
            }
        }
        if !s[start..].trim().is_empty() || !types.is_empty() {
            types.push(s[start..].parse()?);
        }
        Ok(types)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value_type, &self.element_type, &self.complex_type_name) {
            (ValueType::Array, Some(element), _) => write!(f, "ARRAY<{element}>"),
            (ValueType::Complex, _, Some(name)) => write!(f, "COMPLEX<{name}>"),
            (value_type, _, _) => f.write_str(value_type.keyword()),
        }
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<ColumnType> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_arg("column_type", "empty type name"));
        }

        let Some(open) = s.find('<') else {
            if s.contains('>') {
                return Err(Error::invalid_arg(
                    "column_type",
                    format!("unbalanced '>' in '{s}'"),
                ));
            }
            return match s.to_ascii_uppercase().as_str() {
                "LONG" => Ok(ColumnType::LONG),
                "FLOAT" => Ok(ColumnType::FLOAT),
                "DOUBLE" => Ok(ColumnType::DOUBLE),
                "STRING" => Ok(ColumnType::STRING),
                "COMPLEX" => Ok(ColumnType::COMPLEX),
                "ARRAY" => Err(Error::invalid_arg(
                    "column_type",
                    "ARRAY requires an element type",
                )),
                _ => Ok(ColumnType::unknown(s)),
            };
        };

        if !s.ends_with('>') {
            return Err(Error::invalid_arg(
                "column_type",
                format!("expected '>' at the end of '{s}'"),
            ));
        }
        let keyword = s[..open].trim();
        let inner = &s[open + 1..s.len() - 1];
        if inner.trim().is_empty() {
            return Err(Error::invalid_arg(
                "column_type",
                format!("empty type parameter in '{s}'"),
            ));
        }
        verify_balanced(inner)?;

        match keyword.to_ascii_uppercase().as_str() {
            "ARRAY" => Ok(ColumnType::array(inner.parse()?)),
            "COMPLEX" => Ok(ColumnType::complex(inner.trim())),
            _ => Ok(ColumnType::unknown(s)),
        }
    }
}

fn verify_balanced(s: &str) -> Result<()> {
    let mut depth = 0i32;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            _ => (),
        }
        if depth < 0 {
            break;
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(Error::invalid_arg(
            "column_type",
            format!("unbalanced '<' '>' in '{s}'"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ColumnType::LONG.to_string(), "LONG");
        assert_eq!(ColumnType::array(ColumnType::STRING).to_string(), "ARRAY<STRING>");
        assert_eq!(
            ColumnType::array(ColumnType::array(ColumnType::DOUBLE)).to_string(),
            "ARRAY<ARRAY<DOUBLE>>"
        );
        assert_eq!(ColumnType::complex("json").to_string(), "COMPLEX<json>");
        assert_eq!(ColumnType::COMPLEX.to_string(), "COMPLEX");
        assert_eq!(ColumnType::unknown("VARIANT").to_string(), "VARIANT");
    }

    #[test]
    fn test_parse_round_trips_display() {
        for name in [
            "LONG",
            "FLOAT",
            "DOUBLE",
            "STRING",
            "COMPLEX",
            "COMPLEX<hyperUnique>",
            "ARRAY<STRING>",
            "ARRAY<LONG>",
            "ARRAY<ARRAY<STRING>>",
        ] {
            let parsed: ColumnType = name.parse().unwrap();
            assert_eq!(parsed.to_string(), name);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive_for_keywords() {
        let t: ColumnType = " array<string> ".parse().unwrap();
        assert_eq!(t, ColumnType::array(ColumnType::STRING));
        let t: ColumnType = "complex<HLL>".parse().unwrap();
        assert_eq!(t.complex_type_name(), Some("HLL"));
    }

    #[test]
    fn test_parse_unknown_keyword() {
        let t: ColumnType = "VARIANT".parse().unwrap();
        assert_eq!(t.value_type(), &ValueType::Unknown("VARIANT".into()));
        let t: ColumnType = "MAP<STRING>".parse().unwrap();
        assert_eq!(t.value_type(), &ValueType::Unknown("MAP<STRING>".into()));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "ARRAY", "ARRAY<>", "ARRAY<STRING", "LONG>", "ARRAY<A<B>", "COMPLEX< >"] {
            assert!(bad.parse::<ColumnType>().is_err(), "'{bad}' should not parse");
        }
    }

    #[test]
    fn test_parse_list() {
        let types = ColumnType::parse_list("LONG, ARRAY<STRING>,COMPLEX<json>").unwrap();
        assert_eq!(
            types,
            vec![
                ColumnType::LONG,
                ColumnType::array(ColumnType::STRING),
                ColumnType::complex("json"),
            ]
        );
        assert!(ColumnType::parse_list("").unwrap().is_empty());
        assert!(ColumnType::parse_list("LONG,").is_err());
        assert!(ColumnType::parse_list("LONG>,STRING").is_err());
    }

    #[test]
    fn test_accessors() {
        let t = ColumnType::array(ColumnType::STRING);
        assert!(t.is_array());
        assert_eq!(t.element_type(), Some(&ColumnType::STRING));
        assert_eq!(ColumnType::LONG.element_type(), None);
        assert!(ColumnType::DOUBLE.value_type().is_numeric());
        assert!(!ColumnType::STRING.value_type().is_numeric());
    }
}
