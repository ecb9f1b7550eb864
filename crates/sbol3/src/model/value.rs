//! Storage values and the conversions between them and user-facing types.
//!
//! A [`Value`] is what the graph holds for one `(subject, property)` slot.
//! A [`ValueKind`] describes how a property converts between that storage
//! form and the Rust type callers work with.

use crate::error::PropertyError;
use crate::model::PropertyKind;

/// Data types of stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Uri,
    Text,
    Int,
    Float,
    Bool,
}

impl DataType {
    /// Returns the XSD datatype URI used for literals of this type, or
    /// `None` for URI resources.
    pub fn xsd(self) -> Option<&'static str> {
        match self {
            DataType::Uri => None,
            DataType::Text => Some("http://www.w3.org/2001/XMLSchema#string"),
            DataType::Int => Some("http://www.w3.org/2001/XMLSchema#integer"),
            DataType::Float => Some("http://www.w3.org/2001/XMLSchema#double"),
            DataType::Bool => Some("http://www.w3.org/2001/XMLSchema#boolean"),
        }
    }
}

/// A raw value as stored in the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A resource identifier (URI or local alias).
    Uri(String),
    /// A plain string literal.
    Text(String),
    /// An integer literal.
    Int(i64),
    /// A double literal (NaN not allowed).
    Float(f64),
    /// A boolean literal.
    Bool(bool),
}

impl Value {
    /// Returns the data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Uri(_) => DataType::Uri,
            Value::Text(_) => DataType::Text,
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::Bool(_) => DataType::Bool,
        }
    }

    /// Returns the identifier if this is a URI value.
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Value::Uri(uri) => Some(uri),
            _ => None,
        }
    }

    /// Validates this value on its own.
    ///
    /// Returns an error description if invalid, None if valid.
    pub fn validate(&self) -> Option<&'static str> {
        match self {
            Value::Float(value) if value.is_nan() => Some("NaN is not allowed in Float"),
            Value::Uri(uri) if uri.is_empty() => Some("empty URI"),
            _ => None,
        }
    }
}

/// Conversion between a user-facing type and its stored [`Value`].
///
/// Each property handle is parameterized by one of these kinds.
pub trait ValueKind {
    /// The type callers read and write.
    type User;

    /// The data type every stored value of this kind must have.
    const DATA_TYPE: DataType;

    /// The property kind tag recorded in the owner's property table.
    const KIND: PropertyKind;

    /// Converts a user value to its storage form.
    fn from_user(value: Self::User) -> Value;

    /// Converts a stored value back, failing when its type does not match.
    fn to_user(property: &str, value: &Value) -> Result<Self::User, PropertyError>;
}

fn mismatch(property: &str, expected: DataType, value: &Value) -> PropertyError {
    PropertyError::TypeMismatch {
        property: property.to_string(),
        expected,
        found: value.data_type(),
    }
}

/// Integer properties.
#[derive(Debug, Clone, Copy)]
pub struct IntKind;

impl ValueKind for IntKind {
    type User = i64;
    const DATA_TYPE: DataType = DataType::Int;
    const KIND: PropertyKind = PropertyKind::Scalar(DataType::Int);

    fn from_user(value: i64) -> Value {
        Value::Int(value)
    }

    fn to_user(property: &str, value: &Value) -> Result<i64, PropertyError> {
        match value {
            Value::Int(v) => Ok(*v),
            other => Err(mismatch(property, Self::DATA_TYPE, other)),
        }
    }
}

/// Floating point properties.
#[derive(Debug, Clone, Copy)]
pub struct FloatKind;

impl ValueKind for FloatKind {
    type User = f64;
    const DATA_TYPE: DataType = DataType::Float;
    const KIND: PropertyKind = PropertyKind::Scalar(DataType::Float);

    fn from_user(value: f64) -> Value {
        Value::Float(value)
    }

    fn to_user(property: &str, value: &Value) -> Result<f64, PropertyError> {
        match value {
            Value::Float(v) => Ok(*v),
            other => Err(mismatch(property, Self::DATA_TYPE, other)),
        }
    }
}

/// Boolean properties.
#[derive(Debug, Clone, Copy)]
pub struct BoolKind;

impl ValueKind for BoolKind {
    type User = bool;
    const DATA_TYPE: DataType = DataType::Bool;
    const KIND: PropertyKind = PropertyKind::Scalar(DataType::Bool);

    fn from_user(value: bool) -> Value {
        Value::Bool(value)
    }

    fn to_user(property: &str, value: &Value) -> Result<bool, PropertyError> {
        match value {
            Value::Bool(v) => Ok(*v),
            other => Err(mismatch(property, Self::DATA_TYPE, other)),
        }
    }
}

/// Text properties.
#[derive(Debug, Clone, Copy)]
pub struct TextKind;

impl ValueKind for TextKind {
    type User = String;
    const DATA_TYPE: DataType = DataType::Text;
    const KIND: PropertyKind = PropertyKind::Scalar(DataType::Text);

    fn from_user(value: String) -> Value {
        Value::Text(value)
    }

    fn to_user(property: &str, value: &Value) -> Result<String, PropertyError> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => Err(mismatch(property, Self::DATA_TYPE, other)),
        }
    }
}

/// URI-valued properties that are plain vocabulary terms (roles, types,
/// orientations), not links to other objects.
#[derive(Debug, Clone, Copy)]
pub struct UriKind;

impl ValueKind for UriKind {
    type User = String;
    const DATA_TYPE: DataType = DataType::Uri;
    const KIND: PropertyKind = PropertyKind::Scalar(DataType::Uri);

    fn from_user(value: String) -> Value {
        Value::Uri(value)
    }

    fn to_user(property: &str, value: &Value) -> Result<String, PropertyError> {
        match value {
            Value::Uri(v) => Ok(v.clone()),
            other => Err(mismatch(property, Self::DATA_TYPE, other)),
        }
    }
}

/// Weak links to other objects, stored as their identity.
///
/// `to_user` yields the identity string and never dereferences it; see
/// [`crate::model::reference`] for on-demand resolution.
#[derive(Debug, Clone, Copy)]
pub struct RefKind;

impl ValueKind for RefKind {
    type User = String;
    const DATA_TYPE: DataType = DataType::Uri;
    const KIND: PropertyKind = PropertyKind::Referenced;

    fn from_user(value: String) -> Value {
        Value::Uri(value)
    }

    fn to_user(property: &str, value: &Value) -> Result<String, PropertyError> {
        match value {
            Value::Uri(v) => Ok(v.clone()),
            other => Err(mismatch(property, Self::DATA_TYPE, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_validation() {
        assert!(Value::Float(f64::NAN).validate().is_some());
        assert!(Value::Float(f64::INFINITY).validate().is_none());
        assert!(Value::Uri(String::new()).validate().is_some());
        assert!(Value::Text(String::new()).validate().is_none());
    }

    #[test]
    fn test_int_kind_rejects_text() {
        let err = IntKind::to_user("urn:p", &Value::Text("5".to_string())).unwrap_err();
        assert_eq!(
            err,
            PropertyError::TypeMismatch {
                property: "urn:p".to_string(),
                expected: DataType::Int,
                found: DataType::Text,
            }
        );
        assert_eq!(IntKind::to_user("urn:p", &Value::Int(5)).unwrap(), 5);
    }

    #[test]
    fn test_float_kind_rejects_int() {
        assert!(FloatKind::to_user("urn:p", &Value::Int(2)).is_err());
        assert_eq!(FloatKind::to_user("urn:p", &Value::Float(2.5)).unwrap(), 2.5);
    }

    #[test]
    fn test_reference_kind_is_tagged_referenced() {
        assert_eq!(RefKind::KIND, PropertyKind::Referenced);
        assert_eq!(UriKind::KIND, PropertyKind::Scalar(DataType::Uri));
        assert_eq!(
            RefKind::to_user("urn:p", &RefKind::from_user("urn:seq1".to_string())).unwrap(),
            "urn:seq1"
        );
    }
}
