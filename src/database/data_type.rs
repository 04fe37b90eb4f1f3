use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared element type of a column or the checked type of an expression.
///
/// Null is not a storage type of its own: any column may hold null values
/// regardless of its declared type. `DataType::Null` only appears as the type
/// of the `NULL` literal and of columns whose values were all null when the
/// type was inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Type of the bare `NULL` literal
    Null,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    String,
}

impl DataType {
    /// Classify a raw cell value. Arrays and objects have no column type.
    pub fn of_value(v: &Value) -> Option<DataType> {
        match v {
            Value::Null => Some(DataType::Null),
            Value::Bool(_) => Some(DataType::Bool),
            Value::Number(n) => {
                if n.is_i64() {
                    Some(DataType::Int)
                } else {
                    Some(DataType::Float)
                }
            }
            Value::String(_) => Some(DataType::String),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Promote two types to a common representative.
    ///
    /// `Int` + `Float` -> `Float`, `Null` yields to the other side. Returns
    /// `None` when the two types have nothing in common.
    pub fn promote(a: DataType, b: DataType) -> Option<DataType> {
        use DataType::*;
        match (a, b) {
            (x, y) if x == y => Some(x),
            (Null, y) => Some(y),
            (x, Null) => Some(x),
            (Int, Float) | (Float, Int) => Some(Float),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Numeric operand check that also admits the `NULL` literal.
    pub fn is_numeric_or_null(self) -> bool {
        matches!(self, DataType::Int | DataType::Float | DataType::Null)
    }

    pub fn is_bool_or_null(self) -> bool {
        matches!(self, DataType::Bool | DataType::Null)
    }

    /// Whether two values of these types can be compared with `=`, `<`, ...
    pub fn comparable(a: DataType, b: DataType) -> bool {
        Self::promote(a, b).is_some()
    }

    /// Whether a raw value may be stored in a column of this type.
    pub fn conforms(self, v: &Value) -> bool {
        match (self, v) {
            (_, Value::Null) => true,
            (DataType::Bool, Value::Bool(_)) => true,
            (DataType::Int, Value::Number(n)) => n.is_i64(),
            (DataType::Float, Value::Number(_)) => true,
            (DataType::String, Value::String(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Null => "NULL",
            DataType::Bool => "BOOLEAN",
            DataType::Int => "INTEGER",
            DataType::Float => "FLOAT",
            DataType::String => "STRING",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn of_value_classifies_numbers_by_representation() {
        assert_eq!(DataType::of_value(&json!(3)), Some(DataType::Int));
        assert_eq!(DataType::of_value(&json!(3.5)), Some(DataType::Float));
        assert_eq!(DataType::of_value(&json!("x")), Some(DataType::String));
        assert_eq!(DataType::of_value(&Value::Null), Some(DataType::Null));
        assert_eq!(DataType::of_value(&json!([1])), None);
    }

    #[test]
    fn promote_int_and_float_to_float() {
        assert_eq!(DataType::promote(DataType::Int, DataType::Float), Some(DataType::Float));
        assert_eq!(DataType::promote(DataType::Null, DataType::String), Some(DataType::String));
        assert_eq!(DataType::promote(DataType::Bool, DataType::Int), None);
    }

    #[test]
    fn conforms_accepts_null_everywhere() {
        assert!(DataType::Int.conforms(&Value::Null));
        assert!(DataType::Int.conforms(&json!(4)));
        assert!(!DataType::Int.conforms(&json!(4.5)));
        assert!(DataType::Float.conforms(&json!(4)));
        assert!(!DataType::String.conforms(&json!(true)));
    }
}
