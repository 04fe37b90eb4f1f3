use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::database::DataType;

pub fn int_value(i: i64) -> Value {
    Value::Number(Number::from(i))
}

/// NaN and infinities have no JSON representation and become null.
pub fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

pub fn as_i64(v: &Value) -> Option<i64> {
    v.as_i64()
}

pub fn as_f64(v: &Value) -> Option<f64> {
    v.as_f64()
}

/// Re-encode a value for a column of type `ty` (ints stored in a FLOAT
/// column become floats). Anything else passes through.
pub fn coerce(value: Value, ty: DataType) -> Value {
    match (&value, ty) {
        (Value::Number(n), DataType::Float) if n.is_i64() || n.is_u64() => {
            n.as_f64().map(float_value).unwrap_or(value)
        }
        _ => value,
    }
}

/// Total order between two non-null values of comparable types, `None` when
/// either side is null or the types differ.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Three-valued equality: `None` when either side is null.
pub fn values_equal(a: &Value, b: &Value) -> Option<bool> {
    if a.is_null() || b.is_null() {
        return None;
    }
    Some(compare_values(a, b) == Some(Ordering::Equal))
}
