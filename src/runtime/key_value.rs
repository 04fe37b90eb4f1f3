use ordered_float::OrderedFloat;
use serde_json::Value;

/// Hashable image of a raw cell value, used to build group keys and DISTINCT
/// sets. Null equals null here; integral floats hash like the matching int.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
}

impl KeyValue {
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Null => KeyValue::Null,
            Value::Bool(b) => KeyValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => KeyValue::Int(i),
                None => {
                    let f = n.as_f64().unwrap_or(f64::NAN);
                    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                        KeyValue::Int(f as i64)
                    } else {
                        KeyValue::Float(OrderedFloat(f))
                    }
                }
            },
            Value::String(s) => KeyValue::String(s.clone()),
            // never produced by a typed column; serialized so the key stays total
            other => KeyValue::String(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_is_equal_to_null() {
        assert_eq!(KeyValue::from_value(&Value::Null), KeyValue::from_value(&Value::Null));
    }

    #[test]
    fn integral_floats_match_ints() {
        assert_eq!(KeyValue::from_value(&json!(2.0)), KeyValue::Int(2));
        assert_eq!(KeyValue::from_value(&json!(2.5)), KeyValue::Float(OrderedFloat(2.5)));
        assert_ne!(KeyValue::from_value(&json!("2")), KeyValue::Int(2));
    }
}
