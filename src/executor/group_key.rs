use serde_json::Value;

use crate::runtime::KeyValue;

/// Canonical tuple of group-key values. Two rows land in the same group when
/// their keys are equal, with null equal to null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupKey(pub Vec<KeyValue>);

impl GroupKey {
    pub fn from_values(values: &[Value]) -> Self {
        Self(values.iter().map(KeyValue::from_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn keys_with_equal_values_collapse() {
        let mut keys = HashSet::new();
        keys.insert(GroupKey::from_values(&[json!(1), Value::Null]));
        keys.insert(GroupKey::from_values(&[json!(1), Value::Null]));
        keys.insert(GroupKey::from_values(&[json!(1), json!(0)]));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn key_order_matters() {
        assert_ne!(GroupKey::from_values(&[json!(1), json!(2)]), GroupKey::from_values(&[json!(2), json!(1)]));
    }
}
