// src/sanitize/value.rs

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

/// The closed set of shapes the sanitizer walks.
///
/// `Absent` models a field that was never supplied, which JSON itself cannot
/// express. Everything that is not text or a container is passed through
/// untouched by the walk.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Sequence(Vec<InputValue>),
    Mapping(BTreeMap<String, InputValue>),
}

impl InputValue {
    /// Converts back into JSON.
    ///
    /// Returns `None` for `Absent`; absent mapping members are dropped, the
    /// same way an undefined property disappears on serialization. An absent
    /// sequence element becomes `null` so positions are preserved.
    pub fn into_json(self) -> Option<Value> {
        match self {
            InputValue::Absent => None,
            InputValue::Null => Some(Value::Null),
            InputValue::Bool(b) => Some(Value::Bool(b)),
            InputValue::Number(n) => Some(Value::Number(n)),
            InputValue::Text(s) => Some(Value::String(s)),
            InputValue::Sequence(items) => Some(Value::Array(
                items
                    .into_iter()
                    .map(|item| item.into_json().unwrap_or(Value::Null))
                    .collect(),
            )),
            InputValue::Mapping(entries) => {
                let mut map = Map::new();
                for (key, val) in entries {
                    if let Some(json) = val.into_json() {
                        map.insert(key, json);
                    }
                }
                Some(Value::Object(map))
            }
        }
    }
}

impl From<Value> for InputValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => InputValue::Null,
            Value::Bool(b) => InputValue::Bool(b),
            Value::Number(n) => InputValue::Number(n),
            Value::String(s) => InputValue::Text(s),
            Value::Array(items) => {
                InputValue::Sequence(items.into_iter().map(InputValue::from).collect())
            }
            Value::Object(map) => InputValue::Mapping(
                map.into_iter()
                    .map(|(key, val)| (key, InputValue::from(val)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_owned())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

impl<T: Into<InputValue>> From<Option<T>> for InputValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(InputValue::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_round_trip_keeps_shape() {
        let original = json!({"a": [1, "x", null, true], "b": {"c": "d"}});
        let back = InputValue::from(original.clone()).into_json();
        assert_eq!(back, Some(original));
    }

    #[test]
    fn absent_members_are_dropped() {
        let mut entries = BTreeMap::new();
        entries.insert("kept".to_string(), InputValue::Null);
        entries.insert("gone".to_string(), InputValue::Absent);
        let json = InputValue::Mapping(entries).into_json();
        assert_eq!(json, Some(json!({"kept": null})));
    }

    #[test]
    fn absent_sequence_element_keeps_position() {
        let seq = InputValue::Sequence(vec![InputValue::Absent, "a".into()]);
        assert_eq!(seq.into_json(), Some(json!([null, "a"])));
    }

    #[test]
    fn option_none_is_absent() {
        let missing: Option<&str> = None;
        assert_eq!(InputValue::from(missing), InputValue::Absent);
        assert_eq!(InputValue::from(Some("hi")), InputValue::Text("hi".into()));
    }
}
