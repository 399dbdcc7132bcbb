//! Conversions between [`Value`] and [`serde_json::Value`].

use crate::{InputKindError, Mapping, Value};
use serde_json::Number;

impl TryFrom<serde_json::Value> for Value {
    type Error = InputKindError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        let val = match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => number_from_json(&n)?,
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(arr) => Value::Sequence(
                arr.into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            serde_json::Value::Object(obj) => Value::Mapping(
                obj.into_iter()
                    .map(|(k, v)| Ok((k, Value::try_from(v)?)))
                    .collect::<Result<Mapping, InputKindError>>()?,
            ),
        };
        Ok(val)
    }
}

fn number_from_json(n: &Number) -> Result<Value, InputKindError> {
    if let Some(u) = n.as_u64() {
        Ok(Value::Number(u))
    } else if let Some(i) = n.as_i64() {
        Value::try_from(i)
    } else {
        match n.as_f64() {
            Some(f) => Value::try_from(f),
            None => Err(InputKindError::NonIntegralNumber(n.to_string())),
        }
    }
}

/// `Absent` becomes `null`; `Binary` becomes an array of byte numbers.
impl From<Value> for serde_json::Value {
    fn from(val: Value) -> Self {
        match val {
            Value::Absent | Value::Null => serde_json::Value::Null,
            Value::Text(s) => serde_json::Value::String(s),
            Value::Number(n) => serde_json::Value::Number(n.into()),
            Value::Boolean(b) => serde_json::Value::Bool(b),
            Value::Binary(b) => {
                serde_json::Value::Array(b.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Mapping(m) => serde_json::Value::Object(
                m.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Sequence(s) => {
                serde_json::Value::Array(s.into_iter().map(serde_json::Value::from).collect())
            }
        }
    }
}
