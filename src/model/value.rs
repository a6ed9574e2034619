//! The value tree produced by materialization.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

use crate::model::ApiObject;

/// A materialized JSON value.
///
/// Scalars are carried over untouched from the source document; objects
/// become [`ApiObject`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<ApiValue>),
    Object(ApiObject),
}

impl ApiValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ApiValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ApiValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            ApiValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ApiValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ApiValue]> {
        match self {
            ApiValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ApiObject> {
        match self {
            ApiValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ApiObject> {
        match self {
            ApiValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Consume the value, keeping it only if it is an object.
    pub fn into_object(self) -> Option<ApiObject> {
        match self {
            ApiValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Convert back into plain JSON, dropping kinds and identity.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ApiValue::Null => serde_json::Value::Null,
            ApiValue::Bool(b) => serde_json::Value::Bool(*b),
            ApiValue::Number(n) => serde_json::Value::Number(n.clone()),
            ApiValue::String(s) => serde_json::Value::String(s.clone()),
            ApiValue::List(items) => {
                serde_json::Value::Array(items.iter().map(ApiValue::to_json).collect())
            }
            ApiValue::Object(obj) => serde_json::Value::Object(obj.to_json_map()),
        }
    }
}

impl Serialize for ApiValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ApiValue::Null => serializer.serialize_unit(),
            ApiValue::Bool(b) => serializer.serialize_bool(*b),
            ApiValue::Number(n) => n.serialize(serializer),
            ApiValue::String(s) => serializer.serialize_str(s),
            ApiValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            ApiValue::Object(obj) => obj.serialize(serializer),
        }
    }
}

/// Serializes a value with every object's keys in lexicographic order.
pub(crate) struct SortedKeys<'a>(pub &'a ApiValue);

impl Serialize for SortedKeys<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            ApiValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&SortedKeys(item))?;
                }
                seq.end()
            }
            ApiValue::Object(obj) => {
                let mut entries: Vec<_> = obj.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, &SortedKeys(value))?;
                }
                map.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

impl PartialEq<serde_json::Value> for ApiValue {
    fn eq(&self, other: &serde_json::Value) -> bool {
        match (self, other) {
            (ApiValue::Null, serde_json::Value::Null) => true,
            (ApiValue::Bool(a), serde_json::Value::Bool(b)) => a == b,
            (ApiValue::Number(a), serde_json::Value::Number(b)) => a == b,
            (ApiValue::String(a), serde_json::Value::String(b)) => a == b,
            (ApiValue::List(a), serde_json::Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            (ApiValue::Object(a), serde_json::Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for ApiValue {
    fn from(value: bool) -> Self {
        ApiValue::Bool(value)
    }
}

impl From<i64> for ApiValue {
    fn from(value: i64) -> Self {
        ApiValue::Number(value.into())
    }
}

impl From<i32> for ApiValue {
    fn from(value: i32) -> Self {
        ApiValue::Number(value.into())
    }
}

impl From<u64> for ApiValue {
    fn from(value: u64) -> Self {
        ApiValue::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for ApiValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(ApiValue::Null, ApiValue::Number)
    }
}

impl From<&str> for ApiValue {
    fn from(value: &str) -> Self {
        ApiValue::String(value.to_string())
    }
}

impl From<String> for ApiValue {
    fn from(value: String) -> Self {
        ApiValue::String(value)
    }
}

impl From<ApiObject> for ApiValue {
    fn from(value: ApiObject) -> Self {
        ApiValue::Object(value)
    }
}

impl From<Vec<ApiValue>> for ApiValue {
    fn from(value: Vec<ApiValue>) -> Self {
        ApiValue::List(value)
    }
}
