//! The dual-access container behind every API response.

use std::ops::{Index, Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};
use std::sync::Arc;

use indexmap::IndexMap;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use url::Url;

use crate::error::CoinbaseError;
use crate::model::value::SortedKeys;
use crate::model::{ApiValue, ObjectKind};
use crate::rest::CoinbaseClient;

/// Back-reference to the account an object was fetched under.
///
/// The API does not repeat the owning account inside nested resources, so the
/// materializer threads it down from the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRef {
    id: String,
}

impl AccountRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Transport details of the response an object was decoded from.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
}

/// Per-instance metadata that never enters the field map.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    /// Field whose list backs integer and range indexing
    pub paged_key: Option<String>,
    pub response: Option<Arc<ResponseMeta>>,
    pub pagination: Option<Box<ApiObject>>,
    pub warnings: Option<Vec<ApiValue>>,
    /// Kind requested for the items of a list response
    pub item_kind: Option<ObjectKind>,
}

/// Client and account shared by every object of one materialized tree.
#[derive(Clone, Default)]
pub(crate) struct Context {
    pub(crate) client: Option<CoinbaseClient>,
    pub(crate) account: Option<AccountRef>,
}

/// A JSON object returned by the API.
///
/// Fields are reachable both mapping-style ([`item`](Self::item), `obj["key"]`)
/// and attribute-style ([`attr`](Self::attr) and the typed accessors of the
/// models); both read the same storage. Kind, client, parent account and
/// response metadata live outside the field map, so they never take part in
/// equality, iteration or serialization.
#[derive(Clone, Default)]
pub struct ApiObject {
    kind: ObjectKind,
    fields: IndexMap<String, ApiValue>,
    context: Context,
    identity: Identity,
}

impl ApiObject {
    /// Create an empty, detached object of the given kind.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub(crate) fn with_context(kind: ObjectKind, context: Context, identity: Identity) -> Self {
        Self {
            kind,
            fields: IndexMap::new(),
            context,
            identity,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The client used for follow-up requests, if attached.
    pub fn client(&self) -> Option<&CoinbaseClient> {
        self.context.client.as_ref()
    }

    pub(crate) fn require_client(&self) -> Result<&CoinbaseClient, CoinbaseError> {
        self.client().ok_or(CoinbaseError::DetachedObject)
    }

    /// The owning account. An account is its own owner.
    pub fn account(&self) -> Option<AccountRef> {
        if self.kind == ObjectKind::Account {
            if let Some(id) = self.id() {
                return Some(AccountRef::new(id));
            }
        }
        self.context.account.clone()
    }

    pub fn paged_key(&self) -> Option<&str> {
        self.identity.paged_key.as_deref()
    }

    pub fn set_paged_key(&mut self, key: Option<String>) {
        self.identity.paged_key = key;
    }

    pub fn response(&self) -> Option<&ResponseMeta> {
        self.identity.response.as_deref()
    }

    pub fn pagination(&self) -> Option<&ApiObject> {
        self.identity.pagination.as_deref()
    }

    pub fn warnings(&self) -> Option<&[ApiValue]> {
        self.identity.warnings.as_deref()
    }

    pub fn item_kind(&self) -> Option<ObjectKind> {
        self.identity.item_kind
    }

    // Field access

    /// Mapping-style lookup that returns `None` for absent keys.
    pub fn get(&self, key: &str) -> Option<&ApiValue> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ApiValue> {
        self.fields.get_mut(key)
    }

    /// Mapping-style lookup; absent keys give [`CoinbaseError::KeyNotFound`].
    pub fn item(&self, key: &str) -> Result<&ApiValue, CoinbaseError> {
        self.fields
            .get(key)
            .ok_or_else(|| CoinbaseError::KeyNotFound(key.to_string()))
    }

    /// Attribute-style lookup; absent fields give [`CoinbaseError::AttributeNotFound`].
    pub fn attr(&self, name: &str) -> Result<&ApiValue, CoinbaseError> {
        self.fields
            .get(name)
            .ok_or_else(|| CoinbaseError::AttributeNotFound(name.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Set a field. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ApiValue>) -> Option<ApiValue> {
        self.fields.insert(key.into(), value.into())
    }

    /// Remove a field, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<ApiValue> {
        self.fields.shift_remove(key)
    }

    pub fn remove_item(&mut self, key: &str) -> Result<ApiValue, CoinbaseError> {
        self.remove(key)
            .ok_or_else(|| CoinbaseError::KeyNotFound(key.to_string()))
    }

    pub fn remove_attr(&mut self, name: &str) -> Result<ApiValue, CoinbaseError> {
        self.remove(name)
            .ok_or_else(|| CoinbaseError::AttributeNotFound(name.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &ApiValue> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// String value of a field, if it is a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ApiValue::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// The `resource` discriminator sent by the server.
    pub fn resource(&self) -> Option<&str> {
        self.str_field("resource")
    }

    pub fn resource_path(&self) -> Option<&str> {
        self.str_field("resource_path")
    }

    /// Merge the fields of `fresh` into this object.
    ///
    /// Existing keys are overwritten in place and new keys are appended. Kind
    /// and identity of `self` are kept.
    pub fn update(&mut self, fresh: ApiObject) {
        for (key, value) in fresh.fields {
            self.fields.insert(key, value);
        }
    }

    // Paging

    /// The list that backs integer indexing.
    ///
    /// A configured paged key takes precedence; otherwise a `data` list is
    /// used. Returns `None` when neither holds a list.
    pub fn page(&self) -> Option<&[ApiValue]> {
        if let Some(list) = self
            .paged_key()
            .and_then(|key| self.fields.get(key))
            .and_then(ApiValue::as_list)
        {
            return Some(list);
        }
        self.fields.get("data").and_then(ApiValue::as_list)
    }

    /// Checked integer indexing into [`page`](Self::page).
    pub fn paged(&self, index: usize) -> Result<&ApiValue, CoinbaseError> {
        self.page()
            .and_then(|list| list.get(index))
            .ok_or_else(|| CoinbaseError::KeyNotFound(index.to_string()))
    }

    /// Convert every object of the paged list into a typed model.
    pub fn page_as<T>(&self) -> Result<Vec<T>, CoinbaseError>
    where
        T: TryFrom<ApiObject, Error = CoinbaseError>,
    {
        let Some(list) = self.page() else {
            return Ok(Vec::new());
        };
        list.iter()
            .map(|value| match value {
                ApiValue::Object(obj) => T::try_from(obj.clone()),
                _ => Err(CoinbaseError::KeyNotFound("data".to_string())),
            })
            .collect()
    }

    // Serialization

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(self.to_json_map())
    }

    pub(crate) fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }

    pub(crate) fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    /// Re-fetch this object from its `resource_path` and merge the result.
    ///
    /// Returns the freshly fetched object.
    pub async fn refresh(&mut self) -> Result<ApiObject, CoinbaseError> {
        let path = self
            .resource_path()
            .ok_or_else(|| CoinbaseError::AttributeNotFound("resource_path".to_string()))?
            .to_string();
        let client = self.require_client()?.clone();
        let fresh = client
            .get_at_path(&path, self.kind, self.context.account.clone())
            .await?;
        self.update(fresh.clone());
        Ok(fresh)
    }
}

impl Serialize for ApiObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Equality looks at fields only, in any order.
impl PartialEq for ApiObject {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl PartialEq<serde_json::Map<String, serde_json::Value>> for ApiObject {
    fn eq(&self, other: &serde_json::Map<String, serde_json::Value>) -> bool {
        self.fields.len() == other.len()
            && self
                .fields
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| v == o))
    }
}

impl PartialEq<serde_json::Value> for ApiObject {
    fn eq(&self, other: &serde_json::Value) -> bool {
        other.as_object().is_some_and(|map| self == map)
    }
}

impl std::fmt::Debug for ApiObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(self.kind.name())
            .field("fields", &self.fields)
            .field("account", &self.context.account)
            .field("attached", &self.context.client.is_some())
            .finish()
    }
}

/// Pretty JSON with sorted keys.
impl std::fmt::Display for ApiObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = ApiValue::Object(self.clone());
        match serde_json::to_string_pretty(&SortedKeys(&value)) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("(invalid JSON)"),
        }
    }
}

/// Mapping-style indexing.
///
/// # Panics
///
/// Panics if the key is absent, like `HashMap`'s `Index`.
impl Index<&str> for ApiObject {
    type Output = ApiValue;

    fn index(&self, key: &str) -> &ApiValue {
        match self.fields.get(key) {
            Some(value) => value,
            None => panic!("key not found: {key}"),
        }
    }
}

/// Integer indexing into the paged list (see [`ApiObject::page`]).
///
/// # Panics
///
/// Panics if the object is not paged or the index is out of bounds.
impl Index<usize> for ApiObject {
    type Output = ApiValue;

    fn index(&self, index: usize) -> &ApiValue {
        match self.page() {
            Some(list) => &list[index],
            None => panic!("object has no paged list"),
        }
    }
}

macro_rules! impl_range_index {
    ($($range:ty),* $(,)?) => {
        $(
            impl Index<$range> for ApiObject {
                type Output = [ApiValue];

                fn index(&self, range: $range) -> &[ApiValue] {
                    match self.page() {
                        Some(list) => &list[range],
                        None => panic!("object has no paged list"),
                    }
                }
            }
        )*
    };
}

impl_range_index!(
    Range<usize>,
    RangeFrom<usize>,
    RangeTo<usize>,
    RangeInclusive<usize>,
    RangeFull,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ApiObject {
        let mut obj = ApiObject::new(ObjectKind::Account);
        obj.insert("id", "abc");
        obj.insert("name", "wallet");
        obj
    }

    #[test]
    fn test_item_and_attr_errors() {
        let obj = sample();
        assert!(matches!(obj.item("nope"), Err(CoinbaseError::KeyNotFound(k)) if k == "nope"));
        assert!(matches!(obj.attr("nope"), Err(CoinbaseError::AttributeNotFound(k)) if k == "nope"));
        assert!(std::ptr::eq(obj.item("id").unwrap(), obj.attr("id").unwrap()));
    }

    #[test]
    fn test_remove_errors() {
        let mut obj = sample();
        assert!(matches!(obj.remove_item("nope"), Err(CoinbaseError::KeyNotFound(_))));
        assert!(matches!(obj.remove_attr("nope"), Err(CoinbaseError::AttributeNotFound(_))));
        assert_eq!(obj.remove_attr("name").unwrap(), ApiValue::from("wallet"));
        assert!(!obj.contains_key("name"));
    }

    #[test]
    fn test_account_is_own_owner() {
        let obj = sample();
        assert_eq!(obj.account(), Some(AccountRef::new("abc")));

        let generic = ApiObject::new(ObjectKind::Generic);
        assert_eq!(generic.account(), None);
    }

    #[test]
    fn test_equality_ignores_kind_and_order() {
        let mut a = ApiObject::new(ObjectKind::Money);
        a.insert("amount", "1.00");
        a.insert("currency", "USD");

        let mut b = ApiObject::new(ObjectKind::Generic);
        b.insert("currency", "USD");
        b.insert("amount", "1.00");

        assert_eq!(a, b);
        assert_eq!(a, serde_json::json!({"amount": "1.00", "currency": "USD"}));
    }

    #[test]
    fn test_update_keeps_positions() {
        let mut obj = sample();
        let mut fresh = ApiObject::default();
        fresh.insert("name", "renamed");
        fresh.insert("primary", true);
        obj.update(fresh);

        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["id", "name", "primary"]);
        assert_eq!(obj["name"], ApiValue::from("renamed"));
        assert_eq!(obj.kind(), ObjectKind::Account);
    }

    #[test]
    fn test_paged_key_takes_precedence() {
        let mut obj = ApiObject::default();
        obj.insert("data", vec![ApiValue::from(1)]);
        obj.insert("orders", vec![ApiValue::from(7), ApiValue::from(8)]);
        assert_eq!(obj[0], ApiValue::from(1));

        obj.set_paged_key(Some("orders".to_string()));
        assert_eq!(obj[0], ApiValue::from(7));
        assert_eq!(obj[1..], [ApiValue::from(8)]);
    }

    fn materialized(value: serde_json::Value) -> ApiObject {
        match crate::model::Materializer::default().materialize(
            value,
            None,
            crate::model::MaterializeOptions::new(),
        ) {
            ApiValue::Object(obj) => obj,
            other => panic!("expected object, got {other:?}"),
        }
    }

    fn ids(values: impl Iterator<Item = ApiValue>) -> Vec<String> {
        values
            .map(|value| value.as_object().and_then(ApiObject::id).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_data_list_indexing_and_reverse() {
        let obj = materialized(serde_json::json!({
            "data": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        }));

        assert_eq!(obj[0], serde_json::json!({"id": "a"}));
        assert_eq!(
            obj[..],
            [
                serde_json::json!({"id": "a"}),
                serde_json::json!({"id": "b"}),
                serde_json::json!({"id": "c"}),
            ]
        );
        assert_eq!(ids(obj[..].iter().cloned()), ["a", "b", "c"]);
        assert_eq!(ids(obj.page().unwrap().iter().rev().cloned()), ["c", "b", "a"]);
        assert_eq!(ids(obj[1..=2].iter().cloned()), ["b", "c"]);
    }

    #[test]
    fn test_paged_key_indexing_and_reverse() {
        let mut obj = materialized(serde_json::json!({
            "data": [{"id": "ignored"}],
            "items": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        }));
        obj.set_paged_key(Some("items".to_string()));

        assert_eq!(obj[2], serde_json::json!({"id": "c"}));
        assert_eq!(ids(obj[..].iter().cloned()), ["a", "b", "c"]);
        assert_eq!(ids(obj.page().unwrap().iter().rev().cloned()), ["c", "b", "a"]);
        assert_eq!(ids(obj[..2].iter().cloned()), ["a", "b"]);
    }

    #[test]
    fn test_paged_without_list() {
        let obj = sample();
        assert!(obj.page().is_none());
        assert!(matches!(obj.paged(0), Err(CoinbaseError::KeyNotFound(_))));
    }

    #[test]
    fn test_display_sorted_pretty() {
        let obj = sample();
        assert_eq!(obj.to_string(), "{\n  \"id\": \"abc\",\n  \"name\": \"wallet\"\n}");
    }
}
