//! Recursive conversion of raw JSON into [`ApiValue`] trees.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::model::object::{Context, Identity};
use crate::model::{AccountRef, ApiObject, ApiValue, ObjectKind, TypeRegistry};
use crate::rest::CoinbaseClient;

/// One-level unwrap rules keyed by enclosing field name.
///
/// Some responses wrap every list item in a redundant envelope, e.g.
/// `{"addresses": [{"address": {...}}]}`. A rule `addresses -> address` makes
/// each item materialize as the inner object.
#[derive(Debug, Clone)]
pub struct UnnestRules {
    rules: HashMap<String, String>,
}

impl UnnestRules {
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    pub fn rule(mut self, field: impl Into<String>, inner: impl Into<String>) -> Self {
        self.rules.insert(field.into(), inner.into());
        self
    }

    pub fn inner_key(&self, field: &str) -> Option<&str> {
        self.rules.get(field).map(String::as_str)
    }

    /// Apply the rule for `field`, if any.
    ///
    /// The wrapper is kept as-is when the inner key is missing or does not
    /// hold an object.
    pub fn apply(&self, field: Option<&str>, mut obj: Map<String, Value>) -> Map<String, Value> {
        let Some(inner) = field.and_then(|f| self.inner_key(f)) else {
            return obj;
        };
        if !matches!(obj.get(inner), Some(Value::Object(_))) {
            return obj;
        }
        match obj.remove(inner) {
            Some(Value::Object(unwrapped)) => unwrapped,
            _ => obj,
        }
    }
}

impl Default for UnnestRules {
    fn default() -> Self {
        UnnestRules::empty()
            .rule("addresses", "address")
            .rule("orders", "order")
            .rule("payment_methods", "payment_method")
            .rule("transactions", "transaction")
            .rule("transfers", "transfer")
    }
}

/// Options for a single [`Materializer::materialize`] call.
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions<'a> {
    hint_key: Option<&'a str>,
    kind: Option<ObjectKind>,
    account: Option<AccountRef>,
    identity: Identity,
}

impl<'a> MaterializeOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field name the value was found under.
    pub fn hint_key(mut self, key: &'a str) -> Self {
        self.hint_key = Some(key);
        self
    }

    /// Kind to use for the root object, or for every object of a root list.
    pub fn kind(mut self, kind: ObjectKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn account(mut self, account: Option<AccountRef>) -> Self {
        self.account = account;
        self
    }

    /// Identity metadata for the root object.
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }
}

/// Builds typed containers out of raw JSON.
///
/// Objects resolve their kind through a [`TypeRegistry`], lists are
/// materialized item by item, scalars pass through unchanged. The client
/// handle and parent account thread through the whole tree.
#[derive(Debug, Clone)]
pub struct Materializer {
    registry: Arc<TypeRegistry>,
    unnest: Arc<UnnestRules>,
}

impl Materializer {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            unnest: Arc::new(UnnestRules::default()),
        }
    }

    pub fn with_unnest_rules(mut self, rules: UnnestRules) -> Self {
        self.unnest = Arc::new(rules);
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Materialize a JSON value.
    pub fn materialize(
        &self,
        value: Value,
        client: Option<&CoinbaseClient>,
        options: MaterializeOptions<'_>,
    ) -> ApiValue {
        let context = Context {
            client: client.cloned(),
            account: options.account,
        };
        self.build(value, options.hint_key, options.kind, &context, options.identity)
    }

    /// Materialize a JSON object into its container.
    pub fn materialize_object(
        &self,
        obj: Map<String, Value>,
        client: Option<&CoinbaseClient>,
        options: MaterializeOptions<'_>,
    ) -> ApiObject {
        let context = Context {
            client: client.cloned(),
            account: options.account,
        };
        self.build_object(obj, options.hint_key, options.kind, &context, options.identity)
    }

    fn build(
        &self,
        value: Value,
        hint_key: Option<&str>,
        kind: Option<ObjectKind>,
        context: &Context,
        identity: Identity,
    ) -> ApiValue {
        match value {
            Value::Object(obj) => {
                ApiValue::Object(self.build_object(obj, hint_key, kind, context, identity))
            }
            // List items share the list's hint key and kind; the list itself
            // carries no identity.
            Value::Array(items) => ApiValue::List(
                items
                    .into_iter()
                    .map(|item| self.build(item, hint_key, kind, context, Identity::default()))
                    .collect(),
            ),
            Value::Null => ApiValue::Null,
            Value::Bool(b) => ApiValue::Bool(b),
            Value::Number(n) => ApiValue::Number(n),
            Value::String(s) => ApiValue::String(s),
        }
    }

    fn build_object(
        &self,
        obj: Map<String, Value>,
        hint_key: Option<&str>,
        kind: Option<ObjectKind>,
        context: &Context,
        identity: Identity,
    ) -> ApiObject {
        let kind = self.registry.resolve(&obj, hint_key, kind);
        let obj = self.unnest.apply(hint_key, obj);

        let mut instance = ApiObject::with_context(kind, context.clone(), identity);

        // Everything below an account belongs to it.
        let owned;
        let child_context = match obj.get("id").and_then(Value::as_str) {
            Some(id) if kind == ObjectKind::Account => {
                owned = Context {
                    client: context.client.clone(),
                    account: Some(AccountRef::new(id)),
                };
                &owned
            }
            _ => context,
        };

        for (key, value) in obj {
            let child = self.build(value, Some(&key), None, child_context, Identity::default());
            instance.insert(key, child);
        }
        instance
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(TypeRegistry::shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn simple_data() -> Value {
        json!({
            "str": "bar",
            "foo": "bar",
            "int": 21,
            "float": 21.0,
            "bool": false,
            "none": null,
            "list": [1, 2, 3],
            "resource": "foo",
            "obj": {
                "str": "bar1",
                "foo": "bar",
                "obj": {"str": "bar2"}
            },
            "list_of_objs": [
                {"str": "one"},
                {"str": "two"},
                {"str": "three"}
            ]
        })
    }

    fn root(value: ApiValue) -> ApiObject {
        value.into_object().unwrap()
    }

    #[test]
    fn test_transforms_types() {
        let obj = root(Materializer::default().materialize(simple_data(), None, MaterializeOptions::new()));

        assert_eq!(obj.kind(), ObjectKind::Generic);
        assert!(obj["obj"].as_object().is_some());
        assert!(obj["obj"].as_object().unwrap()["obj"].as_object().is_some());
        for item in obj["list_of_objs"].as_list().unwrap() {
            assert!(item.as_object().is_some());
        }
        assert_eq!(obj["str"], ApiValue::from("bar"));
        assert_eq!(obj["int"].as_i64(), Some(21));
        assert_eq!(obj["float"].as_number().unwrap().to_string(), "21.0");
        assert_eq!(obj["bool"], ApiValue::Bool(false));
        assert!(obj["none"].is_null());
        assert_eq!(obj["list"], json!([1, 2, 3]));
    }

    #[test]
    fn test_round_trip_serialization() {
        let data = simple_data();
        let obj = root(Materializer::default().materialize(data.clone(), None, MaterializeOptions::new()));

        assert_eq!(obj, data);
        assert_eq!(serde_json::to_string(&obj).unwrap(), serde_json::to_string(&data).unwrap());

        let again = root(Materializer::default().materialize(data, None, MaterializeOptions::new()));
        assert_eq!(obj, again);
    }

    #[test]
    fn test_explicit_kind_applies_to_root_only() {
        let obj = root(Materializer::default().materialize(
            simple_data(),
            None,
            MaterializeOptions::new().kind(ObjectKind::Report),
        ));
        assert_eq!(obj.kind(), ObjectKind::Report);
        assert_eq!(obj["obj"].as_object().unwrap().kind(), ObjectKind::Generic);
    }

    #[test]
    fn test_explicit_kind_applies_to_root_list_items() {
        let value = Materializer::default().materialize(
            json!([{"id": "1"}, {"id": "2"}]),
            None,
            MaterializeOptions::new().kind(ObjectKind::Account),
        );
        for item in value.as_list().unwrap() {
            assert_eq!(item.as_object().unwrap().kind(), ObjectKind::Account);
        }
    }

    #[test]
    fn test_resource_field_resolution() {
        let registry = TypeRegistry::empty().resource("foo", ObjectKind::Order);
        let materializer = Materializer::new(Arc::new(registry));
        let obj = root(materializer.materialize(simple_data(), None, MaterializeOptions::new()));
        assert_eq!(obj.kind(), ObjectKind::Order);
    }

    #[test]
    fn test_key_set_resolution() {
        let registry = TypeRegistry::empty().key_set(["str", "foo"], ObjectKind::Report);
        let materializer = Materializer::new(Arc::new(registry));
        let obj = root(materializer.materialize(simple_data(), None, MaterializeOptions::new()));

        assert_eq!(obj.kind(), ObjectKind::Report);
        assert_eq!(obj["obj"].as_object().unwrap().kind(), ObjectKind::Report);
        for item in obj["list_of_objs"].as_list().unwrap() {
            assert_eq!(item.as_object().unwrap().kind(), ObjectKind::Generic);
        }
    }

    #[test]
    fn test_hint_key_as_discriminator() {
        let registry = TypeRegistry::empty().resource("account", ObjectKind::Account);
        let materializer = Materializer::new(Arc::new(registry));
        let obj = root(materializer.materialize(
            json!({"account": {"id": "x1"}}),
            None,
            MaterializeOptions::new(),
        ));

        assert_eq!(obj.kind(), ObjectKind::Generic);
        let account = obj["account"].as_object().unwrap();
        assert_eq!(account.kind(), ObjectKind::Account);
        assert_eq!(account.id(), Some("x1"));
    }

    #[test]
    fn test_unnesting() {
        let data = json!({
            "addresses": [
                {"address": {"address": "1abc", "callback_url": null, "label": "one"}},
                {"address": {"address": "1def", "callback_url": null, "label": "two"}}
            ]
        });
        let obj = root(Materializer::default().materialize(data, None, MaterializeOptions::new()));
        let addresses = obj["addresses"].as_list().unwrap();

        assert_eq!(addresses.len(), 2);
        let first = addresses[0].as_object().unwrap();
        assert_eq!(first.kind(), ObjectKind::Address);
        assert_eq!(first.str_field("address"), Some("1abc"));
        assert!(first["callback_url"].is_null());
        assert_eq!(addresses[1].as_object().unwrap().str_field("label"), Some("two"));
    }

    #[test]
    fn test_unnesting_leaves_unexpected_shapes() {
        let data = json!({"orders": [{"id": "o1"}, {"order": "not an object"}]});
        let obj = root(Materializer::default().materialize(data, None, MaterializeOptions::new()));
        let orders = obj["orders"].as_list().unwrap();
        assert_eq!(orders[0], json!({"id": "o1"}));
        assert_eq!(orders[1], json!({"order": "not an object"}));
    }

    #[test]
    fn test_account_threads_to_children() {
        let data = json!({
            "id": "acct-1",
            "resource": "account",
            "balance": {"amount": "1.0", "currency": "BTC"}
        });
        let obj = root(Materializer::default().materialize(data, None, MaterializeOptions::new()));
        let balance = obj["balance"].as_object().unwrap();

        assert_eq!(balance.kind(), ObjectKind::Money);
        assert_eq!(balance.account(), Some(AccountRef::new("acct-1")));
    }

    #[test]
    fn test_parent_account_option() {
        let obj = root(Materializer::default().materialize(
            json!({"id": "tx", "nested": {"a": 1}}),
            None,
            MaterializeOptions::new()
                .kind(ObjectKind::Transaction)
                .account(Some(AccountRef::new("acct-9"))),
        ));
        assert_eq!(obj.account(), Some(AccountRef::new("acct-9")));
        assert_eq!(
            obj["nested"].as_object().unwrap().account(),
            Some(AccountRef::new("acct-9"))
        );
    }

    #[test]
    fn test_identity_on_root_only() {
        let identity = Identity {
            paged_key: Some("list_of_objs".to_string()),
            ..Identity::default()
        };
        let obj = root(Materializer::default().materialize(
            simple_data(),
            None,
            MaterializeOptions::new().identity(identity),
        ));
        assert_eq!(obj.paged_key(), Some("list_of_objs"));
        assert_eq!(obj["obj"].as_object().unwrap().paged_key(), None);
        assert_eq!(obj[2], json!({"str": "three"}));
    }

    #[test]
    fn test_scalars_pass_through() {
        let raw: Value = serde_json::from_str("1.50").unwrap();
        let value = Materializer::default().materialize(raw, None, MaterializeOptions::new());
        assert_eq!(value.as_number().unwrap().to_string(), "1.50");
        let value = Materializer::default().materialize(json!(null), None, MaterializeOptions::new());
        assert!(value.is_null());
    }

    #[test]
    fn test_key_order_is_source_order() {
        let data: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let obj = root(Materializer::default().materialize(data, None, MaterializeOptions::new()));
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }
}
