//! Lookup tables that decide which kind a JSON object represents.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use serde_json::{Map, Value};

use crate::model::ObjectKind;

static SHARED: LazyLock<Arc<TypeRegistry>> = LazyLock::new(|| Arc::new(TypeRegistry::default()));

/// Static mapping data used to pick an [`ObjectKind`] for a JSON object.
///
/// Three tables are consulted, in order:
///
/// 1. `resource`: the value of an object's `resource` field, or the name of
///    the field the object was found under.
/// 2. `field`: field names whose objects always have one kind, such as
///    `native_balance` or `sender`.
/// 3. `key set`: a kind is picked when all of its required keys are present.
///    Entries are tried in insertion order and the first match wins.
///
/// The registry is plain data. Build a custom one with the chained
/// constructors and hand it to a [`Materializer`](crate::model::Materializer)
/// to change resolution without touching the shared instance.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    resources: HashMap<String, ObjectKind>,
    fields: HashMap<String, ObjectKind>,
    key_sets: Vec<(BTreeSet<String>, ObjectKind)>,
}

impl TypeRegistry {
    /// A registry with no entries; everything resolves to `Generic`.
    pub fn empty() -> Self {
        Self {
            resources: HashMap::new(),
            fields: HashMap::new(),
            key_sets: Vec::new(),
        }
    }

    /// The process-wide default registry.
    pub fn shared() -> Arc<TypeRegistry> {
        Arc::clone(&SHARED)
    }

    /// Map a resource discriminator to a kind.
    pub fn resource(mut self, name: impl Into<String>, kind: ObjectKind) -> Self {
        self.resources.insert(name.into(), kind);
        self
    }

    /// Map an enclosing field name to a kind.
    pub fn field(mut self, name: impl Into<String>, kind: ObjectKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Append a key-set rule.
    pub fn key_set<I, S>(mut self, keys: I, kind: ObjectKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_sets
            .push((keys.into_iter().map(Into::into).collect(), kind));
        self
    }

    pub fn by_resource(&self, name: &str) -> Option<ObjectKind> {
        self.resources.get(name).copied()
    }

    pub fn by_field(&self, name: &str) -> Option<ObjectKind> {
        self.fields.get(name).copied()
    }

    /// First key-set rule whose keys are all present in `obj`.
    pub fn by_keys(&self, obj: &Map<String, Value>) -> Option<ObjectKind> {
        self.key_sets
            .iter()
            .find(|(required, _)| required.iter().all(|key| obj.contains_key(key)))
            .map(|(_, kind)| *kind)
    }

    /// Resolve the kind of `obj`.
    ///
    /// `hint_key` is the field name `obj` was found under, absent at the root.
    /// `explicit` overrides every table.
    pub fn resolve(
        &self,
        obj: &Map<String, Value>,
        hint_key: Option<&str>,
        explicit: Option<ObjectKind>,
    ) -> ObjectKind {
        if let Some(kind) = explicit {
            return kind;
        }

        let discriminated = obj
            .get("resource")
            .and_then(Value::as_str)
            .and_then(|resource| self.by_resource(resource))
            .or_else(|| {
                hint_key.and_then(|key| self.by_resource(key).or_else(|| self.by_field(key)))
            });
        if let Some(kind) = discriminated {
            return kind;
        }

        self.by_keys(obj).unwrap_or(ObjectKind::Generic)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        use ObjectKind::*;

        TypeRegistry::empty()
            .resource("account", Account)
            .resource("balance", Money)
            .resource("buy", Buy)
            .resource("checkout", Checkout)
            .resource("deposit", Transfer)
            .resource("merchant", Merchant)
            .resource("notification", Notification)
            .resource("order", Order)
            .resource("payment_method", PaymentMethod)
            .resource("report", Report)
            .resource("sell", Sell)
            .resource("transaction", Transaction)
            .resource("transfer", Transfer)
            .resource("user", User)
            .resource("withdrawal", Withdrawal)
            .field("accounts", Account)
            .field("addresses", Address)
            .field("native_balance", Money)
            .field("current_user", User)
            .field("recipient", User)
            .field("sender", User)
            .field("orders", Order)
            .field("payment_methods", PaymentMethod)
            .field("transactions", Transaction)
            .field("transfers", Transfer)
            .field("notifications", Notification)
            .key_set(["address", "callback_url", "label"], Address)
            .key_set(["amount", "currency"], Money)
    }
}
