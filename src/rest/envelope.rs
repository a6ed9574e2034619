//! Decoding of the `{"data": ..., "pagination": ..., "warnings": ...}` envelope.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{ApiError, CoinbaseError};
use crate::model::object::Context;
use crate::model::{
    AccountRef, ApiObject, ApiValue, Identity, MaterializeOptions, ObjectKind, ResponseMeta,
};
use crate::rest::CoinbaseClient;

/// A successful response, body not decoded yet.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) url: Url,
    pub(crate) body: String,
}

impl RawResponse {
    fn meta(&self) -> Arc<ResponseMeta> {
        Arc::new(ResponseMeta {
            status: self.status,
            headers: self.headers.clone(),
            url: self.url.clone(),
        })
    }
}

fn missing_data(raw: &RawResponse) -> CoinbaseError {
    let mut error = ApiError::from_body(raw.status, &raw.body);
    if error.message.is_empty() {
        error.message = "response is missing the 'data' field".to_string();
    }
    CoinbaseError::Api(error)
}

fn text<'a>(warning: &'a Value, key: &str) -> &'a str {
    warning.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn log_warning(warning: &Value) {
    tracing::warn!("{} ({})", text(warning, "message"), text(warning, "url"));
}

impl CoinbaseClient {
    /// Turn an envelope into an object tree.
    ///
    /// An object under `data` becomes the root, built with `kind`. A list
    /// under `data` is kept under the `data` key of a generic root, every
    /// item built with `kind`. Pagination and warnings are attached to the
    /// root only.
    pub(crate) fn decode(
        &self,
        raw: RawResponse,
        kind: ObjectKind,
        account: Option<AccountRef>,
    ) -> Result<ApiObject, CoinbaseError> {
        let blob: Value = serde_json::from_str(&raw.body)?;
        let Value::Object(mut blob) = blob else {
            return Err(missing_data(&raw));
        };

        let data = match blob.remove("data") {
            None | Some(Value::Null) => return Err(missing_data(&raw)),
            Some(data) => data,
        };

        let warnings = match blob.remove("warnings") {
            Some(Value::Array(items)) => {
                items.iter().for_each(log_warning);
                Some(self.detached_list(items))
            }
            _ => None,
        };

        let pagination = match blob.remove("pagination") {
            Some(Value::Object(map)) => Some(Box::new(self.detached_object(map))),
            _ => None,
        };

        let mut identity = Identity {
            paged_key: None,
            response: Some(raw.meta()),
            pagination,
            warnings,
            item_kind: None,
        };

        let options = MaterializeOptions::new().kind(kind).account(account.clone());
        match data {
            Value::Object(map) => Ok(self.materializer().materialize_object(
                map,
                Some(self),
                options.identity(identity),
            )),
            other => {
                identity.item_kind = Some(kind);
                let context = Context {
                    client: Some(self.clone()),
                    account,
                };
                let mut root = ApiObject::with_context(ObjectKind::Generic, context, identity);
                root.insert("data", self.materializer().materialize(other, Some(self), options));
                Ok(root)
            }
        }
    }

    /// Metadata objects do not hold a client.
    fn detached_object(&self, map: Map<String, Value>) -> ApiObject {
        self.materializer().materialize_object(
            map,
            None,
            MaterializeOptions::new().kind(ObjectKind::Generic),
        )
    }

    fn detached_list(&self, items: Vec<Value>) -> Vec<ApiValue> {
        match self.materializer().materialize(
            Value::Array(items),
            None,
            MaterializeOptions::new().kind(ObjectKind::Generic),
        ) {
            ApiValue::List(list) => list,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use serde_json::json;

    fn raw(body: Value) -> RawResponse {
        RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            url: Url::parse("https://api.coinbase.com/v2/test").unwrap(),
            body: body.to_string(),
        }
    }

    fn client() -> CoinbaseClient {
        CoinbaseClient::builder().build().unwrap()
    }

    #[test]
    fn test_object_data_becomes_root() {
        let obj = client()
            .decode(
                raw(json!({"data": {"id": "a1", "name": "Wallet"}})),
                ObjectKind::Account,
                None,
            )
            .unwrap();
        assert_eq!(obj.kind(), ObjectKind::Account);
        assert_eq!(obj, json!({"id": "a1", "name": "Wallet"}));
        assert!(obj.client().is_some());
        assert_eq!(obj.response().unwrap().status, StatusCode::OK);
    }

    #[test]
    fn test_list_data_is_wrapped() {
        let root = client()
            .decode(
                raw(json!({
                    "pagination": {"next_uri": null, "limit": 25},
                    "data": [{"id": "1"}, {"id": "2"}],
                })),
                ObjectKind::Buy,
                Some(AccountRef::new("acc")),
            )
            .unwrap();
        assert_eq!(root.kind(), ObjectKind::Generic);
        assert_eq!(root.item_kind(), Some(ObjectKind::Buy));

        let items = root.page().unwrap();
        assert_eq!(items.len(), 2);
        let first = items[0].as_object().unwrap();
        assert_eq!(first.kind(), ObjectKind::Buy);
        assert_eq!(first.account().unwrap().id(), "acc");

        let pagination = root.pagination().unwrap();
        assert!(pagination.client().is_none());
        assert_eq!(pagination["limit"], json!(25));
        assert!(first.pagination().is_none());
    }

    #[test]
    fn test_warnings_attached() {
        let obj = client()
            .decode(
                raw(json!({
                    "data": {"id": "1"},
                    "warnings": [{"id": "missing_version", "message": "Please supply API version", "url": "https://docs"}],
                })),
                ObjectKind::Generic,
                None,
            )
            .unwrap();
        let warnings = obj.warnings().unwrap();
        assert_eq!(warnings.len(), 1);
        let warning = warnings[0].as_object().unwrap();
        assert_eq!(warning.str_field("message"), Some("Please supply API version"));
        assert!(warning.client().is_none());
    }

    #[test]
    fn test_missing_data_is_api_error() {
        for body in [json!({"errors": []}), json!({"data": null}), json!([1, 2])] {
            match client().decode(raw(body), ObjectKind::Generic, None) {
                Err(CoinbaseError::Api(error)) => {
                    assert_eq!(error.kind, ApiErrorKind::Generic);
                    assert_eq!(error.status, StatusCode::OK);
                    assert!(!error.message.is_empty());
                }
                other => panic!("expected an API error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_data_keeps_server_error_id() {
        let body = json!({"errors": [{"id": "not_found", "message": "Not found"}]});
        match client().decode(raw(body), ObjectKind::Generic, None) {
            Err(CoinbaseError::Api(error)) => {
                assert_eq!(error.kind, ApiErrorKind::NotFound);
                assert_eq!(error.message, "Not found");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let mut response = raw(json!({}));
        response.body = "<html>".to_string();
        assert!(matches!(
            client().decode(response, ObjectKind::Generic, None),
            Err(CoinbaseError::Json(_))
        ));
    }
}
