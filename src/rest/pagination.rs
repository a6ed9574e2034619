//! Cursor pagination over list responses.

use crate::error::CoinbaseError;
use crate::model::{ApiObject, ApiValue, ObjectKind};
use crate::rest::CoinbaseClient;

fn next_uri(page: &ApiObject) -> Option<&str> {
    page.pagination()
        .and_then(|pagination| pagination.str_field("next_uri"))
        .filter(|uri| !uri.is_empty())
}

impl CoinbaseClient {
    /// Fetch the page that follows `page`.
    ///
    /// Follows `pagination.next_uri` and returns `None` on the last page.
    /// Items of the new page get the same kind and parent account as the
    /// items of `page`.
    pub async fn next_page(&self, page: &ApiObject) -> Result<Option<ApiObject>, CoinbaseError> {
        let Some(uri) = next_uri(page) else {
            return Ok(None);
        };
        let kind = page.item_kind().unwrap_or(ObjectKind::Generic);
        tracing::debug!(next_uri = uri, "fetching next page");
        let next = self.get_at_path(uri, kind, page.account()).await?;
        Ok(Some(next))
    }

    /// Walk every page after `first` and merge their `data` lists.
    ///
    /// Items keep page order: the items of `first` come first, those of the
    /// last page come last. The result carries the pagination of the last
    /// page fetched. An object without a `data` list is returned unchanged.
    pub async fn collect_pages(&self, first: ApiObject) -> Result<ApiObject, CoinbaseError> {
        if !matches!(first.get("data"), Some(ApiValue::List(_))) {
            return Ok(first);
        }
        let mut merged = first;
        let mut more_items = Vec::new();

        let mut current = self.next_page(&merged).await?;
        while let Some(mut page) = current {
            current = self.next_page(&page).await?;
            if let Some(ApiValue::List(items)) = page.remove("data") {
                more_items.extend(items);
            }
            merged.identity_mut().pagination = page.pagination().cloned().map(Box::new);
        }

        if let Some(ApiValue::List(items)) = merged.get_mut("data") {
            items.extend(more_items);
        }
        Ok(merged)
    }
}
