//! Typed decoding of result objects

use super::client::GraphqlClient;
use super::request::PaginationRequest;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Convert one result object into `T`
///
/// The object is re-encoded to JSON bytes and deserialized from those, so
/// `T`'s serde attributes apply exactly as they would to a raw response.
pub fn decode<T: DeserializeOwned>(item: &Value) -> Result<T> {
    let bytes = serde_json::to_vec(item).map_err(Error::Conversion)?;
    serde_json::from_slice(&bytes).map_err(Error::Conversion)
}

/// Paginate `request` and collect every result that decodes into `T`
///
/// Items that fail to decode are logged and skipped; they never end the call.
pub async fn fetch_all<T: DeserializeOwned>(
    client: &GraphqlClient,
    request: &PaginationRequest,
) -> Result<Vec<T>> {
    let mut items = Vec::new();

    client
        .paginate(request, |page| {
            items.reserve(page.len());
            for item in page.results() {
                match decode::<T>(item) {
                    Ok(value) => items.push(value),
                    Err(e) => warn!("skipping result at offset {}: {}", page.offset(), e),
                }
            }
            Ok(())
        })
        .await?;

    Ok(items)
}

impl GraphqlClient {
    /// Method form of [`fetch_all`]
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        request: &PaginationRequest,
    ) -> Result<Vec<T>> {
        fetch_all(self, request).await
    }
}
