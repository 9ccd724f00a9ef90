//! The remote time-series seam the orchestrator fetches through.

use crate::error::HttpError;
use crate::shared::ItemId;
use async_trait::async_trait;

/// Something that can produce the raw time-series JSON for one item.
///
/// One call is one attempt: implementations must not retry. The HTTP
/// implementation is [`crate::http::WikiPricesHttp`].
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_timeseries(&self, item_id: ItemId) -> Result<String, HttpError>;
}
