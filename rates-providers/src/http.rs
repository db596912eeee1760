//! Shared HTTP plumbing for provider adapters.

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use rates_types::{FetchContext, ProviderError};

/// GETs `url` with `query` and decodes the JSON body as `T`.
///
/// The request is abandoned as soon as `ctx` is cancelled or expires.
/// Non-2xx responses map to [`ProviderError::Status`]. The query is not
/// logged since it carries the API key.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    ctx: &FetchContext,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, ProviderError> {
    ctx.race(async {
        debug!(
            url,
            budget_ms = ?ctx.remaining().map(|d| d.as_millis() as u64),
            "Requesting rate data"
        );

        let response = client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url().to_string()))?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "Received response");
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.without_url().to_string()))
    })
    .await
}
