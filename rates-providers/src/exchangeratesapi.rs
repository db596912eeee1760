//! exchangeratesapi.io adapter.
//!
//! The free tier only serves rates against a fixed base (EUR), so the
//! requested pair is derived as a cross rate from the returned table.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use rates_types::{CurrencyPair, FetchContext, ProviderError, RateProvider, RateQuote};

use crate::ProviderSettings;
use crate::http::get_json;

pub const NAME: &str = "exchangeratesapi";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    error: Option<UpstreamError>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    info: Option<String>,
}

impl UpstreamError {
    fn describe(&self) -> String {
        let detail = self
            .info
            .as_deref()
            .or(self.kind.as_deref())
            .unwrap_or("unknown error");
        match &self.code {
            Some(code) => format!("{} ({})", detail, code),
            None => detail.to_string(),
        }
    }
}

/// Provider backed by the exchangeratesapi.io `v1/latest` endpoint.
pub struct ExchangeRatesApiProvider {
    client: Client,
    settings: ProviderSettings,
}

impl ExchangeRatesApiProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl RateProvider for ExchangeRatesApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_rate(
        &self,
        ctx: &FetchContext,
        pair: &CurrencyPair,
    ) -> Result<RateQuote, ProviderError> {
        let url = format!("{}/v1/latest", self.settings.base_url);
        let symbols = format!("{},{}", pair.base(), pair.quote());

        let response: LatestResponse = get_json(
            &self.client,
            ctx,
            &url,
            &[
                ("access_key", self.settings.api_key.as_str()),
                ("symbols", symbols.as_str()),
            ],
        )
        .await?;

        if !response.success {
            let cause = response
                .error
                .as_ref()
                .map(UpstreamError::describe)
                .unwrap_or_else(|| "request unsuccessful".to_string());
            warn!(provider = NAME, %pair, %cause, "Upstream rejected request");
            return Err(ProviderError::Upstream(cause));
        }

        let table_base = response.base.as_deref();
        let rate = crate::cross_rate(pair, |code| {
            if table_base == Some(code.as_str()) {
                Some(1.0)
            } else {
                response.rates.get(code.as_str()).copied()
            }
        })?;
        debug!(provider = NAME, %pair, rate, base = ?table_base, "Decoded rate");

        let observed_at = response
            .timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        Ok(RateQuote::observed_at(*pair, rate, NAME, observed_at))
    }
}
