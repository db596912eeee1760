//! CurrencyAPI adapter (`https://currencyapi.com`).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use rates_types::{CurrencyPair, FetchContext, ProviderError, RateProvider, RateQuote};

use crate::ProviderSettings;
use crate::http::get_json;

pub const NAME: &str = "currencyapi";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    meta: Option<Meta>,
    data: HashMap<String, CurrencyValue>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CurrencyValue {
    value: f64,
}

/// Provider backed by the CurrencyAPI `v3/latest` endpoint.
pub struct CurrencyApiProvider {
    client: Client,
    settings: ProviderSettings,
}

impl CurrencyApiProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl RateProvider for CurrencyApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_rate(
        &self,
        ctx: &FetchContext,
        pair: &CurrencyPair,
    ) -> Result<RateQuote, ProviderError> {
        let url = format!("{}/v3/latest", self.settings.base_url);
        let currencies = format!("{},{}", pair.quote(), pair.base());

        let response: LatestResponse = get_json(
            &self.client,
            ctx,
            &url,
            &[
                ("apikey", self.settings.api_key.as_str()),
                ("base_currency", pair.base().as_str()),
                ("currencies", currencies.as_str()),
            ],
        )
        .await?;

        let rate = crate::cross_rate(pair, |code| {
            response.data.get(code.as_str()).map(|c| c.value)
        })?;
        debug!(provider = NAME, %pair, rate, "Decoded rate");

        let observed_at = response
            .meta
            .and_then(|m| m.last_updated_at)
            .unwrap_or_else(Utc::now);

        Ok(RateQuote::observed_at(*pair, rate, NAME, observed_at))
    }
}
