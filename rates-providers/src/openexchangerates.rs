//! Open Exchange Rates adapter (`https://openexchangerates.org`).
//!
//! Rates come back against the account's base currency (USD unless the plan
//! allows changing it); the requested pair is derived as a cross rate.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use rates_types::{CurrencyPair, FetchContext, ProviderError, RateProvider, RateQuote};

use crate::ProviderSettings;
use crate::http::get_json;

pub const NAME: &str = "openexchangerates";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    timestamp: Option<i64>,
    base: String,
    rates: HashMap<String, f64>,
}

/// Provider backed by the Open Exchange Rates `api/latest.json` endpoint.
pub struct OpenExchangeRatesProvider {
    client: Client,
    settings: ProviderSettings,
}

impl OpenExchangeRatesProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch_rate(
        &self,
        ctx: &FetchContext,
        pair: &CurrencyPair,
    ) -> Result<RateQuote, ProviderError> {
        let url = format!("{}/api/latest.json", self.settings.base_url);
        let symbols = format!("{},{}", pair.base(), pair.quote());

        let response: LatestResponse = get_json(
            &self.client,
            ctx,
            &url,
            &[
                ("app_id", self.settings.api_key.as_str()),
                ("symbols", symbols.as_str()),
            ],
        )
        .await?;

        let rate = crate::cross_rate(pair, |code| {
            if response.base == code.as_str() {
                Some(1.0)
            } else {
                response.rates.get(code.as_str()).copied()
            }
        })?;
        debug!(provider = NAME, %pair, rate, base = %response.base, "Decoded rate");

        let observed_at = response
            .timestamp
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        Ok(RateQuote::observed_at(*pair, rate, NAME, observed_at))
    }
}
