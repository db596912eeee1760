//! # Rates Client SDK
//!
//! A typed Rust client for the Rates API.

use rates_types::{CurrencyPair, HealthResponse, RateRequest, RateResponse};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rates API client.
pub struct RatesClient {
    base_url: String,
    http: Client,
}

impl RatesClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Fetches the service health, including the configured providers.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Looks up the current rate for `pair`.
    pub async fn get_rate(&self, pair: &CurrencyPair) -> Result<RateResponse, ClientError> {
        self.post_rate(&RateRequest {
            currency_pair: pair.to_string(),
            amount: None,
        })
        .await
    }

    /// Converts `amount` of the pair's base currency into its quote currency.
    pub async fn convert(
        &self,
        pair: &CurrencyPair,
        amount: f64,
    ) -> Result<RateResponse, ClientError> {
        self.post_rate(&RateRequest {
            currency_pair: pair.to_string(),
            amount: Some(amount),
        })
        .await
    }

    async fn post_rate(&self, req: &RateRequest) -> Result<RateResponse, ClientError> {
        let resp = self
            .http
            .post(format!("{}/v1/rate", self.base_url))
            .json(req)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
