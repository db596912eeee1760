//! # Rates Providers
//!
//! Concrete rate provider implementations (adapters) for the exchange rate
//! service: CurrencyAPI, exchangeratesapi.io and Open Exchange Rates. Each
//! adapter implements the `RateProvider` port against one upstream HTTP API.

use std::sync::Arc;

use rates_types::{CurrencyCode, CurrencyPair, ProviderError, RateProvider};

pub mod currencyapi;
pub mod exchangeratesapi;
pub mod openexchangerates;

mod http;

pub use currencyapi::CurrencyApiProvider;
pub use exchangeratesapi::ExchangeRatesApiProvider;
pub use openexchangerates::OpenExchangeRatesProvider;

/// Connection settings for one upstream provider.
#[derive(Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
}

impl ProviderSettings {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Which providers are enabled, and how to reach them.
#[derive(Debug, Clone, Default)]
pub struct ProvidersConfig {
    pub currencyapi: Option<ProviderSettings>,
    pub exchangeratesapi: Option<ProviderSettings>,
    pub openexchangerates: Option<ProviderSettings>,
}

/// Build the enabled providers, in a fixed order.
///
/// # Examples
///
/// ```ignore
/// let config = ProvidersConfig {
///     currencyapi: Some(ProviderSettings::new("https://api.currencyapi.com", key)),
///     ..Default::default()
/// };
/// let providers = build_providers(&config);
/// ```
pub fn build_providers(config: &ProvidersConfig) -> Vec<Arc<dyn RateProvider>> {
    let mut providers: Vec<Arc<dyn RateProvider>> = Vec::new();

    if let Some(settings) = &config.currencyapi {
        providers.push(Arc::new(CurrencyApiProvider::new(settings.clone())));
    }
    if let Some(settings) = &config.exchangeratesapi {
        providers.push(Arc::new(ExchangeRatesApiProvider::new(settings.clone())));
    }
    if let Some(settings) = &config.openexchangerates {
        providers.push(Arc::new(OpenExchangeRatesProvider::new(settings.clone())));
    }

    providers
}

/// Derives `pair`'s rate from a table of values against a common base.
pub(crate) fn cross_rate(
    pair: &CurrencyPair,
    lookup: impl Fn(CurrencyCode) -> Option<f64>,
) -> Result<f64, ProviderError> {
    let base = lookup(pair.base()).ok_or(ProviderError::RateNotFound(pair.base()))?;
    let quote = lookup(pair.quote()).ok_or(ProviderError::RateNotFound(pair.quote()))?;

    if !base.is_finite() || base <= 0.0 {
        return Err(ProviderError::InvalidRate(base));
    }
    Ok(quote / base)
}
