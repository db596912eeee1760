//! Rate Application Service
//!
//! Orchestrates validation, aggregation and conversion.
//! Contains NO infrastructure logic - pure orchestration.

use std::time::Duration;

use rates_types::{
    Conversion, CurrencyPair, FetchContext, RateError, RateQuote, RateRequest, RateResponse,
};

use crate::aggregator::Aggregator;
use crate::conversion;

/// Deadline applied to a resolution when the caller supplies none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Application service for rate lookups.
///
/// The provider set is fixed at construction through the [`Aggregator`].
pub struct RateService {
    aggregator: Aggregator,
    timeout: Duration,
}

impl RateService {
    /// Creates a new rate service over the given aggregator.
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the overall deadline applied to each request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a reference to the underlying aggregator.
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A fresh context bounded by the configured timeout.
    pub fn context(&self) -> FetchContext {
        FetchContext::with_timeout(self.timeout)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rate Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets the rate for a raw `BASE-QUOTE` pair using the default deadline.
    pub async fn get_rate(&self, raw_pair: &str) -> Result<RateQuote, RateError> {
        self.get_rate_with(&self.context(), raw_pair).await
    }

    /// Gets the rate for a raw pair within a caller-supplied context.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn get_rate_with(
        &self,
        ctx: &FetchContext,
        raw_pair: &str,
    ) -> Result<RateQuote, RateError> {
        let pair = CurrencyPair::parse(raw_pair)?;
        Ok(self.aggregator.resolve(ctx, &pair).await?)
    }

    /// Gets the rate and converts `amount` at it.
    ///
    /// The amount is validated before any provider is queried.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn convert(
        &self,
        ctx: &FetchContext,
        raw_pair: &str,
        amount: f64,
    ) -> Result<Conversion, RateError> {
        let pair = CurrencyPair::parse(raw_pair)?;
        conversion::validate_amount(amount)?;

        let quote = self.aggregator.resolve(ctx, &pair).await?;
        let converted_amount = conversion::convert(amount, &quote)?;

        Ok(Conversion {
            quote,
            amount,
            converted_amount,
        })
    }

    /// Handles an API request: converts only when an amount accompanies it.
    pub async fn quote(&self, req: RateRequest) -> Result<RateResponse, RateError> {
        let ctx = self.context();

        match req.amount {
            Some(amount) => {
                let conversion = self.convert(&ctx, &req.currency_pair, amount).await?;
                Ok(RateResponse {
                    currency_pair: conversion.quote.pair.to_string(),
                    rate: conversion.quote.rate,
                    converted_amount: Some(conversion.converted_amount),
                })
            }
            None => {
                let quote = self.get_rate_with(&ctx, &req.currency_pair).await?;
                Ok(RateResponse {
                    currency_pair: quote.pair.to_string(),
                    rate: quote.rate,
                    converted_amount: None,
                })
            }
        }
    }
}
