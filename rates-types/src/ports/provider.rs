//! Exchange rate provider port.
//!
//! This trait defines the interface for upstream rate sources.
//! Implementations can be HTTP clients, mock providers, etc.

use crate::{CurrencyCode, CurrencyPair, RateQuote};

use super::FetchContext;

/// Error type for a single provider's fetch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Currency code {0} not found in response")]
    RateNotFound(CurrencyCode),

    #[error("Invalid rate {0}: rates must be positive")]
    InvalidRate(f64),

    #[error("Quote for {returned} does not match requested pair {requested}")]
    PairMismatch {
        requested: CurrencyPair,
        returned: CurrencyPair,
    },

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Cancelled")]
    Cancelled,

    #[error("Provider task ended without a result")]
    TaskAborted,
}

/// Port trait for exchange rate providers.
///
/// Implementations must:
/// - return promptly with [`ProviderError::Cancelled`] once `ctx` is cancelled;
/// - return a rate fully resolved for `pair` (quote units per base unit),
///   deriving cross rates from their native base themselves;
/// - not retry beyond their own documented policy.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Identifier recorded as the `source` of quotes and failures.
    fn name(&self) -> &str;

    /// Fetches the current rate for `pair`.
    async fn fetch_rate(
        &self,
        ctx: &FetchContext,
        pair: &CurrencyPair,
    ) -> Result<RateQuote, ProviderError>;
}
