//! Resolved rate quotes and conversions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pair::CurrencyPair;
use crate::ports::ProviderError;

/// A single resolved rate attributable to one provider at one point in time.
///
/// `rate` is the number of `pair.quote()` units per one `pair.base()` unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub pair: CurrencyPair,
    pub rate: f64,
    pub source: String,
    pub observed_at: DateTime<Utc>,
}

impl RateQuote {
    /// Creates a quote observed now.
    pub fn new(pair: CurrencyPair, rate: f64, source: impl Into<String>) -> Self {
        Self::observed_at(pair, rate, source, Utc::now())
    }

    /// Creates a quote with an explicit observation time.
    pub fn observed_at(
        pair: CurrencyPair,
        rate: f64,
        source: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            pair,
            rate,
            source: source.into(),
            observed_at,
        }
    }

    /// Checks that the quote is usable for the requested pair.
    ///
    /// A quote that decoded fine but carries a zero, negative or non-finite
    /// rate is a provider failure, not a zero-rate quote.
    pub fn validate(&self, requested: &CurrencyPair) -> Result<(), ProviderError> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(ProviderError::InvalidRate(self.rate));
        }
        if self.pair != *requested {
            return Err(ProviderError::PairMismatch {
                requested: *requested,
                returned: self.pair,
            });
        }
        Ok(())
    }
}

/// A rate lookup with an accompanying amount converted at that rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub quote: RateQuote,
    pub amount: f64,
    pub converted_amount: f64,
}
