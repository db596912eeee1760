//! Error types for the exchange rate service.

use std::fmt;

use crate::domain::CurrencyPair;
use crate::ports::ProviderError;

/// Input validation errors. Never retried, surfaced to the caller as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid currency pair: missing separator, expected BASE-QUOTE")]
    MissingSeparator,

    #[error("Invalid currency pair: wrong token count, expected 2 codes, got {0}")]
    WrongTokenCount(usize),

    #[error("Invalid currency pair: invalid code shape {0:?}, expected 3 letters")]
    InvalidCodeShape(String),

    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(f64),

    #[error("Amount must be a finite number")]
    NonFiniteAmount,

    #[error("Converting {amount} at rate {rate} overflows")]
    ConversionOverflow { amount: f64, rate: f64 },
}

impl ValidationError {
    /// Short machine-friendly reason.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::MissingSeparator => "missing separator",
            ValidationError::WrongTokenCount(_) => "wrong token count",
            ValidationError::InvalidCodeShape(_) => "invalid code shape",
            ValidationError::NegativeAmount(_) => "negative amount",
            ValidationError::NonFiniteAmount => "non-finite amount",
            ValidationError::ConversionOverflow { .. } => "conversion overflow",
        }
    }
}

/// A single provider's failure, recorded by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    source: String,
    cause: ProviderError,
}

impl ProviderFailure {
    pub fn new(source: impl Into<String>, cause: ProviderError) -> Self {
        Self {
            source: source.into(),
            cause,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cause(&self) -> &ProviderError {
        &self.cause
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.cause)
    }
}

/// Terminal failure: no provider produced a usable quote in time.
///
/// Failures are ordered by completion time; providers still outstanding at
/// the deadline are appended last.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFailure {
    pair: CurrencyPair,
    failures: Vec<ProviderFailure>,
}

impl AggregateFailure {
    pub fn new(pair: CurrencyPair, failures: Vec<ProviderFailure>) -> Self {
        debug_assert!(!failures.is_empty(), "aggregate failure without causes");
        Self { pair, failures }
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn failures(&self) -> &[ProviderFailure] {
        &self.failures
    }

    /// True when every recorded cause is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        self.failures
            .iter()
            .all(|f| matches!(f.cause(), ProviderError::DeadlineExceeded))
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to fetch exchange rate for {} from all providers",
            self.pair
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{}{}", sep, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

/// Service-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Aggregate(#[from] AggregateFailure),
}

/// Construction-time configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("At least one rate provider must be configured")]
    NoProviders,

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_reasons() {
        assert_eq!(
            ValidationError::MissingSeparator.reason(),
            "missing separator"
        );
        assert_eq!(
            ValidationError::WrongTokenCount(3).reason(),
            "wrong token count"
        );
        assert_eq!(
            ValidationError::InvalidCodeShape("US".into()).reason(),
            "invalid code shape"
        );
        assert_eq!(
            ValidationError::ConversionOverflow {
                amount: 1e308,
                rate: 10.0
            }
            .reason(),
            "conversion overflow"
        );
    }

    #[test]
    fn test_aggregate_failure_display_lists_every_cause() {
        let pair = CurrencyPair::parse("USD-EUR").unwrap();
        let failure = AggregateFailure::new(
            pair,
            vec![
                ProviderFailure::new("currencyapi", ProviderError::Status(503)),
                ProviderFailure::new("exchangeratesapi", ProviderError::DeadlineExceeded),
            ],
        );

        assert_eq!(
            failure.to_string(),
            "Failed to fetch exchange rate for USD-EUR from all providers: \
             currencyapi: Upstream returned HTTP 503, exchangeratesapi: Deadline exceeded"
        );
        assert!(!failure.is_timeout());
    }

    #[test]
    fn test_aggregate_failure_timeout() {
        let pair = CurrencyPair::parse("USD-EUR").unwrap();
        let failure = AggregateFailure::new(
            pair,
            vec![
                ProviderFailure::new("a", ProviderError::DeadlineExceeded),
                ProviderFailure::new("b", ProviderError::DeadlineExceeded),
            ],
        );
        assert!(failure.is_timeout());
    }

    #[test]
    fn test_rate_error_from_validation() {
        let err: RateError = ValidationError::MissingSeparator.into();
        assert!(matches!(err, RateError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Invalid currency pair: missing separator, expected BASE-QUOTE"
        );
    }
}
