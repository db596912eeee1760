//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AggregateFailure, ProviderFailure};

// ─────────────────────────────────────────────────────────────────────────────
// Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request for the rate of a currency pair, optionally converting an amount.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateRequest {
    /// Pair identifier in `BASE-QUOTE` form
    #[schema(example = "USD-EUR")]
    pub currency_pair: String,
    /// Amount of the base currency to convert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 100.0)]
    pub amount: Option<f64>,
}

/// Resolved rate, with the converted amount when one was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateResponse {
    /// Normalized pair identifier
    #[schema(example = "USD-EUR")]
    pub currency_pair: String,
    /// Quote currency units per one base currency unit
    #[schema(example = 0.92)]
    pub rate: f64,
    /// `amount * rate`, present only when an amount was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 92.0)]
    pub converted_amount: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Error DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// One provider's failure, as reported to API callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProviderFailureBody {
    #[schema(example = "currencyapi")]
    pub source: String,
    #[schema(example = "Upstream returned HTTP 503")]
    pub cause: String,
}

impl From<&ProviderFailure> for ProviderFailureBody {
    fn from(failure: &ProviderFailure) -> Self {
        Self {
            source: failure.source().to_string(),
            cause: failure.cause().to_string(),
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[schema(example = 400)]
    pub code: u16,
    /// Per-provider causes, present for aggregate failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ProviderFailureBody>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            failures: Vec::new(),
        }
    }

    pub fn from_aggregate(failure: &AggregateFailure, code: u16) -> Self {
        Self {
            error: failure.to_string(),
            code,
            failures: failure.failures().iter().map(Into::into).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    /// Names of the configured providers
    pub providers: Vec<String>,
}
