//! # Rates Types
//!
//! Domain types and port traits for the exchange rate service.
//! This crate has ZERO IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (CurrencyCode, CurrencyPair, RateQuote)
//! - `ports/` - Trait definitions that provider adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Validation, provider and aggregate error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{Conversion, CurrencyCode, CurrencyPair, RateQuote};
pub use dto::*;
pub use error::{AggregateFailure, ConfigError, ProviderFailure, RateError, ValidationError};
pub use ports::{FetchContext, ProviderError, RateProvider};
