//! # Rates Hex
//!
//! Rate aggregation core, application service and HTTP adapter for the
//! exchange rate service.
//!
//! ## Architecture
//!
//! - `aggregator` - Races every configured provider, first valid quote wins
//! - `conversion` - Converts an amount at a resolved rate
//! - `service` - Application service (validation → aggregation → conversion)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! Providers are injected as `Arc<dyn RateProvider>`, so the aggregator is
//! agnostic to how many there are and how they talk to their upstream.

pub mod aggregator;
pub mod conversion;
pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;
#[cfg(test)]
mod testing;

pub use aggregator::Aggregator;
pub use service::RateService;
