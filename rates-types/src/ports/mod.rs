//! Port traits (interfaces for adapters).
//!
//! These are the contracts that provider adapters must implement.
//! The aggregator depends on these traits, not concrete implementations.

mod context;
mod provider;

pub use context::FetchContext;
pub use provider::{ProviderError, RateProvider};
