//! Domain models for the exchange rate service.

pub mod pair;
pub mod quote;

pub use pair::{CurrencyCode, CurrencyPair};
pub use quote::{Conversion, RateQuote};
