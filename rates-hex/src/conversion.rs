//! Amount conversion at a resolved rate.
//!
//! No rounding or currency precision is applied; that is left to display.

use rates_types::{RateQuote, ValidationError};

/// Checks that `amount` can be converted.
pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount);
    }
    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount(amount));
    }
    Ok(())
}

/// Converts `amount` units of the quote's base currency into its quote currency.
pub fn convert(amount: f64, quote: &RateQuote) -> Result<f64, ValidationError> {
    validate_amount(amount)?;

    let converted = amount * quote.rate;
    if !converted.is_finite() {
        return Err(ValidationError::ConversionOverflow {
            amount,
            rate: quote.rate,
        });
    }
    Ok(converted)
}
