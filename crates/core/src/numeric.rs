//! Lenient numeric input handling for form fields.
//!
//! Form fields arrive as text. Anything that does not parse as a non-negative
//! decimal reads as zero so totals are always displayable.

use core::str::FromStr;

use rust_decimal::Decimal;

/// Parse user-entered text into a non-negative decimal.
///
/// Blank, non-numeric and negative input all coerce to `0`.
pub fn coerce_non_negative(input: &str) -> Decimal {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }

    let parsed = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed));
    match parsed {
        Ok(value) if value.is_sign_negative() => {
            tracing::debug!(input = trimmed, "negative numeric input coerced to zero");
            Decimal::ZERO
        }
        Ok(value) => value.normalize(),
        Err(_) => {
            tracing::debug!(input = trimmed, "non-numeric input coerced to zero");
            Decimal::ZERO
        }
    }
}

/// `amount × percent / 100`, saturating instead of panicking on overflow.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount.saturating_mul(percent) / Decimal::ONE_HUNDRED
}
