//! Conversion between display amounts and stored milli-units.
//!
//! Every persisted amount is an `i64` count of 1/1000ths of the display unit.
//! Display values are `Decimal` so a value with up to three fractional digits
//! survives the round trip exactly.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{MILLI_UNITS_PER_UNIT, STORAGE_DECIMAL_SCALE};
use crate::errors::{Error, Result};

/// Converts a display amount into storage units.
///
/// Extra fractional digits are rounded half away from zero to the nearest
/// milli-unit.
pub fn to_storage_units(display: Decimal) -> Result<i64> {
    let scaled = display
        .checked_mul(Decimal::from(MILLI_UNITS_PER_UNIT))
        .ok_or_else(|| Error::invalid("Amount is too large"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    i64::try_from(scaled).map_err(|_| Error::invalid("Amount is too large"))
}

/// Converts stored milli-units back into a display amount.
pub fn to_display_units(stored: i64) -> Decimal {
    Decimal::new(stored, STORAGE_DECIMAL_SCALE).normalize()
}

/// Parses a user supplied decimal string into storage units.
pub fn parse_display_amount(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("Amount is required"));
    }
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::invalid(format!("'{}' is not a valid amount", trimmed)))?;
    to_storage_units(value)
}
