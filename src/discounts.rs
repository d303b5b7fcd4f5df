//! Discounts
//!
//! Minor-unit money math shared by the promotion types.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Line arithmetic left the representable range of minor units.
    #[error("line total overflowed the representable money range")]
    Overflow,
}

/// Undiscounted total of `quantity` units at `unit_price`, in minor units.
///
/// # Errors
///
/// Returns [`DiscountError::Overflow`] if the product does not fit in an `i64`.
pub fn line_minor(unit_price: &Money<'_, Currency>, quantity: u32) -> Result<i64, DiscountError> {
    unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(DiscountError::Overflow)
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Fractional minor units are rounded half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or
/// cannot be represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn line_minor_multiplies_unit_price() -> TestResult {
        let price = Money::from_minor(250, GBP);

        assert_eq!(line_minor(&price, 4)?, 1000);
        assert_eq!(line_minor(&price, 0)?, 0);

        Ok(())
    }

    #[test]
    fn line_minor_reports_overflow() {
        let price = Money::from_minor(i64::MAX, GBP);

        assert_eq!(line_minor(&price, 2), Err(DiscountError::Overflow));
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        let half = Percentage::from(0.5);

        assert_eq!(percent_of_minor(&half, 3)?, 2);
        assert_eq!(percent_of_minor(&half, 1500)?, 750);

        Ok(())
    }

    #[test]
    fn percent_of_minor_thirty_percent() -> TestResult {
        let thirty = Percentage::from(0.3);

        assert_eq!(percent_of_minor(&thirty, 2000)?, 600);

        Ok(())
    }
}
