//! Second Half Price
//!
//! Every second unit on the line is charged at half price. The halved share
//! is the ceiling half of the quantity, so an odd unit lands in the halved
//! share.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{DiscountError, line_minor, percent_of_minor},
    promotions::PricingRule,
};

/// A Second Half Price Promotion
#[derive(Debug, Clone)]
pub struct SecondHalfPricePromotion {
    name: String,
}

impl SecondHalfPricePromotion {
    /// Create a new second half price promotion.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PricingRule for SecondHalfPricePromotion {
    fn name(&self) -> &str {
        &self.name
    }

    fn line_total<'a>(
        &self,
        unit_price: &Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let full_price_count = quantity / 2;
        let halved_count = quantity - full_price_count;

        let full_minor = line_minor(unit_price, full_price_count)?;
        let halved_minor = percent_of_minor(
            &Percentage::from(0.5),
            line_minor(unit_price, halved_count)?,
        )?;

        let total = full_minor
            .checked_add(halved_minor)
            .ok_or(DiscountError::Overflow)?;

        Ok(Money::from_minor(total, unit_price.currency()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn five_units_pay_two_full_and_three_halved() -> TestResult {
        let promo = SecondHalfPricePromotion::new("Second Half price!");

        let total = promo.line_total(&Money::from_minor(1000, GBP), 5)?;

        assert_eq!(total, Money::from_minor(3500, GBP));

        Ok(())
    }

    #[test]
    fn even_quantity_splits_evenly() -> TestResult {
        let promo = SecondHalfPricePromotion::new("Second Half price!");

        let total = promo.line_total(&Money::from_minor(1000, GBP), 4)?;

        assert_eq!(total, Money::from_minor(3000, GBP));

        Ok(())
    }

    #[test]
    fn odd_minor_units_round_once_per_line() -> TestResult {
        let promo = SecondHalfPricePromotion::new("Second Half price!");

        // one unit of 1p halved is 0.5p, rounded away from zero
        assert_eq!(
            promo.line_total(&Money::from_minor(1, GBP), 1)?,
            Money::from_minor(1, GBP)
        );

        // three halved units of 1p is 1.5p -> 2p, plus three full units
        assert_eq!(
            promo.line_total(&Money::from_minor(1, GBP), 6)?,
            Money::from_minor(5, GBP)
        );

        Ok(())
    }

    #[test]
    fn zero_quantity_is_free() -> TestResult {
        let promo = SecondHalfPricePromotion::new("Second Half price!");

        assert_eq!(
            promo.line_total(&Money::from_minor(1000, GBP), 0)?,
            Money::from_minor(0, GBP)
        );

        Ok(())
    }

    #[test]
    fn name_returns_constructor_value() {
        let promo = SecondHalfPricePromotion::new("Second Half price!");

        assert_eq!(promo.name(), "Second Half price!");
    }
}
