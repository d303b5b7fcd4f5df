//! Percent Discount
//!
//! A flat percentage off the whole line.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{DiscountError, line_minor, percent_of_minor},
    promotions::{PricingRule, PromotionError},
};

/// A Percent Discount Promotion
#[derive(Debug, Clone)]
pub struct PercentDiscountPromotion {
    name: String,
    percent: f64,
    rate: Percentage,
}

impl PercentDiscountPromotion {
    /// Create a new percent discount promotion, `percent` being in `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidPromotion`] if `percent` is outside
    /// `0..=100` or not a number.
    pub fn new(name: impl Into<String>, percent: f64) -> Result<Self, PromotionError> {
        let name = name.into();

        if !(0.0..=100.0).contains(&percent) {
            return Err(PromotionError::InvalidPromotion { name, percent });
        }

        Ok(Self {
            name,
            percent,
            rate: Percentage::from(percent / 100.0),
        })
    }

    /// Return the configured percentage (`0..=100`)
    pub fn percent(&self) -> f64 {
        self.percent
    }
}

impl PricingRule for PercentDiscountPromotion {
    fn name(&self) -> &str {
        &self.name
    }

    fn line_total<'a>(
        &self,
        unit_price: &Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let line = line_minor(unit_price, quantity)?;
        let discount = percent_of_minor(&self.rate, line)?;

        let total = line.checked_sub(discount).ok_or(DiscountError::Overflow)?;

        Ok(Money::from_minor(total, unit_price.currency()))
    }
}
