//! Third One Free
//!
//! Every complete group of three units pays for two; the remainder pays full
//! price.

use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{DiscountError, line_minor},
    promotions::PricingRule,
};

/// A Third One Free Promotion
#[derive(Debug, Clone)]
pub struct ThirdOneFreePromotion {
    name: String,
}

impl ThirdOneFreePromotion {
    /// Create a new third one free promotion.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl PricingRule for ThirdOneFreePromotion {
    fn name(&self) -> &str {
        &self.name
    }

    fn line_total<'a>(
        &self,
        unit_price: &Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let paid_units = (quantity / 3) * 2 + quantity % 3;

        Ok(Money::from_minor(
            line_minor(unit_price, paid_units)?,
            unit_price.currency(),
        ))
    }
}
