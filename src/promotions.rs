//! Promotions
//!
//! A promotion is a named, stateless pricing rule. Products hold at most one
//! and the same promotion may be attached to any number of products.

use std::{fmt, sync::Arc};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::discounts::DiscountError;

pub mod types;

/// Errors raised while constructing promotions.
#[derive(Debug, Error, PartialEq)]
pub enum PromotionError {
    /// Percentage discounts must lie within `0..=100`.
    #[error("invalid promotion {name:?}: percent {percent} is outside 0..=100")]
    InvalidPromotion {
        /// Promotion name
        name: String,
        /// Rejected percentage
        percent: f64,
    },
}

/// Pricing capability shared by every promotion type.
pub trait PricingRule: fmt::Debug {
    /// Display name of the promotion.
    fn name(&self) -> &str;

    /// Total price for `quantity` units at `unit_price` with this promotion applied.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] if the line total cannot be represented.
    fn line_total<'a>(
        &self,
        unit_price: &Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, DiscountError>;
}

/// Promotion object attached to products.
pub type Promotion = Arc<dyn PricingRule>;

/// Convert any pricing rule into a shared promotion object.
pub fn promotion<P>(promotion: P) -> Promotion
where
    P: PricingRule + 'static,
{
    Arc::new(promotion)
}
