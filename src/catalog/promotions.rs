//! Promotion Configuration

use serde::Deserialize;

use crate::promotions::{
    Promotion, PromotionError, promotion,
    types::{PercentDiscountPromotion, SecondHalfPricePromotion, ThirdOneFreePromotion},
};

/// Promotion configuration from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionConfig {
    /// Every second unit at half price
    SecondHalfPrice {
        /// Promotion name
        name: String,
    },

    /// Every third unit free
    ThirdOneFree {
        /// Promotion name
        name: String,
    },

    /// Flat percentage off the line
    PercentDiscount {
        /// Promotion name
        name: String,

        /// Percentage off, `0..=100`
        percent: f64,
    },
}

impl PromotionConfig {
    /// Build the shared promotion object.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidPromotion`] if a percentage is out of range.
    pub fn build(&self) -> Result<Promotion, PromotionError> {
        let built = match self {
            PromotionConfig::SecondHalfPrice { name } => {
                promotion(SecondHalfPricePromotion::new(name.clone()))
            }
            PromotionConfig::ThirdOneFree { name } => {
                promotion(ThirdOneFreePromotion::new(name.clone()))
            }
            PromotionConfig::PercentDiscount { name, percent } => {
                promotion(PercentDiscountPromotion::new(name.clone(), *percent)?)
            }
        };

        Ok(built)
    }
}
