//! Product Configuration

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{catalog::CatalogError, products::Product};

/// Stock behaviour as written in YAML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKindConfig {
    /// Finite stock
    #[default]
    Stocked,

    /// Unlimited stock
    NonStocked,

    /// Finite stock with a per-order cap (`max_quantity`)
    Limited,
}

/// Product Configuration
#[derive(Debug, Deserialize)]
pub struct ProductConfig {
    /// Product name
    pub name: String,

    /// Unit price (e.g., "2.99 GBP")
    pub price: String,

    /// Units in stock, ignored for non-stocked products
    #[serde(default)]
    pub quantity: u32,

    /// Stock behaviour
    #[serde(default)]
    pub kind: ProductKindConfig,

    /// Per-order cap, required for limited products
    pub max_quantity: Option<u32>,

    /// Id of a promotion defined in the same catalog
    pub promotion: Option<String>,
}

impl ProductConfig {
    /// Build the product, without its promotion.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed, the fields do not fit
    /// the product kind, or the product itself is invalid.
    pub fn build(&self) -> Result<Product<'static>, CatalogError> {
        let (minor_units, currency) = parse_price(&self.price)?;
        let price = Money::from_minor(minor_units, currency);

        let product = match (self.kind, self.max_quantity) {
            (ProductKindConfig::Stocked, None) => {
                Product::new(self.name.clone(), price, self.quantity)?
            }
            (ProductKindConfig::NonStocked, None) => {
                Product::non_stocked(self.name.clone(), price)?
            }
            (ProductKindConfig::Limited, Some(max_quantity)) => {
                Product::limited(self.name.clone(), price, self.quantity, max_quantity)?
            }
            (ProductKindConfig::Limited, None) => {
                return Err(self.invalid("limited products need max_quantity"));
            }
            (ProductKindConfig::Stocked | ProductKindConfig::NonStocked, Some(_)) => {
                return Err(self.invalid("max_quantity is only valid for limited products"));
            }
        };

        Ok(product)
    }

    fn invalid(&self, reason: &'static str) -> CatalogError {
        CatalogError::InvalidProductData {
            product: self.name.clone(),
            reason,
        }
    }
}

/// Parse a currency code into one of the supported ISO currencies
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCurrency`] for anything but GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, CatalogError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(CatalogError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(currency_code)?))
}
