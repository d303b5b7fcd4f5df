//! Catalog configuration
//!
//! A store described in YAML: its currency, a set of named promotions that
//! products may share, and the products in listing order.
//!
//! ```yaml
//! currency: USD
//! promotions:
//!   thirty_percent:
//!     type: percent_discount
//!     name: "30% off!"
//!     percent: 30
//! products:
//!   - name: Windows License
//!     price: "125.00 USD"
//!     kind: non_stocked
//!     promotion: thirty_percent
//! ```

use std::{fs, path::Path, sync::Arc};

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    products::ProductError,
    promotions::{Promotion, PromotionError},
    store::{Store, StoreError},
};

pub mod products;
pub mod promotions;

pub use products::{ProductConfig, ProductKindConfig, parse_currency, parse_price};
pub use promotions::PromotionConfig;

/// Catalog configuration errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A product references a promotion that is not defined
    #[error("Product {product:?} references unknown promotion {promotion:?}")]
    PromotionNotFound {
        /// Product name
        product: String,
        /// Promotion id
        promotion: String,
    },

    /// Product fields do not fit the product kind
    #[error("Invalid product data for {product:?}: {reason}")]
    InvalidProductData {
        /// Product name
        product: String,
        /// What is wrong
        reason: &'static str,
    },

    /// Product construction error
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Promotion construction error
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Store assembly error
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Catalog configuration
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Store currency code (e.g. "USD")
    pub currency: String,

    /// Map of promotion id -> promotion
    #[serde(default)]
    pub promotions: FxHashMap<String, PromotionConfig>,

    /// Products in listing order
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

impl CatalogConfig {
    /// Parse a catalog from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Yaml`] if the document is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Build a store from the configuration.
    ///
    /// Each promotion is built once and shared by every product that references it.
    ///
    /// # Errors
    ///
    /// Returns an error if a currency, price, product or promotion is invalid,
    /// if a product references an undefined promotion, or if a product is not
    /// priced in the store currency.
    pub fn build(&self) -> Result<Store<'static>, CatalogError> {
        let currency = parse_currency(&self.currency)?;

        let promotions = self
            .promotions
            .iter()
            .map(|(id, config)| Ok((id.as_str(), config.build()?)))
            .collect::<Result<FxHashMap<&str, Promotion>, CatalogError>>()?;

        let mut store = Store::new(currency);

        for config in &self.products {
            let mut product = config.build()?;

            if let Some(id) = &config.promotion {
                let promotion =
                    promotions
                        .get(id.as_str())
                        .ok_or_else(|| CatalogError::PromotionNotFound {
                            product: config.name.clone(),
                            promotion: id.clone(),
                        })?;

                product.set_promotion(Arc::clone(promotion));
            }

            store.add_product(product)?;
        }

        debug!(
            products = store.len(),
            promotions = promotions.len(),
            currency = currency.iso_alpha_code,
            "catalog built"
        );

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{
        products::{Product, Quantity},
        store::OrderLine,
    };

    use super::*;

    const CATALOG: &str = r#"
currency: USD
promotions:
  second_half_price:
    type: second_half_price
    name: "Second Half price!"
  thirty_percent:
    type: percent_discount
    name: "30% off!"
    percent: 30
products:
  - name: MacBook Air M2
    price: "1450 USD"
    quantity: 100
    promotion: second_half_price
  - name: Windows License
    price: "125 USD"
    kind: non_stocked
    promotion: thirty_percent
  - name: Shipping
    price: "10 USD"
    quantity: 250
    kind: limited
    max_quantity: 1
"#;

    #[test]
    fn build_preserves_product_order() -> TestResult {
        let store = CatalogConfig::from_yaml_str(CATALOG)?.build()?;

        let names: Vec<_> = store.iter().map(|(_, product)| product.name()).collect();

        assert_eq!(names, ["MacBook Air M2", "Windows License", "Shipping"]);
        assert_eq!(store.currency(), USD);
        assert_eq!(store.total_quantity(), 350);

        Ok(())
    }

    #[test]
    fn build_attaches_shared_promotions() -> TestResult {
        let mut store = CatalogConfig::from_yaml_str(CATALOG)?.build()?;

        let laptop = store.find("MacBook Air M2").ok_or("missing laptop")?;
        let licence = store.find("Windows License").ok_or("missing licence")?;

        let total = store.order([OrderLine::new(laptop, 2), OrderLine::new(licence, 2)])?;

        // 1450 + 725 for the laptops, 250 less 30% for the licences
        assert_eq!(total, Money::from_minor(217_500 + 17_500, USD));
        assert_eq!(
            store.get(laptop).map(Product::quantity),
            Some(Quantity::Units(98))
        );

        Ok(())
    }

    #[test]
    fn unknown_promotion_reference_fails() -> TestResult {
        let yaml = r#"
currency: USD
products:
  - name: Google Pixel 7
    price: "500 USD"
    quantity: 250
    promotion: missing
"#;

        let result = CatalogConfig::from_yaml_str(yaml)?.build();

        assert!(matches!(
            result,
            Err(CatalogError::PromotionNotFound { ref promotion, .. }) if promotion == "missing"
        ));

        Ok(())
    }

    #[test]
    fn product_in_other_currency_fails() -> TestResult {
        let yaml = r#"
currency: USD
products:
  - name: Google Pixel 7
    price: "500 GBP"
    quantity: 250
"#;

        let result = CatalogConfig::from_yaml_str(yaml)?.build();

        assert!(matches!(
            result,
            Err(CatalogError::Store(StoreError::CurrencyMismatch { .. }))
        ));

        Ok(())
    }

    #[test]
    fn invalid_promotion_fails() -> TestResult {
        let yaml = r#"
currency: USD
promotions:
  too_generous:
    type: percent_discount
    name: "150% off!"
    percent: 150
"#;

        let result = CatalogConfig::from_yaml_str(yaml)?.build();

        assert!(matches!(
            result,
            Err(CatalogError::Promotion(PromotionError::InvalidPromotion { .. }))
        ));

        Ok(())
    }

    #[test]
    fn malformed_yaml_fails() {
        let result = CatalogConfig::from_yaml_str("currency: [USD");

        assert!(matches!(result, Err(CatalogError::Yaml(_))));
    }

    #[test]
    fn missing_file_fails() {
        let result = CatalogConfig::from_path("does/not/exist.yml");

        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
