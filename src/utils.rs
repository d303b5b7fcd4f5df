//! Utils

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use thiserror::Error;

use crate::store::{OrderLine, Store};

/// Errors raised while parsing or resolving order line arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineArgError {
    /// The argument is not of the form `NAME=QUANTITY`.
    #[error("expected NAME=QUANTITY, got {0:?}")]
    Format(String),

    /// The quantity is not a non-negative integer.
    #[error("invalid quantity in {0:?}")]
    Quantity(String),

    /// No product in the store has the given name.
    #[error("no product named {0:?}")]
    UnknownProduct(String),
}

/// An order line given on the command line as `NAME=QUANTITY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineArg {
    /// Product name
    pub product: String,

    /// Units to purchase
    pub quantity: u32,
}

impl LineArg {
    /// Resolve the product name against the store.
    ///
    /// # Errors
    ///
    /// Returns [`LineArgError::UnknownProduct`] if no product has that name.
    pub fn resolve(&self, store: &Store<'_>) -> Result<OrderLine, LineArgError> {
        let key = store
            .find(&self.product)
            .ok_or_else(|| LineArgError::UnknownProduct(self.product.clone()))?;

        Ok(OrderLine::new(key, self.quantity))
    }
}

impl FromStr for LineArg {
    type Err = LineArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (product, quantity) = s
            .rsplit_once('=')
            .ok_or_else(|| LineArgError::Format(s.to_string()))?;

        let product = product.trim();

        if product.is_empty() {
            return Err(LineArgError::Format(s.to_string()));
        }

        let quantity = quantity
            .trim()
            .parse()
            .map_err(|_err| LineArgError::Quantity(s.to_string()))?;

        Ok(Self {
            product: product.to_string(),
            quantity,
        })
    }
}

/// Arguments for the order example
#[derive(Debug, Parser)]
pub struct ExampleOrderArgs {
    /// Catalog configuration file
    #[clap(short, long, default_value = "fixtures/catalog.yml")]
    pub catalog: PathBuf,

    /// Order line as NAME=QUANTITY, may be repeated
    #[clap(short, long = "line")]
    pub lines: Vec<LineArg>,
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    #[test]
    fn parses_name_and_quantity() -> TestResult {
        let line: LineArg = "MacBook Air M2=2".parse()?;

        assert_eq!(line.product, "MacBook Air M2");
        assert_eq!(line.quantity, 2);

        Ok(())
    }

    #[test]
    fn splits_on_the_last_equals_sign() -> TestResult {
        let line: LineArg = "a=b = 3".parse()?;

        assert_eq!(line.product, "a=b");
        assert_eq!(line.quantity, 3);

        Ok(())
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            "Shipping".parse::<LineArg>(),
            Err(LineArgError::Format("Shipping".to_string()))
        );
        assert_eq!(
            "=1".parse::<LineArg>(),
            Err(LineArgError::Format("=1".to_string()))
        );
        assert_eq!(
            "Shipping=-1".parse::<LineArg>(),
            Err(LineArgError::Quantity("Shipping=-1".to_string()))
        );
    }

    #[test]
    fn resolves_against_the_store() -> TestResult {
        let mut store = Store::new(GBP);
        let key = store.add_product(Product::new("Cable", Money::from_minor(250, GBP), 10)?)?;

        let line: LineArg = "Cable=4".parse()?;
        assert_eq!(line.resolve(&store)?, OrderLine::new(key, 4));

        let missing: LineArg = "Charger=1".parse()?;
        assert_eq!(
            missing.resolve(&store),
            Err(LineArgError::UnknownProduct("Charger".to_string()))
        );

        Ok(())
    }

    #[test]
    fn parses_command_line() -> TestResult {
        let args = ExampleOrderArgs::try_parse_from([
            "order",
            "--catalog",
            "catalog.yml",
            "-l",
            "Cable=1",
            "--line",
            "Shipping=1",
        ])?;

        assert_eq!(args.catalog, PathBuf::from("catalog.yml"));
        assert_eq!(args.lines.len(), 2);

        Ok(())
    }
}
