//! Receipt

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;

use crate::store::ProductKey;

/// Errors raised while totalling or rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Writing the rendered receipt failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A single purchased order line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Key of the purchased product
    pub product: ProductKey,

    /// Product name at the time of purchase
    pub name: String,

    /// Units purchased
    pub quantity: u32,

    /// Unit price times quantity, before promotions
    pub base_price: Money<'a, Currency>,

    /// Amount charged for the line
    pub total: Money<'a, Currency>,

    /// Name of the promotion that priced the line, if any
    pub promotion: Option<String>,
}

impl<'a> ReceiptLine<'a> {
    /// Amount saved on this line by its promotion.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.base_price.sub(self.total)
    }
}

/// Final receipt for a completed order.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 8]>,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create an empty receipt in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            lines: SmallVec::new(),
            currency,
        }
    }

    /// Record a purchased line.
    pub fn push(&mut self, line: ReceiptLine<'a>) {
        self.lines.push(line);
    }

    /// Purchased lines in order
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Currency of every amount on the receipt
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total cost before any promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a line is in a different currency.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.sum(|line| line.base_price)
    }

    /// Total amount charged.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a line is in a different currency.
    pub fn total(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.sum(|line| line.total)
    }

    /// Calculate the savings made by applying promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal()?.sub(self.total()?)
    }

    fn sum(
        &self,
        amount: impl Fn(&ReceiptLine<'a>) -> Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, MoneyError> {
        self.lines
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, line| {
                acc.add(amount(line))
            })
    }

    /// Render the receipt as a table followed by its totals.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if totalling or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Base Price", "Price", "Savings", "Promotion"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                line.base_price.to_string(),
                line.total.to_string(),
                line.savings()?.to_string(),
                line.promotion.clone().unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        writeln!(out, "{table}")?;
        writeln!(out, " Subtotal: {}", self.subtotal()?)?;
        writeln!(out, " Savings:  {}", self.savings()?)?;
        writeln!(out, " Total:    {}", self.total()?)?;

        Ok(())
    }
}
