//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    discounts::{DiscountError, line_minor},
    promotions::Promotion,
};

/// Errors raised by product construction and purchases.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// Name was empty or price was negative.
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// The product is not available for purchase.
    #[error("product {0:?} is not active")]
    InactiveProduct(String),

    /// Requested more units than are in stock.
    #[error("not enough stock for {name:?}: available {available}, requested {requested}")]
    OutOfStock {
        /// Product name
        name: String,
        /// Units in stock
        available: u32,
        /// Units requested
        requested: u32,
    },

    /// Requested more units than a limited product allows per order.
    #[error("{name:?} is limited to {max_quantity} per order, requested {requested}")]
    ExceedsMaxQuantity {
        /// Product name
        name: String,
        /// Per-order cap
        max_quantity: u32,
        /// Units requested
        requested: u32,
    },

    /// The line total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] DiscountError),
}

/// Stock behaviour of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    /// Finite stock, decremented by purchases.
    Stocked,

    /// Unlimited stock (licences, services); purchases never deplete it.
    NonStocked,

    /// Finite stock with a cap on units per order line.
    Limited {
        /// Maximum units per order line
        max_quantity: u32,
    },
}

impl ProductKind {
    /// Whether purchases draw down a finite stock.
    pub fn tracks_stock(self) -> bool {
        !matches!(self, ProductKind::NonStocked)
    }

    /// Per-order cap, for limited products.
    pub fn max_quantity(self) -> Option<u32> {
        match self {
            ProductKind::Limited { max_quantity } => Some(max_quantity),
            ProductKind::Stocked | ProductKind::NonStocked => None,
        }
    }
}

/// Stock available for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// A finite number of units
    Units(u32),

    /// No stock limit
    Unlimited,
}

impl Quantity {
    /// Finite unit count, `None` when unlimited.
    pub fn units(self) -> Option<u32> {
        match self {
            Quantity::Units(units) => Some(units),
            Quantity::Unlimited => None,
        }
    }

    /// Whether this stock can satisfy `requested` units.
    pub fn covers(self, requested: u32) -> bool {
        self.units().is_none_or(|units| requested <= units)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Units(units) => write!(f, "{units}"),
            Quantity::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    name: String,
    price: Money<'a, Currency>,
    quantity: u32,
    active: bool,
    kind: ProductKind,
    promotion: Option<Promotion>,
}

impl<'a> Product<'a> {
    /// Create a stocked product.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidProduct`] if the name is blank or the price is negative.
    pub fn new(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, ProductError> {
        Self::with_kind(name, price, quantity, ProductKind::Stocked)
    }

    /// Create a product with unlimited stock.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidProduct`] if the name is blank or the price is negative.
    pub fn non_stocked(
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, ProductError> {
        Self::with_kind(name, price, 0, ProductKind::NonStocked)
    }

    /// Create a stocked product capped at `max_quantity` units per order line.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidProduct`] if the name is blank, the price
    /// is negative or `max_quantity` is zero.
    pub fn limited(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        quantity: u32,
        max_quantity: u32,
    ) -> Result<Self, ProductError> {
        Self::with_kind(name, price, quantity, ProductKind::Limited { max_quantity })
    }

    /// Create a product of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidProduct`] if the name is blank, the price
    /// is negative or a limited product has a zero cap.
    pub fn with_kind(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        quantity: u32,
        kind: ProductKind,
    ) -> Result<Self, ProductError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ProductError::InvalidProduct(
                "name must not be empty".to_string(),
            ));
        }

        if price.to_minor_units() < 0 {
            return Err(ProductError::InvalidProduct(format!(
                "price of {name:?} must not be negative"
            )));
        }

        if kind.max_quantity() == Some(0) {
            return Err(ProductError::InvalidProduct(format!(
                "per-order limit of {name:?} must be at least 1"
            )));
        }

        Ok(Self {
            name,
            price,
            quantity,
            active: !kind.tracks_stock() || quantity > 0,
            kind,
            promotion: None,
        })
    }

    /// Attach a promotion, consuming and returning the product.
    #[must_use]
    pub fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// Return the product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the unit price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Return the product kind
    pub fn kind(&self) -> ProductKind {
        self.kind
    }

    /// Return the attached promotion, if any
    pub fn promotion(&self) -> Option<&Promotion> {
        self.promotion.as_ref()
    }

    /// Attach a promotion, replacing any previous one.
    pub fn set_promotion(&mut self, promotion: Promotion) {
        self.promotion = Some(promotion);
    }

    /// Detach the current promotion, returning it.
    pub fn clear_promotion(&mut self) -> Option<Promotion> {
        self.promotion.take()
    }

    /// Return the available stock
    pub fn quantity(&self) -> Quantity {
        if self.kind.tracks_stock() {
            Quantity::Units(self.quantity)
        } else {
            Quantity::Unlimited
        }
    }

    /// Reset the stock. Zero deactivates the product, anything else activates it.
    ///
    /// Non-stocked products keep unlimited stock and are left untouched.
    pub fn set_quantity(&mut self, quantity: u32) {
        if !self.kind.tracks_stock() {
            debug!(product = %self.name, quantity, "ignoring stock reset on non-stocked product");
            return;
        }

        self.quantity = quantity;
        self.active = quantity > 0;
    }

    /// Whether the product can currently be purchased
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the product as purchasable.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Mark the product as not purchasable.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Price `quantity` units without touching stock.
    ///
    /// Uses the attached promotion when present, otherwise the flat unit price.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::Pricing`] if the total cannot be represented.
    pub fn price_for(&self, quantity: u32) -> Result<Money<'a, Currency>, ProductError> {
        let total = match &self.promotion {
            Some(promotion) => promotion.line_total(&self.price, quantity)?,
            None => Money::from_minor(line_minor(&self.price, quantity)?, self.price.currency()),
        };

        Ok(total)
    }

    /// Purchase `quantity` units, returning the line total.
    ///
    /// Every precondition is checked and the line priced before stock is
    /// decremented, so a failed purchase leaves the product unchanged. A
    /// purchase that empties the stock deactivates the product.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InactiveProduct`]: the product is not active.
    /// - [`ProductError::ExceedsMaxQuantity`]: over the per-order cap of a limited product.
    /// - [`ProductError::OutOfStock`]: more units requested than are in stock.
    /// - [`ProductError::Pricing`]: the line total cannot be represented.
    pub fn buy(&mut self, quantity: u32) -> Result<Money<'a, Currency>, ProductError> {
        if !self.active {
            return Err(ProductError::InactiveProduct(self.name.clone()));
        }

        if let Some(max_quantity) = self.kind.max_quantity().filter(|max| quantity > *max) {
            return Err(ProductError::ExceedsMaxQuantity {
                name: self.name.clone(),
                max_quantity,
                requested: quantity,
            });
        }

        if !self.quantity().covers(quantity) {
            return Err(ProductError::OutOfStock {
                name: self.name.clone(),
                available: self.quantity,
                requested: quantity,
            });
        }

        let total = self.price_for(quantity)?;

        if self.kind.tracks_stock() {
            self.quantity -= quantity;

            if self.quantity == 0 {
                self.active = false;
                info!(product = %self.name, "stock depleted, product deactivated");
            }
        }

        Ok(total)
    }

    /// Render the product for listings.
    pub fn show(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Product<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Price: {}, ", self.name, self.price)?;

        match self.quantity() {
            Quantity::Units(units) => write!(f, "Quantity: {units}")?,
            Quantity::Unlimited => f.write_str("Quantity: unlimited available")?,
        }

        if let Some(max_quantity) = self.kind.max_quantity() {
            write!(f, ", Limited to {max_quantity} per order")?;
        }

        let promotion = self
            .promotion
            .as_ref()
            .map_or("no promotion", |promotion| promotion.name());

        write!(f, ", Promotion: {promotion}")
    }
}
