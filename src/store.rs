//! Store
//!
//! The product catalog and the ordering transaction.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    discounts::line_minor,
    products::{Product, ProductError, Quantity},
    receipt::{Receipt, ReceiptLine},
};

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

new_key_type! {
    /// Slot of a product within a single store
    struct SlotKey;
}

/// Product Key
///
/// Issued by [`Store::add_product`]. A key is only valid for the store that
/// issued it; every other store treats it as a non-member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProductKey {
    store: u64,
    slot: SlotKey,
}

/// Why an order line was rejected before purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRejection {
    /// The product key is not a member of the store.
    NotInStore,

    /// The product is not active.
    Inactive,

    /// The product does not have enough stock for the line.
    InsufficientStock {
        /// Units in stock
        available: u32,
        /// Units requested
        requested: u32,
    },
}

impl fmt::Display for LineRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRejection::NotInStore => f.write_str("product is not in the store"),
            LineRejection::Inactive => f.write_str("product is not active"),
            LineRejection::InsufficientStock {
                available,
                requested,
            } => write!(
                f,
                "not enough stock: available {available}, requested {requested}"
            ),
        }
    }
}

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order line failed validation. Earlier lines of the same order stay applied.
    #[error("invalid order line {line} ({product}): {reason}")]
    InvalidOrderLine {
        /// Zero-based index of the offending line
        line: usize,
        /// Product name, or the key when the product is not in the store
        product: String,
        /// Reason the line was rejected
        reason: LineRejection,
    },

    /// The product key is not a member of the store.
    #[error("product {0:?} is not in the store")]
    NotFound(ProductKey),

    /// A product is priced in a different currency than the store.
    #[error("product {name:?} is priced in {found}, but the store uses {expected}")]
    CurrencyMismatch {
        /// Product name
        name: String,
        /// Product currency code
        found: &'static str,
        /// Store currency code
        expected: &'static str,
    },

    /// A purchase was refused by the product.
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A (product, quantity) pair within an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    /// Product to purchase
    pub product: ProductKey,

    /// Units to purchase
    pub quantity: u32,
}

impl OrderLine {
    /// Create a new order line.
    pub fn new(product: ProductKey, quantity: u32) -> Self {
        Self { product, quantity }
    }
}

impl From<(ProductKey, u32)> for OrderLine {
    fn from((product, quantity): (ProductKey, u32)) -> Self {
        Self::new(product, quantity)
    }
}

/// Store
#[derive(Debug)]
pub struct Store<'a> {
    id: u64,
    products: SlotMap<SlotKey, Product<'a>>,
    insertion_order: Vec<ProductKey>,
    currency: &'static Currency,
}

impl<'a> Store<'a> {
    /// Create an empty store trading in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            products: SlotMap::with_key(),
            insertion_order: Vec::new(),
            currency,
        }
    }

    /// Create a store holding the given products, in order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CurrencyMismatch`] if a product is not priced in `currency`.
    pub fn with_products(
        products: impl IntoIterator<Item = Product<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, StoreError> {
        let mut store = Self::new(currency);

        for product in products {
            store.add_product(product)?;
        }

        Ok(store)
    }

    /// Add a product to the end of the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CurrencyMismatch`] if the product is not priced in
    /// the store currency.
    pub fn add_product(&mut self, product: Product<'a>) -> Result<ProductKey, StoreError> {
        let product_currency = product.price().currency();

        if product_currency != self.currency {
            return Err(StoreError::CurrencyMismatch {
                name: product.name().to_string(),
                found: product_currency.iso_alpha_code,
                expected: self.currency.iso_alpha_code,
            });
        }

        let key = ProductKey {
            store: self.id,
            slot: self.products.insert(product),
        };
        self.insertion_order.push(key);

        Ok(key)
    }

    /// Remove a product from the catalog, returning it.
    ///
    /// Its key is invalidated: later orders referencing it are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the key is not a member of the store.
    pub fn remove_product(&mut self, key: ProductKey) -> Result<Product<'a>, StoreError> {
        let product = self
            .slot(key)
            .and_then(|slot| self.products.remove(slot))
            .ok_or(StoreError::NotFound(key))?;

        self.insertion_order.retain(|member| *member != key);

        Ok(product)
    }

    /// Sum of the finite stock of every product, active or not.
    ///
    /// Non-stocked products have no finite stock and contribute nothing.
    pub fn total_quantity(&self) -> u64 {
        self.products
            .values()
            .filter_map(|product| product.quantity().units())
            .map(u64::from)
            .sum()
    }

    /// Products currently available for purchase, in insertion order.
    pub fn active_products(&self) -> Vec<(ProductKey, &Product<'a>)> {
        self.iter().filter(|(_, product)| product.is_active()).collect()
    }

    /// Every product in the catalog, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.insertion_order
            .iter()
            .filter_map(|&key| self.get(key).map(|product| (key, product)))
    }

    /// Look up a product by key
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.slot(key).and_then(|slot| self.products.get(slot))
    }

    /// Look up a product by key, mutably
    pub fn get_mut(&mut self, key: ProductKey) -> Option<&mut Product<'a>> {
        self.slot(key).and_then(|slot| self.products.get_mut(slot))
    }

    /// Whether the key is a member of the store
    pub fn contains(&self, key: ProductKey) -> bool {
        self.slot(key)
            .is_some_and(|slot| self.products.contains_key(slot))
    }

    fn slot(&self, key: ProductKey) -> Option<SlotKey> {
        (key.store == self.id).then_some(key.slot)
    }

    /// Key of the first product with the given name.
    pub fn find(&self, name: &str) -> Option<ProductKey> {
        self.iter()
            .find(|(_, product)| product.name() == name)
            .map(|(key, _)| key)
    }

    /// Number of products in the catalog
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency of the store
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Place an order and return its total price.
    ///
    /// See [`Store::checkout`] for validation and the partial-failure policy.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] for the first line that cannot be purchased.
    pub fn order<I>(&mut self, lines: I) -> Result<Money<'a, Currency>, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<OrderLine>,
    {
        Ok(self.checkout(lines)?.total()?)
    }

    /// Place an order and return the itemised receipt.
    ///
    /// Lines are processed in sequence. Each line must reference a member of
    /// the store, the product must be active and, unless it is non-stocked,
    /// hold enough stock. A valid line is purchased immediately.
    ///
    /// There is no rollback: when a line fails, the stock purchased by the
    /// lines before it stays deducted and the whole call returns the error.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidOrderLine`]: a line failed validation.
    /// - [`StoreError::Product`]: the product refused the purchase, e.g. over
    ///   the per-order cap of a limited product.
    /// - [`StoreError::Money`]: totalling the receipt failed.
    pub fn checkout<I>(&mut self, lines: I) -> Result<Receipt<'a>, StoreError>
    where
        I: IntoIterator,
        I::Item: Into<OrderLine>,
    {
        let mut receipt = Receipt::new(self.currency);

        for (line_idx, line) in lines.into_iter().map(Into::into).enumerate() {
            let product = self.validate_line(line_idx, line)?;

            let total = product.buy(line.quantity).inspect_err(|err| {
                warn!(line = line_idx, product = %product.name(), error = %err, "purchase refused");
            })?;

            // the charged total stands in when the undiscounted line overflows
            let base_price = line_minor(product.price(), line.quantity)
                .map_or(total, |minor| Money::from_minor(minor, product.price().currency()));

            debug!(
                line = line_idx,
                product = %product.name(),
                quantity = line.quantity,
                total = %total,
                "order line purchased"
            );

            receipt.push(ReceiptLine {
                product: line.product,
                name: product.name().to_string(),
                quantity: line.quantity,
                base_price,
                total,
                promotion: product.promotion().map(|promotion| promotion.name().to_string()),
            });
        }

        let total = receipt.total()?;

        info!(lines = receipt.lines().len(), %total, "order placed");

        Ok(receipt)
    }

    fn validate_line(
        &mut self,
        line_idx: usize,
        line: OrderLine,
    ) -> Result<&mut Product<'a>, StoreError> {
        let Some(product) = self.get_mut(line.product) else {
            warn!(line = line_idx, product = ?line.product, "order line rejected: not in store");

            return Err(StoreError::InvalidOrderLine {
                line: line_idx,
                product: format!("{:?}", line.product),
                reason: LineRejection::NotInStore,
            });
        };

        let rejection = match product.quantity() {
            _ if !product.is_active() => Some(LineRejection::Inactive),
            Quantity::Units(available) if line.quantity > available => {
                Some(LineRejection::InsufficientStock {
                    available,
                    requested: line.quantity,
                })
            }
            Quantity::Units(_) | Quantity::Unlimited => None,
        };

        match rejection {
            Some(reason) => {
                warn!(line = line_idx, product = %product.name(), %reason, "order line rejected");

                Err(StoreError::InvalidOrderLine {
                    line: line_idx,
                    product: product.name().to_string(),
                    reason,
                })
            }
            None => Ok(product),
        }
    }
}
