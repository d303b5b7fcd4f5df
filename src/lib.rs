//! Storefront
//!
//! Storefront is an in-memory retail catalog with promotion-aware pricing and
//! a stock-deducting order transaction.

pub mod catalog;
pub mod discounts;
pub mod prelude;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod store;
pub mod utils;
