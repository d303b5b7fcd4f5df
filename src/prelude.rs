//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{CatalogConfig, CatalogError},
    discounts::DiscountError,
    products::{Product, ProductError, ProductKind, Quantity},
    promotions::{
        PricingRule, Promotion, PromotionError, promotion,
        types::{PercentDiscountPromotion, SecondHalfPricePromotion, ThirdOneFreePromotion},
    },
    receipt::{Receipt, ReceiptError, ReceiptLine},
    store::{LineRejection, OrderLine, ProductKey, Store, StoreError},
};
