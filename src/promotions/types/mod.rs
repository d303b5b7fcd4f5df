//! Promotion Types

mod percent_discount;
mod second_half_price;
mod third_one_free;

pub use percent_discount::*;
pub use second_half_price::*;
pub use third_one_free::*;
