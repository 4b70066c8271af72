pub mod price;

pub use price::{format_price_list, PriceRecord};
