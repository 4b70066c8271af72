pub mod activities;
pub mod models;

pub use activities::{sales_reply, SalesError};
pub use models::PriceRecord;
