//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod price_sheet;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIAdapter;
pub use deps::{PriceCache, ServerDeps};
pub use price_sheet::{parse_price_csv, GoogleSheetPriceSource};
pub use test_dependencies::{MockAI, MockPriceSource};
pub use traits::*;
