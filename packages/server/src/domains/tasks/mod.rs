pub mod activities;
pub mod models;

pub use activities::{analyze_dialog, AnalyzeError};
pub use models::TaskAnalysis;
