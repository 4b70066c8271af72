pub mod models;

pub use models::{AnalyzeRequest, DialogMessage, DialogRole};
