pub mod dialog;

pub use dialog::{AnalyzeRequest, DialogMessage, DialogRole};
