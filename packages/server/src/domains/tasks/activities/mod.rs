pub mod analyze;

pub use analyze::{analyze_dialog, build_task_request, AnalyzeError, TASK_HISTORY_WINDOW};
