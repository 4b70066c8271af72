pub mod task_analysis;

pub use task_analysis::{
    AiStatus, Clarification, Executor, Intent, Priority, SchemaViolation, TaskAnalysis,
    MAX_CLARIFICATION_QUESTIONS, MAX_TITLE_CHARS,
};
