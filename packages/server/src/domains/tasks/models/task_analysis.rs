use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 150;
pub const MAX_CLARIFICATION_QUESTIONS: usize = 5;

/// Product line the client is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "вывеска")]
    Signage,
    #[serde(rename = "led-экран")]
    LedScreen,
    #[serde(rename = "мерч")]
    Merch,
    #[serde(rename = "полиграфия")]
    Printing,
    #[serde(rename = "другое")]
    Other,
}

/// Who picks the task up: a manager for quotes, a designer for layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Executor {
    Manager,
    Designer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiStatus {
    #[default]
    #[serde(rename = "готово")]
    Ready,
    #[serde(rename = "уточнение")]
    NeedsClarification,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clarification {
    pub question: String,
}

/// Task record produced from a dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAnalysis {
    pub task_title: String,
    pub task_description: String,
    pub intent: Intent,
    pub client_need_summary: String,
    pub executor: Executor,
    pub priority: Priority,
    #[serde(default)]
    pub need_clarification: bool,
    #[serde(default)]
    pub clarification_questions: Vec<Clarification>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub required_files: Vec<String>,
    #[serde(default)]
    pub ai_status: AiStatus,
}

/// Why a model reply was rejected.
#[derive(Debug, Error)]
pub enum SchemaViolation {
    /// Not JSON, missing field, wrong type, or unknown enum value
    #[error("model output does not match the task schema: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("task_title is {length} characters long, at most 150 allowed")]
    TitleTooLong { length: usize },

    #[error("clarification_questions has {count} items, at most 5 allowed")]
    TooManyQuestions { count: usize },
}

impl TaskAnalysis {
    /// Parse and validate raw model output, then apply the clarification rule.
    pub fn from_model_output(raw: &str) -> Result<Self, SchemaViolation> {
        let analysis: Self = serde_json::from_str(raw)?;
        analysis.validate()?;
        Ok(analysis.with_clarification_status())
    }

    /// Check the length limits serde cannot express.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        let length = self.task_title.chars().count();
        if length > MAX_TITLE_CHARS {
            return Err(SchemaViolation::TitleTooLong { length });
        }

        let count = self.clarification_questions.len();
        if count > MAX_CLARIFICATION_QUESTIONS {
            return Err(SchemaViolation::TooManyQuestions { count });
        }

        Ok(())
    }

    /// A task that needs clarification is never marked ready.
    pub fn with_clarification_status(mut self) -> Self {
        if self.need_clarification {
            self.ai_status = AiStatus::NeedsClarification;
        }
        self
    }
}
