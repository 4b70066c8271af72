//! Dialog → task record.
//!
//! Sends the tail of a WhatsApp dialog to the model with the analyst prompt
//! and validates the reply against the task schema.

use std::time::Instant;

use openai_client::{ChatRequest, Message};
use thiserror::Error;
use tracing::{error, info};

use crate::domains::conversation::AnalyzeRequest;
use crate::domains::tasks::models::{SchemaViolation, TaskAnalysis};
use crate::kernel::ServerDeps;

/// Number of most recent messages forwarded to the model.
pub const TASK_HISTORY_WINDOW: usize = 20;

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1200;

// =============================================================================
// LLM Prompt
// =============================================================================

const TASK_ANALYSIS_PROMPT: &str = r#"Ты — помощник компании VT Group (наружная реклама, LED-экраны, мерч, полиграфия).
Проанализируй диалог из WhatsApp и верни ТОЛЬКО валидный JSON без markdown, пояснений и любого другого текста.

Используй строго эту схему (все поля обязательны, даже если пустые):

{
  "task_title": "короткое название задачи (1-3 слова, не длиннее 150 символов)",
  "task_description": "развёрнутое описание задачи с деталями",
  "intent": "вывеска" | "led-экран" | "мерч" | "полиграфия" | "другое",
  "client_need_summary": "суть потребности клиента в 1-3 предложениях",
  "executor": "manager" (нужен расчёт или КП) | "designer" (нужен дизайн или макет),
  "priority": "low" (просто интересуется) | "normal" (стандартно) | "high" (срочно, дедлайн меньше 3 дней),
  "need_clarification": true (не хватает данных) | false,
  "clarification_questions": [{"question": "конкретный вопрос клиенту"}] (не больше 5, только если need_clarification = true),
  "tags": ["дизайн", "монтаж", "срочно"],
  "required_files": ["логотип", "фото фасада"],
  "ai_status": "готово" (всё понятно) | "уточнение" (есть вопросы)
}

Определи intent по ключевым словам. Если клиент торопится, ставь priority "high".
Если не хватает размеров, бюджета или логотипа, ставь need_clarification = true и задай вопросы."#;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("completion request failed: {0:#}")]
    Completion(#[source] anyhow::Error),

    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

/// Chat request for the task analyzer: system prompt plus the last
/// [`TASK_HISTORY_WINDOW`] dialog turns in their original order.
pub fn build_task_request(model: &str, request: &AnalyzeRequest) -> ChatRequest {
    ChatRequest::new(model)
        .message(Message::system(TASK_ANALYSIS_PROMPT))
        .messages(request.recent_chat_messages(TASK_HISTORY_WINDOW))
        .temperature(TEMPERATURE)
        .max_tokens(MAX_TOKENS)
        .json_object()
}

/// Analyze a dialog into a validated task record.
pub async fn analyze_dialog(
    deps: &ServerDeps,
    request: &AnalyzeRequest,
) -> Result<TaskAnalysis, AnalyzeError> {
    let start = Instant::now();
    let chat = build_task_request(&deps.model, request);
    let forwarded = chat.messages.len() - 1;

    let result = complete_and_validate(deps, chat).await;

    match &result {
        Ok(analysis) => info!(
            task_id = request.task_id,
            messages = forwarded,
            intent = ?analysis.intent,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Dialog analyzed"
        ),
        Err(e) => error!(task_id = request.task_id, error = %e, "Dialog analysis failed"),
    }

    result
}

async fn complete_and_validate(
    deps: &ServerDeps,
    chat: ChatRequest,
) -> Result<TaskAnalysis, AnalyzeError> {
    let raw = deps
        .ai
        .complete_json(chat)
        .await
        .map_err(AnalyzeError::Completion)?;
    Ok(TaskAnalysis::from_model_output(&raw)?)
}
