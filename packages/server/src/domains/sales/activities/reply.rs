//! Dialog + price sheet → conversational sales reply.
//!
//! The reply format is owned by the prompt. The only check on the model's
//! answer is that it is a JSON object.

use std::sync::Arc;
use std::time::Instant;

use openai_client::{ChatRequest, Message};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::domains::conversation::AnalyzeRequest;
use crate::domains::sales::models::{format_price_list, PriceRecord};
use crate::kernel::ServerDeps;

/// Number of most recent messages forwarded to the model.
pub const SALES_HISTORY_WINDOW: usize = 15;

const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 1000;

const SALES_PROMPT: &str = r#"Ты — менеджер по продажам компании VT Group (наружная реклама, LED-экраны, мерч, полиграфия).
Ты переписываешься с клиентом в WhatsApp. Отвечай дружелюбно, коротко и по делу, на языке клиента.
Используй только цены из прайс-листа ниже. Если нужной позиции нет, не выдумывай цену, а предложи уточнить у менеджера.

Верни ТОЛЬКО валидный JSON-объект без markdown:
{
  "reply": "текст ответа клиенту",
  "items": [{"name": "позиция из прайса", "quantity": 1, "unit_price": 0, "total": 0}],
  "estimated_total": 0,
  "currency": "валюта из прайса",
  "next_step": "что нужно от клиента дальше"
}"#;

#[derive(Debug, Error)]
pub enum SalesError {
    #[error("completion request failed: {0:#}")]
    Completion(#[source] anyhow::Error),

    #[error("model output is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model output must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
}

fn client_context(request: &AnalyzeRequest) -> String {
    let mut lines = Vec::new();
    if let Some(name) = &request.client_name {
        lines.push(format!("Имя клиента: {}", name));
    }
    if let Some(city) = &request.city {
        lines.push(format!("Город: {}", city));
    }
    lines.push(format!("Канал: {}", request.channel));
    lines.join("\n")
}

/// System prompt with the price list and what we know about the client.
pub fn build_sales_prompt(request: &AnalyzeRequest, prices: &[PriceRecord]) -> String {
    format!(
        "{}\n\nПрайс-лист:\n{}\n\nО клиенте:\n{}",
        SALES_PROMPT,
        format_price_list(prices),
        client_context(request)
    )
}

/// Chat request for the sales assistant: price-aware system prompt plus the
/// last [`SALES_HISTORY_WINDOW`] dialog turns in their original order.
pub fn build_sales_request(
    model: &str,
    request: &AnalyzeRequest,
    prices: &[PriceRecord],
) -> ChatRequest {
    ChatRequest::new(model)
        .message(Message::system(build_sales_prompt(request, prices)))
        .messages(request.recent_chat_messages(SALES_HISTORY_WINDOW))
        .temperature(TEMPERATURE)
        .max_tokens(MAX_TOKENS)
        .json_object()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse the model's reply, accepting any JSON object.
pub fn parse_sales_reply(raw: &str) -> Result<Map<String, Value>, SalesError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(reply) => Ok(reply),
        other => Err(SalesError::NotAnObject {
            kind: json_kind(&other),
        }),
    }
}

/// Produce a sales reply for a dialog using the cached price sheet.
///
/// Price sheet outages never fail the request: the cache serves the last
/// good price list, or an empty one before the first successful fetch.
pub async fn sales_reply(
    deps: &ServerDeps,
    request: &AnalyzeRequest,
) -> Result<Map<String, Value>, SalesError> {
    let start = Instant::now();

    let prices = match &deps.prices {
        Some(cache) => cache.get(deps.price_ttl).await,
        None => Arc::from(Vec::<PriceRecord>::new()),
    };
    let chat = build_sales_request(&deps.model, request, &prices);

    let result = complete_and_parse(deps, chat).await;

    match &result {
        Ok(_) => info!(
            task_id = request.task_id,
            price_records = prices.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Sales reply generated"
        ),
        Err(e) => error!(task_id = request.task_id, error = %e, "Sales reply failed"),
    }

    result
}

async fn complete_and_parse(
    deps: &ServerDeps,
    chat: ChatRequest,
) -> Result<Map<String, Value>, SalesError> {
    let raw = deps
        .ai
        .complete_json(chat)
        .await
        .map_err(SalesError::Completion)?;
    parse_sales_reply(&raw)
}
