//! Payloads and model replies shared across integration tests.

use analyzer_core::domains::sales::models::PriceRecord;
use serde_json::{json, Value};

/// Webhook payload with `count` alternating user/assistant turns.
pub fn dialog_payload(count: usize) -> Value {
    let history: Vec<Value> = (0..count)
        .map(|i| {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            json!({ "role": role, "content": format!("сообщение {i}") })
        })
        .collect();

    json!({
        "task_id": 42,
        "client_phone": "+77011234567",
        "client_name": "Айгерим",
        "city": "Алматы",
        "dialog_history": history,
    })
}

/// A valid task record as the model would return it.
pub fn task_reply() -> Value {
    json!({
        "task_title": "Световая вывеска",
        "task_description": "Объёмные буквы с подсветкой 3x1 м для кофейни",
        "intent": "вывеска",
        "client_need_summary": "Клиенту нужна вывеска на фасад до открытия.",
        "executor": "manager",
        "priority": "high",
        "need_clarification": false,
        "clarification_questions": [],
        "tags": ["монтаж", "срочно"],
        "required_files": ["логотип"],
        "ai_status": "готово"
    })
}

pub fn price_record(pairs: &[(&str, &str)]) -> PriceRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
