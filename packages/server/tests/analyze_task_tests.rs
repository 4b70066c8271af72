//! End-to-end tests for the task analyzer webhook.

mod common;

use analyzer_core::kernel::MockAI;
use axum::http::StatusCode;
use common::*;
use openai_client::Role;
use serde_json::json;

#[tokio::test]
async fn analyze_returns_validated_task_record() {
    let harness = TestHarness::task(MockAI::new().with_response(&task_reply().to_string()));

    let (status, body) = harness
        .post_json("/webhook/analyze", &dialog_payload(4))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task_title"], "Световая вывеска");
    assert_eq!(body["intent"], "вывеска");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["ai_status"], "готово");
    assert_eq!(body["tags"], json!(["монтаж", "срочно"]));
}

#[tokio::test]
async fn fixed_task_path_matches_default_route() {
    let harness = TestHarness::task(MockAI::new().with_response(&task_reply().to_string()));

    let (status, body) = harness
        .post_json("/webhook/analyze/task", &dialog_payload(2))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["executor"], "manager");
}

#[tokio::test]
async fn only_last_twenty_messages_reach_the_model() {
    let harness = TestHarness::task(MockAI::new().with_response(&task_reply().to_string()));

    let (status, _) = harness
        .post_json("/webhook/analyze", &dialog_payload(25))
        .await;
    assert_eq!(status, StatusCode::OK);

    let calls = harness.ai.calls();
    assert_eq!(calls.len(), 1);

    let messages = &calls[0].messages;
    assert_eq!(messages.len(), 21);
    assert_eq!(messages[0].role, Role::System);
    assert_eq!(messages[1].content, "сообщение 5");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[20].content, "сообщение 24");
    assert_eq!(calls[0].temperature, Some(0.3));
    assert!(calls[0].response_format.is_some());
}

#[tokio::test]
async fn short_dialog_is_forwarded_whole() {
    let harness = TestHarness::task(MockAI::new().with_response(&task_reply().to_string()));

    harness
        .post_json("/webhook/analyze", &dialog_payload(3))
        .await;

    let messages = &harness.ai.calls()[0].messages;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1].content, "сообщение 0");
}

#[tokio::test]
async fn clarification_forces_status() {
    let mut reply = task_reply();
    reply["need_clarification"] = json!(true);
    reply["clarification_questions"] = json!([{ "question": "Какой размер вывески?" }]);
    reply["ai_status"] = json!("готово");

    let harness = TestHarness::task(MockAI::new().with_response(&reply.to_string()));
    let (status, body) = harness
        .post_json("/webhook/analyze", &dialog_payload(2))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ai_status"], "уточнение");
    assert_eq!(body["clarification_questions"][0]["question"], "Какой размер вывески?");
}

#[tokio::test]
async fn completion_failure_is_500_with_detail() {
    let harness = TestHarness::task(MockAI::new().with_error("upstream timed out"));

    let (status, body) = harness
        .post_json("/webhook/analyze", &dialog_payload(2))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap_or_default();
    assert!(detail.contains("upstream timed out"), "detail was {detail:?}");
}

#[tokio::test]
async fn unknown_intent_is_500() {
    let mut reply = task_reply();
    reply["intent"] = json!("сайт");

    let harness = TestHarness::task(MockAI::new().with_response(&reply.to_string()));
    let (status, body) = harness
        .post_json("/webhook/analyze", &dialog_payload(2))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn too_many_questions_is_500() {
    let mut reply = task_reply();
    reply["need_clarification"] = json!(true);
    reply["clarification_questions"] = json!((0..6)
        .map(|i| json!({ "question": format!("вопрос {i}") }))
        .collect::<Vec<_>>());

    let harness = TestHarness::task(MockAI::new().with_response(&reply.to_string()));
    let (status, body) = harness
        .post_json("/webhook/analyze", &dialog_payload(2))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap_or_default().contains("6 items"));
}

#[tokio::test]
async fn non_json_reply_is_500() {
    let harness = TestHarness::task(MockAI::new().with_response("Извините, не могу помочь"));

    let (status, _) = harness
        .post_json("/webhook/analyze", &dialog_payload(2))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn missing_dialog_history_is_rejected_before_the_model() {
    let harness = TestHarness::task(MockAI::new());

    let (status, body) = harness
        .post_json("/webhook/analyze", &json!({ "task_id": 1, "client_phone": "+7" }))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
    assert!(harness.ai.calls().is_empty());
}

#[tokio::test]
async fn invalid_json_body_is_rejected() {
    let harness = TestHarness::task(MockAI::new());

    let (status, body) = harness.post_raw("/webhook/analyze", "{not json").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
    assert!(harness.ai.calls().is_empty());
}

#[tokio::test]
async fn sales_route_is_absent_without_price_sheet() {
    let harness = TestHarness::task(MockAI::new());

    let (status, _) = harness
        .post_json("/webhook/analyze/sales", &dialog_payload(2))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
