//! Dialog analysis webhooks.
//!
//! POST /webhook/analyze        - analyzer selected by ANALYZER_MODE
//! POST /webhook/analyze/task   - task record
//! POST /webhook/analyze/sales  - sales reply with prices

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::config::AnalyzerMode;
use crate::domains::conversation::AnalyzeRequest;
use crate::domains::sales::sales_reply;
use crate::domains::tasks::{analyze_dialog, TaskAnalysis};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;

/// Dispatch to the configured analyzer.
pub async fn analyze_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let response = match state.mode {
        AnalyzerMode::Task => analyze_task_handler(Extension(state), payload)
            .await?
            .into_response(),
        AnalyzerMode::Sales => analyze_sales_handler(Extension(state), payload)
            .await?
            .into_response(),
    };
    Ok(response)
}

pub async fn analyze_task_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<TaskAnalysis>, ApiError> {
    let Json(request) = payload?;
    let analysis = analyze_dialog(&state.deps, &request).await?;
    Ok(Json(analysis))
}

pub async fn analyze_sales_handler(
    Extension(state): Extension<AxumAppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let Json(request) = payload?;
    let reply = sales_reply(&state.deps, &request).await?;
    Ok(Json(reply))
}
