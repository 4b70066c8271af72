// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::{strip_code_blocks, ChatRequest, OpenAIClient};

use super::BaseAI;

/// Wrapper around OpenAIClient that implements BaseAI trait
#[derive(Clone)]
pub struct OpenAIAdapter {
    client: OpenAIClient,
}

impl OpenAIAdapter {
    /// `timeout` bounds each completion call from connect to last body byte.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenAI")?;

        let client = OpenAIClient::new(api_key).with_http_client(http_client);
        let client = match base_url {
            Some(url) => client.with_base_url(url),
            None => client,
        };
        Ok(Self { client })
    }
}

#[async_trait]
impl BaseAI for OpenAIAdapter {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let model = request.model.clone();
        let message_count = request.messages.len();

        tracing::info!(model = %model, messages = message_count, "Calling OpenAI API");

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %model, "OpenAI API call failed");
                e
            })
            .context("Failed to call OpenAI API")?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "OpenAI token usage"
            );
        }

        // Models occasionally fence JSON even in json_object mode.
        Ok(strip_code_blocks(&response.content).to_string())
    }
}
