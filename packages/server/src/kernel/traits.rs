// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Prompts and output schemas live in the domain layers.
//
// Naming convention: Base* for trait names (e.g., BaseAI)

use anyhow::Result;
use async_trait::async_trait;
use openai_client::ChatRequest;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Run a chat completion and return the raw reply text.
    async fn complete(&self, request: ChatRequest) -> Result<String>;

    /// Run a chat completion in JSON object mode.
    /// Parse with serde_json::from_str in calling code.
    async fn complete_json(&self, request: ChatRequest) -> Result<String> {
        self.complete(request.json_object()).await
    }
}
