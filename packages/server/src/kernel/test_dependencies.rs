// Mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use openai_client::ChatRequest;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::BaseAI;
use crate::common::DatasetFetcher;
use crate::domains::sales::models::PriceRecord;

// =============================================================================
// Mock AI
// =============================================================================

/// Replays queued replies in order, then repeats the last one.
pub struct MockAI {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    last: Arc<Mutex<Option<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a raw reply.
    pub fn with_response(self, content: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(content.to_string()));
        self
    }

    /// Queue a failed completion.
    pub fn with_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Get all requests sent to the model
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        let outcome = match next {
            Some(outcome) => {
                *self.last.lock().unwrap() = Some(outcome.clone());
                outcome
            }
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Ok("{}".to_string())),
        };

        outcome.map_err(|message| anyhow!(message))
    }
}

// =============================================================================
// Mock Price Source
// =============================================================================

pub struct MockPriceSource {
    outcome: Mutex<Result<Vec<PriceRecord>, String>>,
    fetches: AtomicUsize,
}

impl MockPriceSource {
    /// Starts with an empty sheet.
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(Ok(Vec::new())),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_records(self, records: Vec<PriceRecord>) -> Self {
        self.set_records(records);
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        self.set_error(message);
        self
    }

    pub fn set_records(&self, records: Vec<PriceRecord>) {
        *self.outcome.lock().unwrap() = Ok(records);
    }

    /// Make every following fetch fail.
    pub fn set_error(&self, message: &str) {
        *self.outcome.lock().unwrap() = Err(message.to_string());
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MockPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetFetcher<PriceRecord> for MockPriceSource {
    async fn fetch(&self) -> Result<Vec<PriceRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| anyhow!(message))
    }
}
