//! Server dependencies for request handlers (using traits for testability)
//!
//! This module provides the central dependency container shared by all
//! domain activities. External services sit behind trait objects so tests
//! can swap in mocks.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{DatasetFetcher, TimedFallbackCache};
use crate::config::Config;
use crate::domains::sales::models::PriceRecord;
use crate::kernel::{BaseAI, GoogleSheetPriceSource, OpenAIAdapter};

/// Price sheet cache, one per process.
pub type PriceCache = TimedFallbackCache<PriceRecord>;

const DEFAULT_PRICE_TTL: Duration = Duration::from_secs(600);

/// Server dependencies accessible to activities
#[derive(Clone)]
pub struct ServerDeps {
    /// AI client for all LLM operations
    pub ai: Arc<dyn BaseAI>,
    /// Chat model id passed on every completion
    pub model: String,
    /// Price sheet behind a fallback cache (sales analyzer only)
    pub prices: Option<Arc<PriceCache>>,
    pub price_ttl: Duration,
}

impl ServerDeps {
    pub fn new(ai: Arc<dyn BaseAI>, model: impl Into<String>) -> Self {
        Self {
            ai,
            model: model.into(),
            prices: None,
            price_ttl: DEFAULT_PRICE_TTL,
        }
    }

    /// Build production dependencies from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ai = Arc::new(OpenAIAdapter::new(
            config.openai_api_key.clone(),
            config.openai_base_url.as_deref(),
            config.openai_timeout,
        )?);
        let mut deps = Self::new(ai, config.openai_model.clone())
            .with_price_ttl(config.price_cache_ttl);

        if let Some(sheet_id) = &config.google_sheet_id {
            let source = GoogleSheetPriceSource::new(
                sheet_id,
                config.google_sheet_gid.as_deref(),
                config.price_fetch_timeout,
            )?;
            deps = deps.with_price_source(Arc::new(source));
        }

        Ok(deps)
    }

    /// Dependencies with the given AI and no price sheet.
    pub fn for_tests(ai: Arc<dyn BaseAI>) -> Self {
        Self::new(ai, "gpt-4o")
    }

    /// Serve prices from `source` through a fresh fallback cache.
    pub fn with_price_source(self, source: Arc<dyn DatasetFetcher<PriceRecord>>) -> Self {
        self.with_price_cache(Arc::new(TimedFallbackCache::new(source)))
    }

    pub fn with_price_cache(mut self, cache: Arc<PriceCache>) -> Self {
        self.prices = Some(cache);
        self
    }

    pub fn with_price_ttl(mut self, ttl: Duration) -> Self {
        self.price_ttl = ttl;
        self
    }
}
