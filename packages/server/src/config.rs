use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Which handler serves `POST /webhook/analyze`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerMode {
    /// Structured task record (title, intent, priority, questions)
    #[default]
    Task,
    /// Conversational sales reply with prices from the sheet
    Sales,
}

impl FromStr for AnalyzerMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "sales" => Ok(Self::Sales),
            other => bail!("unknown analyzer mode '{}', expected 'task' or 'sales'", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub openai_model: String,
    pub openai_timeout: Duration,
    pub mode: AnalyzerMode,
    pub google_sheet_id: Option<String>,
    pub google_sheet_gid: Option<String>,
    pub price_cache_ttl: Duration,
    pub price_fetch_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mode = match non_empty("ANALYZER_MODE") {
            Some(raw) => raw.parse::<AnalyzerMode>().context("ANALYZER_MODE is invalid")?,
            None => AnalyzerMode::default(),
        };

        let google_sheet_id = non_empty("GOOGLE_SHEET_ID");
        if mode == AnalyzerMode::Sales && google_sheet_id.is_none() {
            bail!("GOOGLE_SHEET_ID must be set when ANALYZER_MODE=sales");
        }

        Ok(Self {
            port: non_empty("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: non_empty("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?,
            openai_base_url: non_empty("OPENAI_BASE_URL"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string()),
            openai_timeout: Duration::from_secs(
                non_empty("OPENAI_TIMEOUT_SECS")
                    .unwrap_or_else(|| "600".to_string())
                    .parse()
                    .context("OPENAI_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            mode,
            google_sheet_id,
            google_sheet_gid: non_empty("GOOGLE_SHEET_GID"),
            price_cache_ttl: Duration::from_secs(
                non_empty("PRICE_CACHE_TTL_SECS")
                    .unwrap_or_else(|| "600".to_string())
                    .parse()
                    .context("PRICE_CACHE_TTL_SECS must be a whole number of seconds")?,
            ),
            price_fetch_timeout: Duration::from_secs(
                non_empty("PRICE_FETCH_TIMEOUT_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse()
                    .context("PRICE_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.openai_timeout, Duration::from_secs(600));
        assert_eq!(config.mode, AnalyzerMode::Task);
        assert_eq!(config.price_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.price_fetch_timeout, Duration::from_secs(10));
        assert!(config.google_sheet_id.is_none());
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_sales_mode_requires_sheet() {
        let err = load(&[("OPENAI_API_KEY", "sk"), ("ANALYZER_MODE", "sales")]).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_SHEET_ID"));

        let config = load(&[
            ("OPENAI_API_KEY", "sk"),
            ("ANALYZER_MODE", "Sales"),
            ("GOOGLE_SHEET_ID", "abc"),
            ("PRICE_CACHE_TTL_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(config.mode, AnalyzerMode::Sales);
        assert_eq!(config.price_cache_ttl, Duration::ZERO);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(load(&[("OPENAI_API_KEY", "sk"), ("PORT", "eighty")]).is_err());
        assert!(load(&[("OPENAI_API_KEY", "sk"), ("ANALYZER_MODE", "chat")]).is_err());
        assert!(load(&[("OPENAI_API_KEY", "sk"), ("PRICE_CACHE_TTL_SECS", "-1")]).is_err());
        assert!(load(&[("OPENAI_API_KEY", "sk"), ("OPENAI_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn test_openai_timeout_override() {
        let config = load(&[("OPENAI_API_KEY", "sk"), ("OPENAI_TIMEOUT_SECS", "45")]).unwrap();
        assert_eq!(config.openai_timeout, Duration::from_secs(45));
    }
}
