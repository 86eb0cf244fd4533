// src/config.rs
use anyhow::{Context, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_STABILITY_BASE_URL: &str = "https://api.stability.ai";
pub const DEFAULT_CREDIT_CEILING: usize = 25;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub openai_api_key: Option<String>,
    pub stability_api_key: Option<String>,
    pub openai_base_url: String,
    pub stability_base_url: String,
    pub redis_url: Option<String>,
    pub credit_ceiling: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credit_ceiling = match get("CREDIT_CEILING") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("CREDIT_CEILING must be a non-negative integer, got {raw:?}"))?,
            None => DEFAULT_CREDIT_CEILING,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            stability_api_key: get("STABILITY_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            stability_base_url: get("STABILITY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STABILITY_BASE_URL.to_string()),
            redis_url: get("REDIS_URL"),
            credit_ceiling,
        })
    }
}
