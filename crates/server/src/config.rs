//! Server configuration

use std::time::Duration;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,https://medical-data-generator-liart.vercel.app";

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_rps: u32,
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    /// Per-call timeout for both the page fetch and the generation call
    pub upstream_timeout: Duration,
    /// Extra attempts after a failed generation call (0 or 1)
    pub generation_retries: u32,
    /// Age after which unclaimed results are swept; `None` keeps them forever
    pub result_ttl: Option<Duration>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            rate_limit_rps: 100,
            google_api_key: None,
            gemini_model: crate::ai::client::DEFAULT_MODEL.to_string(),
            upstream_timeout: Duration::from_secs(60),
            generation_retries: 0,
            result_ttl: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| split_origins(&v))
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: parse_var("RATE_LIMIT_RPS")
                .filter(|rps| *rps > 0)
                .unwrap_or(defaults.rate_limit_rps),
            google_api_key: std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.upstream_timeout),
            generation_retries: parse_var::<u32>("GENERATION_RETRIES")
                .map(|n| n.min(1))
                .unwrap_or(defaults.generation_retries),
            result_ttl: parse_var("RESULT_TTL_SECS").map(Duration::from_secs),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparsable environment variable");
            None
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
