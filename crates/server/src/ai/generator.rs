//! Synthetic clinical profile generation using Gemini

use async_trait::async_trait;
use medgen_core::{PROFILES_PER_REQUEST, build_prompt};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::client::{GeminiClient, GeminiError};

/// One generated profile object, before normalization
pub type Profile = Map<String, JsonValue>;

/// Why a generation attempt produced no usable profiles
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation model is not configured")]
    NotConfigured,

    #[error("generation call failed: {0}")]
    Upstream(#[from] GeminiError),

    #[error("generation returned no profiles")]
    NoProfiles,

    #[error("generation response is not valid profile JSON: {reason}")]
    Parse { reason: String, raw: String },
}

/// Source of generated profiles for a disease and its scraped context
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn generate(&self, disease_name: &str, context: &str)
    -> Result<Vec<Profile>, GenerationError>;
}

/// One raw JSON-mode model call
#[async_trait]
pub trait JsonCompletion: Send + Sync {
    async fn complete_json(&self, prompt: &str) -> Result<String, GeminiError>;
}

#[async_trait]
impl JsonCompletion for GeminiClient {
    async fn complete_json(&self, prompt: &str) -> Result<String, GeminiError> {
        self.generate_json(prompt).await
    }
}

/// Gemini-backed profile source with an explicit retry budget
pub struct GeminiGenerator<C = GeminiClient> {
    client: Option<C>,
    retries: u32,
}

impl<C: JsonCompletion> GeminiGenerator<C> {
    /// `client` is `None` when no API key is configured
    pub fn new(client: Option<C>, retries: u32) -> Self {
        Self { client, retries }
    }

    /// Only upstream call failures are retried; parsing happens afterwards
    async fn call_with_retries(&self, client: &C, prompt: &str) -> Result<String, GeminiError> {
        let mut attempt = 0;
        loop {
            match client.complete_json(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "Generation call failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<C: JsonCompletion> ProfileSource for GeminiGenerator<C> {
    async fn generate(
        &self,
        disease_name: &str,
        context: &str,
    ) -> Result<Vec<Profile>, GenerationError> {
        let client = self.client.as_ref().ok_or(GenerationError::NotConfigured)?;
        let prompt = build_prompt(disease_name, context);

        let response = self.call_with_retries(client, &prompt).await?;
        let profiles = parse_profiles(&response)?;

        if profiles.len() != PROFILES_PER_REQUEST {
            tracing::warn!(
                requested = PROFILES_PER_REQUEST,
                generated = profiles.len(),
                "Generated profile count mismatch"
            );
        }

        Ok(profiles)
    }
}

/// Parse the model's response text into profile objects.
///
/// A bare object is accepted as a single profile. Any element that is not an
/// object fails the whole response.
pub fn parse_profiles(text: &str) -> Result<Vec<Profile>, GenerationError> {
    let parse_error = |reason: String| GenerationError::Parse {
        reason,
        raw: text.to_string(),
    };

    let json_str = extract_json(text).ok_or_else(|| parse_error("no JSON payload found".into()))?;
    let parsed: JsonValue =
        serde_json::from_str(json_str).map_err(|e| parse_error(e.to_string()))?;

    let items = match parsed {
        JsonValue::Array(items) => items,
        JsonValue::Object(map) => vec![JsonValue::Object(map)],
        other => return Err(parse_error(format!("expected an array, got {other}"))),
    };

    let profiles = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Object(map) => Ok(map),
            _ => Err(parse_error(format!("element {i} is not an object"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if profiles.is_empty() {
        return Err(GenerationError::NoProfiles);
    }
    Ok(profiles)
}

/// Extract a JSON payload from text that might contain markdown code blocks
fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();

    // Direct JSON
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Some(trimmed);
    }

    // Wrapped in ```json ... ``` or ``` ... ```
    let start = trimmed.find("```")?;
    let after = &trimmed[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim())
}
