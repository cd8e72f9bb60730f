//! Text-generation API client with rate limiting and retry logic
//!
//! Talks to a Cohere-style `generate` endpoint to turn the summary facts
//! into a short business-style sales summary. The credential is optional at
//! construction time; a missing key fails the first request, not startup.

use crate::error::{Result, SalesBoardError};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, error, info, instrument, warn};

/// Configuration for the text-generation API client
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Base URL of the generation API
    pub base_url: String,
    /// API key for authentication; `None` means unconfigured
    pub api_key: Option<String>,
    /// Model identifier to request
    pub model: String,
    /// Maximum tokens in the generated summary
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Rate limit: requests per second (default: 5)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cohere.ai".to_string(),
            api_key: None,
            model: "command".to_string(),
            max_tokens: 200,
            temperature: 0.6,
            timeout_secs: 30,
            rate_limit_per_sec: 5,
            max_retries: 3,
        }
    }
}

impl GenerationConfig {
    /// Create a new configuration with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Request body for the generate endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

/// A single generation in the API response
#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

/// Response body of the generate endpoint
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generations: Vec<Generation>,
    /// Error message populated by the API on failure responses
    #[serde(default)]
    message: Option<String>,
}

/// Text-generation API client with rate limiting and retries
#[derive(Debug, Clone)]
pub struct GenerationClient {
    client: Client,
    config: GenerationConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl GenerationClient {
    /// Create a new generation client with the given configuration
    pub fn new(config: GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SalesBoardError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| SalesBoardError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }

    /// Generate a summary for the given prompt
    #[instrument(skip(self, prompt), fields(model = %self.config.model))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                SalesBoardError::generation("No API key configured for text generation")
            })?;

        self.rate_limiter.until_ready().await;

        let url = format!("{}/v1/generate", self.config.base_url.trim_end_matches('/'));
        debug!("Making generation request to: {}", url);

        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let response = Retry::spawn(retry_strategy, || async {
            let request = self
                .client
                .post(&url)
                .bearer_auth(api_key)
                .json(&body);

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        debug!("Generation request successful: {}", response.status());
                        Ok(response)
                    } else if response.status().is_client_error() {
                        error!("Client error from generation API: {}", response.status());
                        Err(SalesBoardError::generation_with_status(
                            format!("API returned client error: {}", response.status()),
                            response.status().as_u16(),
                        ))
                    } else {
                        warn!("Server error from generation API, will retry: {}", response.status());
                        Err(SalesBoardError::generation_with_status(
                            format!("API returned server error: {}", response.status()),
                            response.status().as_u16(),
                        ))
                    }
                }
                Err(e) if e.is_timeout() => {
                    warn!("Generation request timeout, will retry: {}", e);
                    Err(SalesBoardError::network_with_source("Request timeout", e))
                }
                Err(e) if e.is_connect() => {
                    warn!("Connection error, will retry: {}", e);
                    Err(SalesBoardError::network_with_source("Connection error", e))
                }
                Err(e) => {
                    error!("Generation request failed: {}", e);
                    Err(SalesBoardError::network_with_source("Request failed", e))
                }
            }
        })
        .await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SalesBoardError::network_with_source("Failed to read response body", e))?;

        let text = parsed
            .generations
            .into_iter()
            .next()
            .map(|g| g.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                SalesBoardError::generation(
                    parsed
                        .message
                        .unwrap_or_else(|| "Response contained no generations".to_string()),
                )
            })?;

        info!("Generated summary of {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, "command");
        assert_eq!(config.max_tokens, 200);
        assert!((config.temperature - 0.6).abs() < f32::EPSILON);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = GenerationConfig::new("secret")
            .with_base_url("http://localhost:9000/")
            .with_model("command-light")
            .with_timeout(5)
            .with_max_retries(1);

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.model, "command-light");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_unconfigured_client() {
        let client = GenerationClient::new(GenerationConfig::default()).unwrap();
        assert!(!client.is_configured());

        let client = GenerationClient::new(GenerationConfig::new("key")).unwrap();
        assert!(client.is_configured());
    }

    #[tokio::test]
    async fn test_generate_without_key_fails() {
        let client = GenerationClient::new(GenerationConfig::default()).unwrap();
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, SalesBoardError::Generation { .. }));
        assert!(err.to_string().contains("No API key"));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"generations":[{"text":"  A strong January.  "}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.generations.len(), 1);
        assert_eq!(parsed.generations[0].text.trim(), "A strong January.");

        let error_body = r#"{"message":"invalid api token"}"#;
        let parsed: GenerateResponse = serde_json::from_str(error_body).unwrap();
        assert!(parsed.generations.is_empty());
        assert_eq!(parsed.message.as_deref(), Some("invalid api token"));
    }
}
