//! Speech synthesis API client
//!
//! Converts the generated summary into MP3 audio through a translate-style
//! TTS endpoint. The endpoint caps the text length per request, so longer
//! summaries are split into chunks and the resulting MP3 segments are
//! concatenated.

use crate::error::{Result, SalesBoardError};
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::Client;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, error, info, instrument, warn};

/// Configuration for the speech synthesis client
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// TTS endpoint URL
    pub endpoint: String,
    /// Language code for synthesis (default: "en")
    pub lang: String,
    /// Maximum characters per synthesis request
    pub max_chunk_chars: usize,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Rate limit: requests per second (default: 5)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            lang: "en".to_string(),
            max_chunk_chars: 200,
            timeout_secs: 30,
            rate_limit_per_sec: 5,
            max_retries: 3,
        }
    }
}

impl SpeechConfig {
    /// Set the endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the language code
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Speech synthesis client with rate limiting and retries
#[derive(Debug, Clone)]
pub struct SpeechClient {
    client: Client,
    config: SpeechConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl SpeechClient {
    /// Create a new speech client with the given configuration
    pub fn new(config: SpeechConfig) -> Result<Self> {
        if config.max_chunk_chars == 0 {
            return Err(SalesBoardError::config(
                "Speech chunk size must be greater than 0",
            ));
        }

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

    /// Synthesize the given text into MP3 bytes
    #[instrument(skip(self, text), fields(text_len = text.len(), lang = %self.config.lang))]
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SalesBoardError::speech("No text available to speak"));
        }

        let chunks = split_text(text, self.config.max_chunk_chars);
        debug!("Synthesizing {} chunk(s)", chunks.len());

        let mut audio = Vec::new();
        for chunk in &chunks {
            let bytes = self.synthesize_chunk(chunk).await?;
            audio.extend_from_slice(&bytes);
        }

        info!("Synthesized {} bytes of audio from {} chunk(s)", audio.len(), chunks.len());
        Ok(audio)
    }

    /// Synthesize a single chunk of text
    async fn synthesize_chunk(&self, chunk: &str) -> Result<Vec<u8>> {
        self.rate_limiter.until_ready().await;

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let response = Retry::spawn(retry_strategy, || async {
            let request = self.client.get(&self.config.endpoint).query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", self.config.lang.as_str()),
                ("client", "tw-ob"),
            ]);

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        Ok(response)
                    } else if response.status().is_client_error() {
                        error!("Client error from speech API: {}", response.status());
                        Err(SalesBoardError::speech_with_status(
                            format!("API returned client error: {}", response.status()),
                            response.status().as_u16(),
                        ))
                    } else {
                        warn!("Server error from speech API, will retry: {}", response.status());
                        Err(SalesBoardError::speech_with_status(
                            format!("API returned server error: {}", response.status()),
                            response.status().as_u16(),
                        ))
                    }
                }
                Err(e) if e.is_timeout() => {
                    warn!("Speech request timeout, will retry: {}", e);
                    Err(SalesBoardError::network_with_source("Request timeout", e))
                }
                Err(e) => {
                    error!("Speech request failed: {}", e);
                    Err(SalesBoardError::network_with_source("Request failed", e))
                }
            }
        })
        .await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SalesBoardError::network_with_source("Failed to read audio body", e))?;

        if bytes.is_empty() {
            return Err(SalesBoardError::speech("Speech API returned empty audio"));
        }

        Ok(bytes.to_vec())
    }
}

/// Split text into chunks no longer than `max_chars`, preferring word
/// boundaries. A single word longer than the limit becomes its own chunk.
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
