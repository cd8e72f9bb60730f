//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    #[validate]
    pub server: ServerSettings,

    /// Text-generation API configuration
    #[serde(default)]
    #[validate]
    pub generation: GenerationSettings,

    /// Speech synthesis API configuration
    #[serde(default)]
    #[validate]
    pub speech: SpeechSettings,

    /// Chart rendering settings
    #[serde(default)]
    #[validate]
    pub chart: ChartSettings,

    /// Logging configuration
    #[serde(default)]
    #[validate]
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind the HTTP listener to
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Port to listen on
    #[validate(range(min = 1, message = "Port must be non-zero"))]
    pub port: u16,

    /// Maximum accepted upload size in megabytes
    #[validate(range(min = 1, max = 256, message = "Upload limit must be between 1 and 256 MB"))]
    pub max_upload_mb: u32,
}

/// Text-generation API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenerationSettings {
    /// Base URL of the generation API
    #[validate(url(message = "Generation base URL must be a valid URL"))]
    pub base_url: String,

    /// API key; read from the COHERE_API_KEY environment variable.
    /// Absence is not fatal at startup, only at the first request.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model identifier to request
    #[validate(length(min = 1, message = "Model cannot be empty"))]
    pub model: String,

    /// Maximum tokens in the generated summary
    #[validate(range(min = 1, max = 2048, message = "Max tokens must be between 1 and 2048"))]
    pub max_tokens: u32,

    /// Sampling temperature
    #[validate(range(min = 0.0, max = 2.0, message = "Temperature must be between 0.0 and 2.0"))]
    pub temperature: f32,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,
}

/// Speech synthesis API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SpeechSettings {
    /// TTS endpoint URL
    #[validate(url(message = "Speech endpoint must be a valid URL"))]
    pub endpoint: String,

    /// Language code for synthesis
    #[validate(length(min = 1, message = "Language code cannot be empty"))]
    pub lang: String,

    /// Maximum characters per synthesis request
    #[validate(range(min = 1, max = 500, message = "Chunk size must be between 1 and 500 characters"))]
    pub max_chunk_chars: u32,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartSettings {
    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be a valid hex color"))]
    pub background_color: String,

    /// Primary color for chart elements (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Primary color must be a valid hex color"))]
    pub primary_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Font size for labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use pretty console output
    pub pretty: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_mb: 16,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.cohere.ai".to_string(),
            api_key: None,
            model: "command".to_string(),
            max_tokens: 200,
            temperature: 0.6,
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            lang: "en".to_string(),
            max_chunk_chars: 200,
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 900,
            height: 480,
            background_color: "#FFFFFF".to_string(),
            primary_color: "#1F77B4".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 16,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            pretty: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            generation: GenerationSettings::default(),
            speech: SpeechSettings::default(),
            chart: ChartSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl From<&GenerationSettings> for salesboard_common::GenerationConfig {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout_secs: settings.timeout_seconds,
            max_retries: settings.max_retries as usize,
            ..Self::default()
        }
    }
}

impl From<&SpeechSettings> for salesboard_common::SpeechConfig {
    fn from(settings: &SpeechSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            lang: settings.lang.clone(),
            max_chunk_chars: settings.max_chunk_chars as usize,
            timeout_secs: settings.timeout_seconds,
            max_retries: settings.max_retries as usize,
            ..Self::default()
        }
    }
}
