//! Configuration loading utilities

use crate::Config;
use salesboard_common::Result as SalesBoardResult;
use std::env;
use std::path::Path;
use thiserror::Error;
use validator::Validate;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for salesboard_common::SalesBoardError {
    fn from(err: ConfigError) -> Self {
        salesboard_common::SalesBoardError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> SalesBoardResult<Config> {
        let config = if let Ok(config_path) = env::var("SALESBOARD_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("config.yaml").exists() {
            Self::load_config("config.yaml")?
        } else if Path::new("config.yml").exists() {
            Self::load_config("config.yml")?
        } else {
            // No config file found, use defaults with env overrides
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SalesBoardResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        // The one secret: never read from files, only from the environment.
        // Missing key is deliberately not an error here; the generation
        // client reports it at the first request instead.
        if let Ok(api_key) = env::var("COHERE_API_KEY") {
            if !api_key.is_empty() {
                config.generation.api_key = Some(api_key);
            }
        }

        if let Ok(model) = env::var("COHERE_MODEL") {
            config.generation.model = model;
        }

        if let Ok(base_url) = env::var("COHERE_BASE_URL") {
            config.generation.base_url = base_url;
        }

        // Server overrides
        if let Ok(host) = env::var("SALESBOARD_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = env::var("SALESBOARD_PORT") {
            config.server.port = port.parse().map_err(|e| ConfigError::EnvParseError {
                var: "SALESBOARD_PORT".to_string(),
                source: Box::new(e),
            })?;
        }

        // Speech overrides
        if let Ok(endpoint) = env::var("SPEECH_ENDPOINT") {
            config.speech.endpoint = endpoint;
        }

        if let Ok(lang) = env::var("SPEECH_LANG") {
            config.speech.lang = lang;
        }

        // Chart overrides
        if let Ok(width) = env::var("CHART_WIDTH") {
            config.chart.width = width.parse().map_err(|e| ConfigError::EnvParseError {
                var: "CHART_WIDTH".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Ok(height) = env::var("CHART_HEIGHT") {
            config.chart.height = height.parse().map_err(|e| ConfigError::EnvParseError {
                var: "CHART_HEIGHT".to_string(),
                source: Box::new(e),
            })?;
        }

        // Logging overrides
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}
