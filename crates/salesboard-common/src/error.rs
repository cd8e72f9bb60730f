//! Error types and utilities for salesboard

use thiserror::Error;

/// Result type alias for salesboard operations
pub type Result<T> = std::result::Result<T, SalesBoardError>;

/// Main error type for salesboard operations
#[derive(Error, Debug)]
pub enum SalesBoardError {
    /// Ingestion errors: unreadable files, missing required columns
    #[error("Ingestion error: {message}")]
    Ingest {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cleaning removed every row, nothing left to aggregate
    #[error("Cleaning error: {message}")]
    Cleaning { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (HTTP requests, etc.)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text-generation API related errors
    #[error("Generation API error: {message}")]
    Generation {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Speech synthesis API related errors
    #[error("Speech API error: {message}")]
    Speech {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chart rendering errors
    #[error("Chart error: {message}")]
    Chart {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SalesBoardError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new ingestion error
    pub fn ingest(msg: impl Into<String>) -> Self {
        Self::Ingest {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new ingestion error with source
    pub fn ingest_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Ingest {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new cleaning error
    pub fn cleaning(msg: impl Into<String>) -> Self {
        Self::Cleaning {
            message: msg.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new generation API error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new generation API error with HTTP status
    pub fn generation_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Generation {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new speech API error
    pub fn speech(msg: impl Into<String>) -> Self {
        Self::Speech {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new speech API error with HTTP status
    pub fn speech_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Speech {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new chart error
    pub fn chart(msg: impl Into<String>) -> Self {
        Self::Chart {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new chart error with source
    pub fn chart_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Chart {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error aborts the whole upload request.
    ///
    /// Ingestion and cleaning failures are unrecoverable for the upload;
    /// external collaborator failures (generation, speech, charts) are
    /// isolated and the rest of the dashboard still renders.
    pub fn is_fatal_for_upload(&self) -> bool {
        matches!(
            self,
            Self::Ingest { .. } | Self::Cleaning { .. } | Self::Validation { .. }
        )
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to SalesBoardError
impl From<reqwest::Error> for SalesBoardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::network_with_source(format!("HTTP error: {}", status_code), err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to SalesBoardError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for SalesBoardError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::chart_with_source("Chart rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = SalesBoardError::new("test message");
        assert!(error.to_string().contains("test message"));

        let ingest_error = SalesBoardError::ingest("missing column 'Sales'");
        assert!(ingest_error.to_string().contains("Ingestion error"));
        assert!(ingest_error.to_string().contains("missing column 'Sales'"));

        let generation_error = SalesBoardError::generation_with_status("rate limited", 429);
        assert!(generation_error.to_string().contains("Generation API error"));
        assert!(generation_error.to_string().contains("rate limited"));

        let speech_error = SalesBoardError::speech_with_status("server error", 500);
        assert!(speech_error.to_string().contains("Speech API error"));

        let validation_error = SalesBoardError::validation_field("invalid value", "Sales");
        assert!(validation_error.to_string().contains("Validation error"));
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped = SalesBoardError::ingest_with_source("Failed to read upload", io_error);

        assert!(wrapped.to_string().contains("Failed to read upload"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: SalesBoardError = io_error.into();

        assert!(err.to_string().contains("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"invalid": json}"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let err: SalesBoardError = serde_error.into();

        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_fatality_classification() {
        assert!(SalesBoardError::ingest("bad file").is_fatal_for_upload());
        assert!(SalesBoardError::cleaning("all rows removed").is_fatal_for_upload());
        assert!(!SalesBoardError::generation("API down").is_fatal_for_upload());
        assert!(!SalesBoardError::speech("API down").is_fatal_for_upload());
        assert!(!SalesBoardError::chart("render failed").is_fatal_for_upload());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle = SalesBoardError::config_with_source("Middle layer", root);
        let top = SalesBoardError::with_source("Top layer", middle);

        assert!(top.to_string().contains("Top layer"));

        let mut current: &dyn std::error::Error = &top;
        let mut error_count = 0;
        while let Some(source) = current.source() {
            current = source;
            error_count += 1;
        }
        assert!(error_count >= 2);
    }
}
