//! Configuration management for the salesboard service

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    ChartSettings, Config, GenerationSettings, LoggingSettings, ServerSettings, SpeechSettings,
};
