//! Common utilities shared across the salesboard workspace
//!
//! Provides the workspace-wide error type and `Result` alias, the logging
//! bootstrap, and the clients for the two external collaborators (text
//! generation and speech synthesis).

pub mod error;
pub mod generation;
pub mod logging;
pub mod speech;

pub use error::{Result, SalesBoardError};
pub use generation::{GenerationClient, GenerationConfig};
pub use speech::{SpeechClient, SpeechConfig};
