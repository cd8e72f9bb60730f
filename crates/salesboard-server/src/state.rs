//! Shared application state

use salesboard_charts::{ChartRenderer, ChartStyle};
use salesboard_common::{GenerationClient, Result, SpeechClient};
use salesboard_config::{ChartSettings, Config};
use salesboard_data::SalesPipeline;
use std::sync::Arc;

/// State shared by every request handler.
///
/// Everything here is cheap to clone: the clients share their inner
/// connection pools and rate limiters through `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: SalesPipeline,
    pub renderer: ChartRenderer,
    pub generation: GenerationClient,
    pub speech: SpeechClient,
}

impl AppState {
    /// Build the full application state from a validated configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let generation = GenerationClient::new((&config.generation).into())?;
        let speech = SpeechClient::new((&config.speech).into())?;
        let renderer = ChartRenderer::new(chart_style(&config.chart));

        Ok(Self {
            config: Arc::new(config),
            pipeline: SalesPipeline::new(),
            renderer,
            generation,
            speech,
        })
    }

    /// Maximum accepted upload body size in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.config.server.max_upload_mb as usize * 1024 * 1024
    }
}

fn chart_style(settings: &ChartSettings) -> ChartStyle {
    ChartStyle {
        width: settings.width,
        height: settings.height,
        background_color: settings.background_color.clone(),
        primary_color: settings.primary_color.clone(),
        font_family: settings.font_family.clone(),
        font_size: settings.font_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_default_config() {
        let state = AppState::from_config(Config::default()).unwrap();
        assert!(!state.generation.is_configured());
        assert_eq!(state.max_upload_bytes(), 16 * 1024 * 1024);
    }

    #[test]
    fn test_chart_style_follows_settings() {
        let mut settings = ChartSettings::default();
        settings.width = 640;
        settings.primary_color = "#FF0000".to_string();

        let style = chart_style(&settings);
        assert_eq!(style.width, 640);
        assert_eq!(style.primary_color, "#FF0000");
    }
}
