//! Chart styling configuration

use plotters::style::RGBColor;

/// Styling options applied to every rendered chart
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
    /// Background color (hex format)
    pub background_color: String,
    /// Primary color for bars (hex format)
    pub primary_color: String,
    /// Font family for text rendering
    pub font_family: String,
    /// Font size for labels
    pub font_size: u32,
}

impl Default for ChartStyle {
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

impl ChartStyle {
    /// Parse a hex color string to an RGBColor, defaulting to black
    pub fn parse_color(color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        RGBColor(0, 0, 0)
    }

    pub fn background(&self) -> RGBColor {
        Self::parse_color(&self.background_color)
    }

    pub fn primary(&self) -> RGBColor {
        Self::parse_color(&self.primary_color)
    }

    /// Categorical palette for multi-slice charts
    pub fn palette() -> Vec<RGBColor> {
        vec![
            RGBColor(31, 119, 180),  // Blue
            RGBColor(255, 127, 14),  // Orange
            RGBColor(44, 160, 44),   // Green
            RGBColor(214, 39, 40),   // Red
            RGBColor(148, 103, 189), // Purple
            RGBColor(140, 86, 75),   // Brown
            RGBColor(227, 119, 194), // Pink
            RGBColor(127, 127, 127), // Gray
        ]
    }
}
