//! Chart rendering implementations

use crate::style::ChartStyle;
use image::ImageOutputFormat;
use plotters::element::Pie;
use plotters::prelude::*;
use salesboard_common::{Result, SalesBoardError};
use salesboard_data::{KeyTotal, MonthlyDataPoint};
use std::io::Cursor;
use tracing::{debug, instrument};

/// Maximum number of bars on the top product / top region charts
const TOP_N: usize = 10;

/// Renders dashboard charts into in-memory PNG images
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Bar chart of summed sales per calendar month, ascending
    #[instrument(skip(self, monthly))]
    pub fn monthly_trend(&self, monthly: &[MonthlyDataPoint]) -> Result<Vec<u8>> {
        let labels: Vec<String> = monthly.iter().map(|m| m.label.clone()).collect();
        let values: Vec<f64> = monthly.iter().map(|m| m.total).collect();
        self.bar_chart("Monthly Sales Trend", &labels, &values)
    }

    /// Bar chart of the highest-grossing products, descending
    #[instrument(skip(self, totals))]
    pub fn top_products(&self, totals: &[KeyTotal]) -> Result<Vec<u8>> {
        let top = &totals[..totals.len().min(TOP_N)];
        let labels: Vec<String> = top.iter().map(|t| t.key.clone()).collect();
        let values: Vec<f64> = top.iter().map(|t| t.total).collect();
        self.bar_chart("Top Performing Products", &labels, &values)
    }

    /// Bar chart of the highest-grossing regions, descending
    #[instrument(skip(self, totals))]
    pub fn top_regions(&self, totals: &[KeyTotal]) -> Result<Vec<u8>> {
        let top = &totals[..totals.len().min(TOP_N)];
        let labels: Vec<String> = top.iter().map(|t| t.key.clone()).collect();
        let values: Vec<f64> = top.iter().map(|t| t.total).collect();
        self.bar_chart("Top Performing Regions", &labels, &values)
    }

    /// Pie chart of the sales share per region.
    ///
    /// Only regions with a positive total can form a slice; negative or
    /// zero totals are skipped.
    #[instrument(skip(self, totals))]
    pub fn region_share(&self, totals: &[KeyTotal]) -> Result<Vec<u8>> {
        let slices: Vec<&KeyTotal> = totals.iter().filter(|t| t.total > 0.0).collect();
        if slices.is_empty() {
            return Err(SalesBoardError::chart(
                "No positive region totals to chart",
            ));
        }

        let (width, height) = (self.style.width, self.style.height);
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&self.style.background())?;

            let root = root.titled(
                "Sales by Region",
                (self.style.font_family.as_str(), self.style.font_size + 6),
            )?;

            let center = (width as i32 / 2, height as i32 / 2);
            let radius = f64::from(width.min(height)) * 0.32;
            let sizes: Vec<f64> = slices.iter().map(|t| t.total).collect();
            let labels: Vec<String> = slices.iter().map(|t| t.key.clone()).collect();
            let palette = ChartStyle::palette();
            let colors: Vec<RGBColor> = (0..slices.len())
                .map(|i| palette[i % palette.len()])
                .collect();

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.label_style(
                (self.style.font_family.as_str(), self.style.font_size).into_font(),
            );
            root.draw(&pie)?;
            root.present()?;
        }

        debug!("Rendered region share pie with {} slices", slices.len());
        self.encode_png(buffer)
    }

    /// Render a labeled bar chart into PNG bytes
    fn bar_chart(&self, title: &str, labels: &[String], values: &[f64]) -> Result<Vec<u8>> {
        if labels.is_empty() || labels.len() != values.len() {
            return Err(SalesBoardError::chart("No data points to chart"));
        }

        let (width, height) = (self.style.width, self.style.height);
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&self.style.background())?;

            let (y_min, y_max) = value_bounds(values);

            let mut chart = ChartBuilder::on(&root)
                .caption(
                    title,
                    (self.style.font_family.as_str(), self.style.font_size + 6),
                )
                .margin(12)
                .x_label_area_size(44)
                .y_label_area_size(72)
                .build_cartesian_2d((0..labels.len()).into_segmented(), y_min..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(labels.len().min(24))
                .x_label_formatter(&|segment| match segment {
                    SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                        labels.get(*i).cloned().unwrap_or_default()
                    }
                    SegmentValue::Last => String::new(),
                })
                .y_desc("Sales")
                .label_style((self.style.font_family.as_str(), self.style.font_size))
                .draw()?;

            let bar_color = self.style.primary();
            chart.draw_series(values.iter().enumerate().map(|(i, value)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), *value),
                    ],
                    bar_color.filled(),
                )
            }))?;

            root.present()?;
        }

        debug!("Rendered '{}' with {} bars", title, labels.len());
        self.encode_png(buffer)
    }

    /// Encode a raw RGB pixel buffer as PNG
    fn encode_png(&self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        let image = image::RgbImage::from_raw(self.style.width, self.style.height, buffer)
            .ok_or_else(|| SalesBoardError::chart("Pixel buffer has unexpected size"))?;

        let mut png = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .map_err(|e| SalesBoardError::chart_with_source("Failed to encode PNG", e))?;

        Ok(png)
    }
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartStyle::default())
    }
}

/// Y-axis bounds with a little headroom; always includes zero so bar
/// baselines stay anchored
fn value_bounds(values: &[f64]) -> (f64, f64) {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    for value in values {
        min = min.min(*value);
        max = max.max(*value);
    }
    if (max - min).abs() < f64::EPSILON {
        max = min + 1.0;
    }
    let padding = (max - min) * 0.05;
    (min - padding.min(0.0).abs(), max + padding)
}
