//! Chart rendering for the salesboard dashboard
//!
//! Renders the monthly trend, top product/region bars, and the region
//! share pie into in-memory PNG images consumed by the dashboard page.

pub mod renderer;
pub mod style;

pub use renderer::ChartRenderer;
pub use style::ChartStyle;
