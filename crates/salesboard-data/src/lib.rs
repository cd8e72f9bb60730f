//! Ingestion, cleaning, and aggregation pipeline for salesboard
//!
//! Turns an uploaded tabular sales file into the cleaned record set, the
//! monthly aggregate, and the three summary facts (top product, top region,
//! best month) consumed by the chart renderer and the AI prompt.

pub mod aggregator;
pub mod cleaner;
pub mod ingest;
pub mod pipeline;
pub mod types;

pub use aggregator::{aggregate_by_month, best_month, top_by_key, totals_by_key};
pub use cleaner::clean;
pub use ingest::{ingest, TableFormat};
pub use pipeline::SalesPipeline;
pub use types::{
    CleaningReport, DashboardData, KeyTotal, MonthlyDataPoint, RawRow, RawTable, SalesRecord,
    SummaryFacts,
};
