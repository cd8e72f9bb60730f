//! Data types flowing through the sales pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single row as read from the uploaded file, before cleaning.
///
/// Fields are `None` when the cell was empty or missing. Extra columns in
/// the input are not carried; they are ignored by the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawRow {
    pub date: Option<String>,
    pub product: Option<String>,
    pub region: Option<String>,
    pub sales: Option<String>,
}

impl RawRow {
    /// Whether every required field carries a value
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.product.is_some() && self.region.is_some() && self.sales.is_some()
    }
}

/// The raw uploaded table after column resolution
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

/// A cleaned sales record with all fields coerced to their proper types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product: String,
    pub region: String,
    pub sales: f64,
}

/// Counts of rows removed during cleaning, broken down by reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows in the uploaded file (excluding the header)
    pub rows_in: usize,
    /// Rows surviving all cleaning steps
    pub rows_out: usize,
    /// Exact duplicates dropped (first occurrence kept)
    pub duplicates_removed: usize,
    /// Rows dropped for a missing required field
    pub missing_removed: usize,
    /// Rows dropped because `Sales` failed numeric coercion
    pub invalid_sales_removed: usize,
    /// Rows dropped because `Date` failed date parsing
    pub invalid_dates_removed: usize,
}

impl CleaningReport {
    /// Total number of rows removed by cleaning
    pub fn rows_removed(&self) -> usize {
        self.rows_in - self.rows_out
    }
}

/// Summed sales for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDataPoint {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub label: String,
}

impl MonthlyDataPoint {
    pub fn new(year: i32, month: u32, total: f64) -> Self {
        Self {
            year,
            month,
            total,
            label: format!("{}-{:02}", year, month),
        }
    }
}

/// Summed sales for one grouping key (product or region)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTotal {
    pub key: String,
    pub total: f64,
}

/// The three derived values used for charting and the summary prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryFacts {
    pub top_product: KeyTotal,
    pub top_region: KeyTotal,
    pub best_month: MonthlyDataPoint,
}

/// Everything one pipeline run produces for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub records: Vec<SalesRecord>,
    pub report: CleaningReport,
    pub monthly: Vec<MonthlyDataPoint>,
    /// Per-product totals, sorted by total descending
    pub product_totals: Vec<KeyTotal>,
    /// Per-region totals, sorted by total descending
    pub region_totals: Vec<KeyTotal>,
    pub facts: SummaryFacts,
}
