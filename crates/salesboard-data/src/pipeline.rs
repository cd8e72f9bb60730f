//! The full upload-to-dashboard pipeline
//!
//! A pure, single-pass transformation: ingest, clean, aggregate. No
//! retries, no caching, no shared state; every upload runs independently.

use crate::aggregator::{aggregate_by_month, best_month, top_by_key, totals_by_key};
use crate::cleaner::clean;
use crate::ingest::{ingest, TableFormat};
use crate::types::{DashboardData, SummaryFacts};
use salesboard_common::Result;
use tracing::{info, instrument};

/// Orchestrates the ingestion, cleaning, and aggregation steps
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesPipeline;

impl SalesPipeline {
    pub fn new() -> Self {
        Self
    }

    /// Run the whole pipeline on an uploaded file.
    ///
    /// Ingestion and cleaning errors abort the run; aggregation only ever
    /// sees a non-empty cleaned table.
    #[instrument(skip(self, bytes), fields(bytes = bytes.len(), format = ?format))]
    pub fn run(&self, bytes: &[u8], format: TableFormat) -> Result<DashboardData> {
        let raw = ingest(bytes, format)?;
        let (records, report) = clean(&raw)?;

        let monthly = aggregate_by_month(&records);
        let product_totals = totals_by_key(&records, |r| &r.product);
        let region_totals = totals_by_key(&records, |r| &r.region);

        let facts = SummaryFacts {
            top_product: top_by_key(&records, |r| &r.product)?,
            top_region: top_by_key(&records, |r| &r.region)?,
            best_month: best_month(&monthly)?,
        };

        info!(
            "Pipeline complete: {} record(s), {} month(s), top product '{}', top region '{}', best month {}",
            records.len(),
            monthly.len(),
            facts.top_product.key,
            facts.top_region.key,
            facts.best_month.label,
        );

        Ok(DashboardData {
            records,
            report,
            monthly,
            product_totals,
            region_totals,
            facts,
        })
    }
}
