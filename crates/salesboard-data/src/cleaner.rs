//! Automatic cleaning of raw uploaded rows
//!
//! Mirrors the dashboard's "auto-cleaning" pass: exact duplicates, rows
//! with missing fields, rows with non-numeric sales, and rows with
//! unparseable dates are all dropped, and every removal is counted.

use crate::types::{CleaningReport, RawRow, RawTable, SalesRecord};
use chrono::{NaiveDate, NaiveDateTime};
use salesboard_common::{Result, SalesBoardError};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Date formats accepted during coercion, tried in order
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d/%m/%Y"];

/// Datetime formats accepted and truncated to their date part
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Clean a raw table into typed sales records plus a removal report.
///
/// Halts with a cleaning error when no rows survive; the aggregation steps
/// are guaranteed to never see an empty table.
#[instrument(skip(raw), fields(rows_in = raw.rows.len()))]
pub fn clean(raw: &RawTable) -> Result<(Vec<SalesRecord>, CleaningReport)> {
    let mut report = CleaningReport {
        rows_in: raw.rows.len(),
        ..CleaningReport::default()
    };

    if raw.rows.is_empty() {
        return Err(SalesBoardError::cleaning(
            "Uploaded file contains no data rows",
        ));
    }

    let mut seen: HashSet<&RawRow> = HashSet::with_capacity(raw.rows.len());
    let mut records = Vec::with_capacity(raw.rows.len());
    let mut sales_candidates = 0usize;

    for row in &raw.rows {
        // Exact-duplicate removal keeps the first occurrence, matching the
        // order-preserving semantics of the original dashboard.
        if !seen.insert(row) {
            report.duplicates_removed += 1;
            continue;
        }

        if !row.is_complete() {
            report.missing_removed += 1;
            continue;
        }

        sales_candidates += 1;
        let sales = match parse_sales(row.sales.as_deref().unwrap_or_default()) {
            Some(value) => value,
            None => {
                report.invalid_sales_removed += 1;
                continue;
            }
        };

        let date = match parse_date(row.date.as_deref().unwrap_or_default()) {
            Some(value) => value,
            None => {
                report.invalid_dates_removed += 1;
                continue;
            }
        };

        records.push(SalesRecord {
            date,
            product: row.product.clone().unwrap_or_default(),
            region: row.region.clone().unwrap_or_default(),
            sales,
        });
    }

    report.rows_out = records.len();

    if records.is_empty() {
        // Distinguish "nothing numeric in Sales" from general exhaustion so
        // the user sees the actual problem.
        if sales_candidates > 0 && report.invalid_sales_removed == sales_candidates {
            return Err(SalesBoardError::cleaning(
                "Sales column contains no numeric values",
            ));
        }
        return Err(SalesBoardError::cleaning(
            "Cleaning removed every row; nothing left to aggregate",
        ));
    }

    if report.rows_removed() > 0 {
        info!(
            "Cleaned data: {} row(s) removed ({} duplicate, {} missing, {} invalid sales, {} invalid dates)",
            report.rows_removed(),
            report.duplicates_removed,
            report.missing_removed,
            report.invalid_sales_removed,
            report.invalid_dates_removed,
        );
    } else {
        debug!("Data already clean, no rows removed");
    }

    Ok((records, report))
}

/// Coerce a sales cell to a finite number
fn parse_sales(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Coerce a date cell to a calendar date.
///
/// Unparseable dates drop the row during cleaning, the same policy as
/// non-numeric sales values; they never abort the whole upload.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    None
}
