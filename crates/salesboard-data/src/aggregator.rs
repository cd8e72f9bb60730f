//! Aggregation of cleaned sales records into monthly totals and top keys

use crate::types::{KeyTotal, MonthlyDataPoint, SalesRecord};
use chrono::Datelike;
use salesboard_common::{Result, SalesBoardError};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Group records by calendar month and sum sales per group.
///
/// The result is sorted ascending by (year, month) and carries one entry
/// for every month with at least one surviving row.
#[instrument(skip(records), fields(records = records.len()))]
pub fn aggregate_by_month(records: &[SalesRecord]) -> Vec<MonthlyDataPoint> {
    let mut monthly_totals: HashMap<(i32, u32), f64> = HashMap::new();

    for record in records {
        let key = (record.date.year(), record.date.month());
        *monthly_totals.entry(key).or_insert(0.0) += record.sales;
    }

    let mut result: Vec<MonthlyDataPoint> = monthly_totals
        .into_iter()
        .map(|((year, month), total)| MonthlyDataPoint::new(year, month, total))
        .collect();

    result.sort_by_key(|point| (point.year, point.month));

    debug!("Aggregated {} monthly data points", result.len());
    result
}

/// Group records by an arbitrary string key and sum sales per group.
///
/// Sorted by total descending; equal totals order lexicographically by key
/// so the result is deterministic.
pub fn totals_by_key(
    records: &[SalesRecord],
    key_fn: impl Fn(&SalesRecord) -> &str,
) -> Vec<KeyTotal> {
    let mut totals: HashMap<String, f64> = HashMap::new();

    for record in records {
        *totals.entry(key_fn(record).to_string()).or_insert(0.0) += record.sales;
    }

    let mut result: Vec<KeyTotal> = totals
        .into_iter()
        .map(|(key, total)| KeyTotal { key, total })
        .collect();

    result.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    result
}

/// Return the key with the maximum summed sales.
///
/// Never called on an empty table by the pipeline; defends with an error
/// anyway rather than panicking.
pub fn top_by_key(
    records: &[SalesRecord],
    key_fn: impl Fn(&SalesRecord) -> &str,
) -> Result<KeyTotal> {
    totals_by_key(records, key_fn)
        .into_iter()
        .next()
        .ok_or_else(|| SalesBoardError::cleaning("Cannot rank keys of an empty table"))
}

/// Return the month with the maximum total.
///
/// Equal totals resolve to the earlier month so the result is deterministic.
pub fn best_month(monthly: &[MonthlyDataPoint]) -> Result<MonthlyDataPoint> {
    monthly
        .iter()
        .max_by(|a, b| {
            a.total
                .total_cmp(&b.total)
                // max_by keeps the later of equal elements; reverse the
                // month ordering so the earlier month wins ties.
                .then_with(|| (b.year, b.month).cmp(&(a.year, a.month)))
        })
        .cloned()
        .ok_or_else(|| SalesBoardError::cleaning("Cannot pick best month of an empty aggregate"))
}
