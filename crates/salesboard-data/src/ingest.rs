//! Tabular file ingestion for CSV and XLSX uploads

use crate::types::{RawRow, RawTable};
use calamine::{Data, Reader, Xlsx};
use salesboard_common::{Result, SalesBoardError};
use std::io::Cursor;
use tracing::{debug, instrument};

/// Columns every upload must carry; anything else is ignored
pub const REQUIRED_COLUMNS: [&str; 4] = ["Date", "Product", "Region", "Sales"];

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// Guess the format from an uploaded filename extension.
    ///
    /// Legacy BIFF `.xls` is not a supported format; only `.csv` and
    /// `.xlsx` map to a reader.
    pub fn from_filename(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Some(Self::Csv)
        } else if lower.ends_with(".xlsx") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }
}

/// Resolved positions of the required columns within the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    date: usize,
    product: usize,
    region: usize,
    sales: usize,
}

impl ColumnMap {
    /// Locate the required columns by header name.
    ///
    /// Exact matches win; a case-insensitive match on the trimmed header is
    /// accepted as a fallback. A missing column is a fatal ingestion error.
    fn resolve(headers: &[String]) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .or_else(|| {
                    headers
                        .iter()
                        .position(|h| h.trim().eq_ignore_ascii_case(name))
                })
                .ok_or_else(|| {
                    SalesBoardError::ingest(format!("Missing required column '{}'", name))
                })
        };

        Ok(Self {
            date: find("Date")?,
            product: find("Product")?,
            region: find("Region")?,
            sales: find("Sales")?,
        })
    }

    fn row_from_cells(&self, cells: &[String]) -> RawRow {
        let cell = |idx: usize| -> Option<String> {
            cells
                .get(idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        RawRow {
            date: cell(self.date),
            product: cell(self.product),
            region: cell(self.region),
            sales: cell(self.sales),
        }
    }
}

/// Parse an uploaded file into a raw table
#[instrument(skip(bytes), fields(bytes = bytes.len(), format = ?format))]
pub fn ingest(bytes: &[u8], format: TableFormat) -> Result<RawTable> {
    let table = match format {
        TableFormat::Csv => ingest_csv(bytes)?,
        TableFormat::Xlsx => ingest_xlsx(bytes)?,
    };

    debug!("Ingested {} raw rows", table.rows.len());
    Ok(table)
}

fn ingest_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SalesBoardError::ingest_with_source("Failed to read CSV header", e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| SalesBoardError::ingest_with_source("Malformed CSV row", e))?;
        let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        rows.push(columns.row_from_cells(&cells));
    }

    Ok(RawTable { rows })
}

fn ingest_xlsx(bytes: &[u8]) -> Result<RawTable> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook = Xlsx::new(cursor)
        .map_err(|e| SalesBoardError::ingest_with_source("Failed to open spreadsheet", e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SalesBoardError::ingest("Spreadsheet contains no worksheets"))?
        .map_err(|e| SalesBoardError::ingest_with_source("Failed to read worksheet", e))?;

    let mut row_iter = range.rows();
    let headers: Vec<String> = row_iter
        .next()
        .ok_or_else(|| SalesBoardError::ingest("Spreadsheet contains no header row"))?
        .iter()
        .map(cell_to_string)
        .collect();

    let columns = ColumnMap::resolve(&headers)?;

    let mut rows = Vec::new();
    for raw_cells in row_iter {
        let cells: Vec<String> = raw_cells.iter().map(cell_to_string).collect();
        rows.push(columns.row_from_cells(&cells));
    }

    Ok(RawTable { rows })
}

/// Render a spreadsheet cell as text for the downstream coercion steps.
/// Excel date cells are normalized to ISO format so they parse like their
/// CSV counterparts.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Format a float the way a CSV export would: no trailing ".0" on integers
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Date,Product,Region,Sales,Notes
2024-01-05,Widget,North,100,first
2024-01-05,Widget,North,100,first
2024-02-01,Gadget,South,abc,second
";

    #[test]
    fn test_format_detection() {
        assert_eq!(TableFormat::from_filename("sales.csv"), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_filename("SALES.CSV"), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_filename("q1.xlsx"), Some(TableFormat::Xlsx));
        // Legacy BIFF workbooks have no reader here; better a clear
        // unsupported-type message than an opaque open failure.
        assert_eq!(TableFormat::from_filename("q1.xls"), None);
        assert_eq!(TableFormat::from_filename("notes.txt"), None);
    }

    #[test]
    fn test_csv_ingestion_keeps_required_columns_only() {
        let table = ingest(SAMPLE_CSV.as_bytes(), TableFormat::Csv).unwrap();
        assert_eq!(table.rows.len(), 3);

        let first = &table.rows[0];
        assert_eq!(first.date.as_deref(), Some("2024-01-05"));
        assert_eq!(first.product.as_deref(), Some("Widget"));
        assert_eq!(first.region.as_deref(), Some("North"));
        assert_eq!(first.sales.as_deref(), Some("100"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "Date,Product,Sales\n2024-01-05,Widget,100\n";
        let err = ingest(csv.as_bytes(), TableFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("Missing required column 'Region'"));
        assert!(err.is_fatal_for_upload());
    }

    #[test]
    fn test_case_insensitive_header_fallback() {
        let csv = "date,product,REGION,sales\n2024-01-05,Widget,North,100\n";
        let table = ingest(csv.as_bytes(), TableFormat::Csv).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].region.as_deref(), Some("North"));
    }

    #[test]
    fn test_empty_cells_become_none() {
        let csv = "Date,Product,Region,Sales\n2024-01-05,,North,100\n";
        let table = ingest(csv.as_bytes(), TableFormat::Csv).unwrap();
        assert_eq!(table.rows[0].product, None);
        assert!(!table.rows[0].is_complete());
    }

    #[test]
    fn test_short_rows_are_padded_with_none() {
        let csv = "Date,Product,Region,Sales\n2024-01-05,Widget\n";
        let table = ingest(csv.as_bytes(), TableFormat::Csv).unwrap();
        assert_eq!(table.rows[0].region, None);
        assert_eq!(table.rows[0].sales, None);
    }

    #[test]
    fn test_invalid_xlsx_bytes_rejected() {
        let err = ingest(b"definitely not a zip archive", TableFormat::Xlsx).unwrap_err();
        assert!(err.to_string().contains("Ingestion error"));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(99.5), "99.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
