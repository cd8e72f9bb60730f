//! Prompt construction for the summary generation call

use salesboard_data::{CleaningReport, SummaryFacts};

/// Build the generation prompt from the derived dashboard facts.
///
/// The prompt carries only aggregated values, never raw rows, so upload
/// contents are not shipped to the generation API.
pub fn build_summary_prompt(facts: &SummaryFacts, report: &CleaningReport) -> String {
    format!(
        "You are a business analyst. Summarize the following sales insights \
         as short bullet points for a dashboard.\n\
         \n\
         - Top performing product: {} (total sales {})\n\
         - Top performing region: {} (total sales {})\n\
         - Best sales month: {} (total sales {})\n\
         - Rows analyzed: {} ({} removed during cleaning)\n\
         \n\
         Keep it concise and business-focused.",
        facts.top_product.key,
        format_amount(facts.top_product.total),
        facts.top_region.key,
        format_amount(facts.top_region.total),
        facts.best_month.label,
        format_amount(facts.best_month.total),
        report.rows_out,
        report.rows_removed(),
    )
}

/// Format a sales amount with two decimal places
fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesboard_data::{KeyTotal, MonthlyDataPoint};

    fn facts() -> SummaryFacts {
        SummaryFacts {
            top_product: KeyTotal {
                key: "Widget".to_string(),
                total: 1200.0,
            },
            top_region: KeyTotal {
                key: "North".to_string(),
                total: 800.5,
            },
            best_month: MonthlyDataPoint::new(2024, 2, 950.0),
        }
    }

    #[test]
    fn test_prompt_includes_all_facts() {
        let report = CleaningReport {
            rows_in: 45,
            rows_out: 42,
            duplicates_removed: 2,
            missing_removed: 1,
            ..CleaningReport::default()
        };
        let prompt = build_summary_prompt(&facts(), &report);

        assert!(prompt.contains("Widget (total sales 1200.00)"));
        assert!(prompt.contains("North (total sales 800.50)"));
        assert!(prompt.contains("2024-02 (total sales 950.00)"));
        assert!(prompt.contains("Rows analyzed: 42 (3 removed during cleaning)"));
    }

    #[test]
    fn test_prompt_carries_no_raw_rows() {
        let prompt = build_summary_prompt(&facts(), &CleaningReport::default());
        assert!(prompt.contains("business analyst"));
        assert!(!prompt.contains("Date,Product,Region,Sales"));
    }
}
