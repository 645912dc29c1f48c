//! Lab-report text to diagnostic and prescription converter.
//!
//! The pipeline takes the recovered lines of a report and a reference
//! catalog, extracts the patient header, matches every catalog test against
//! the lines and renders the findings as text.

mod catalog;
mod compose;
mod consultation;
mod lines;
mod patient;
mod range;
mod scan;

use labscan_core::{AnalysisConfig, AnalysisReport, ReferenceCatalog};

pub use catalog::{load_catalog, parse_catalog_str, parse_catalog_value};
pub use compose::{compose_report, format_value, ComposedText};
pub use consultation::{
    format_consultation_record, render_patient_history, render_result_text,
    summarize_consultation, ConsultationSummary,
};
pub use lines::{read_text_lines, split_lines};
pub use patient::{age_on, extract_patient_info};
pub use range::{first_number, parse_min_max};
pub use scan::scan_results;

/// Analyze a report against the catalog, dating ages from the current day.
pub fn analyze(lines: &[String], catalog: Option<&ReferenceCatalog>) -> AnalysisReport {
    analyze_with(lines, catalog, &AnalysisConfig::default())
}

/// Analyze a report with an explicit configuration.
///
/// An empty document or a missing catalog yields [`AnalysisReport::fallback`].
pub fn analyze_with(
    lines: &[String],
    catalog: Option<&ReferenceCatalog>,
    config: &AnalysisConfig,
) -> AnalysisReport {
    let Some(catalog) = catalog.filter(|_| !lines.is_empty()) else {
        tracing::warn!(
            lines = lines.len(),
            catalog_loaded = catalog.is_some(),
            "document or references unavailable, returning fallback"
        );
        return AnalysisReport::fallback();
    };

    let demographics = extract_patient_info(lines, config.reference_date());
    let results = scan_results(lines, catalog, &demographics.sex);
    let text = compose_report(&results);

    AnalysisReport {
        diagnostic: text.diagnostic,
        prescription: text.prescription,
        demographics,
    }
}
