//! Matching catalog entries against document lines.

use labscan_core::{ReferenceCatalog, ReferenceEntry, ScanResult};

use crate::range::{first_number, parse_min_max};

/// One result per catalog entry, in catalog order.
pub fn scan_results(lines: &[String], catalog: &ReferenceCatalog, sex: &str) -> Vec<ScanResult> {
    let results: Vec<ScanResult> = catalog
        .entries()
        .iter()
        .map(|entry| scan_entry(lines, entry, sex))
        .collect();

    tracing::info!(
        tests = results.len(),
        found = results.iter().filter(|result| result.is_found()).count(),
        "scanned report lines against catalog"
    );

    results
}

fn scan_entry(lines: &[String], entry: &ReferenceEntry, sex: &str) -> ScanResult {
    let terms = entry.match_terms();

    // First line mentioning any label wins, even when a later line has a value.
    let Some(line) = lines.iter().find(|line| {
        let lower = line.to_lowercase();
        terms.iter().any(|term| lower.contains(term.as_str()))
    }) else {
        tracing::debug!(test = %entry.name, "no matching line");
        return ScanResult::not_found(&entry.name);
    };

    let extracted_value = first_number(line);
    let resolved_ideal = entry.resolve_ideal(sex).map(str::to_string);

    let suggestion = match (
        extracted_value,
        resolved_ideal.as_deref().and_then(parse_min_max),
    ) {
        (Some(value), Some(range)) => entry
            .suggestion_for(range.classify(value))
            .map(str::to_string),
        (_, None) => {
            tracing::debug!(test = %entry.name, "ideal range missing or unparseable");
            None
        }
        _ => None,
    };

    ScanResult {
        test_name: entry.name.clone(),
        extracted_value,
        matched_line: Some(line.trim().to_string()),
        resolved_ideal,
        suggestion,
    }
}
