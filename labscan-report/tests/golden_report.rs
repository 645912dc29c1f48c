use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use labscan_core::AnalysisConfig;
use labscan_report::{analyze_with, load_catalog, read_text_lines};
use serde_json::Value;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR")))
}

fn frozen_config() -> AnalysisConfig {
    AnalysisConfig::on(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"))
}

#[test]
fn lab_report_matches_golden() {
    let lines = read_text_lines(&fixture_path("lab_report.txt"));
    let catalog = load_catalog(&fixture_path("references.json")).expect("catalog fixture loads");

    let report = analyze_with(&lines, Some(&catalog), &frozen_config());
    let actual = serde_json::to_value(&report).expect("report serializes");

    let expected = fs::read_to_string(fixture_path("lab_report_analysis.json"))
        .expect("golden analysis readable");
    let expected: Value = serde_json::from_str(&expected).expect("golden is valid JSON");

    assert_eq!(actual, expected);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let lines = read_text_lines(&fixture_path("lab_report.txt"));
    let catalog = load_catalog(&fixture_path("references.json")).expect("catalog fixture loads");

    let first = analyze_with(&lines, Some(&catalog), &frozen_config());
    let second = analyze_with(&lines, Some(&catalog), &frozen_config());

    assert_eq!(first.diagnostic, second.diagnostic);
    assert_eq!(first.prescription, second.prescription);
    assert_eq!(first, second);
}

#[test]
fn missing_document_falls_back() {
    let lines = read_text_lines(&fixture_path("does_not_exist.txt"));
    assert!(lines.is_empty());

    let catalog = load_catalog(&fixture_path("references.json"));
    let report = analyze_with(&lines, catalog.as_ref(), &frozen_config());

    assert!(report.is_fallback());
    assert_eq!(report.diagnostic, "Erro ao ler o PDF ou as referências.");
    assert!(report.prescription.is_empty());
    assert!(report.demographics.name.is_empty());
    assert_eq!(report.demographics.age, 0);
}

#[test]
fn missing_catalog_falls_back() {
    let lines = read_text_lines(&fixture_path("lab_report.txt"));
    let catalog = load_catalog(&fixture_path("no_references.json"));
    assert!(catalog.is_none());

    let report = analyze_with(&lines, catalog.as_ref(), &frozen_config());
    assert!(report.is_fallback());
    assert!(report.demographics.sex.is_empty());
}
