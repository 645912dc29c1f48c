//! Diagnostic and prescription text from scan results.

use std::fmt::Write;

use labscan_core::{RangeStatus, ScanResult};

use crate::range::parse_min_max;

/// Diagnostic narrative and prescription list built from scan results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedText {
    pub diagnostic: String,
    pub prescription: String,
}

/// Walk results in order, skipping entries without a value or a usable range.
pub fn compose_report(results: &[ScanResult]) -> ComposedText {
    let mut text = ComposedText::default();

    for result in results {
        let (Some(value), Some(ideal)) = (result.extracted_value, result.resolved_ideal.as_deref())
        else {
            continue;
        };
        let Some(range) = parse_min_max(ideal) else {
            continue;
        };

        let test = &result.test_name;
        let status = range.classify(value);
        let placement = match status {
            RangeStatus::Below => "ABAIXO do",
            RangeStatus::Above => "ACIMA do",
            RangeStatus::Within => "dentro do",
        };

        let _ = writeln!(
            text.diagnostic,
            "{test}: valor extraído {} está {placement} valor ideal ({}–{}).",
            format_value(value),
            format_value(range.min),
            format_value(range.max),
        );

        if status != RangeStatus::Within {
            if let Some(suggestion) = result.suggestion.as_deref().filter(|s| !s.is_empty()) {
                let _ = writeln!(text.prescription, "- {test}: {suggestion}");
            }
        }
    }

    text
}

/// Render a number the way a float repr does: `120.0`, `13.5`, `0.35`, with
/// exponent notation below `1e-4` and from `1e16` up (`1e-05`, `1e+16`).
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() || value == 0.0 {
        return format!("{value:?}");
    }
    if !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(value);
    }
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn format_exponent(value: f64) -> String {
    let shortest = format!("{value:e}");
    let (mantissa, exponent) = shortest.split_once('e').unwrap_or((shortest.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}
