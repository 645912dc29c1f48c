//! Numeric range recovery from free-form descriptions such as `"75-90 mg/dL"`.

use std::sync::LazyLock;

use labscan_core::NumericRange;
use regex::Regex;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:[.,][0-9]+)?)[^\d]+([0-9]+(?:[.,][0-9]+)?)").unwrap()
});

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)?").unwrap());

/// First two numbers of `text`, in the order they appear. `None` when fewer
/// than two numbers are present.
pub fn parse_min_max(text: &str) -> Option<NumericRange> {
    let captures = RANGE_PATTERN.captures(text)?;
    let min = parse_decimal(captures.get(1)?.as_str())?;
    let max = parse_decimal(captures.get(2)?.as_str())?;
    Some(NumericRange { min, max })
}

/// First integer or decimal token on a line, accepting `,` as separator.
pub fn first_number(line: &str) -> Option<f64> {
    NUMBER_PATTERN
        .find(line)
        .and_then(|token| parse_decimal(token.as_str()))
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok()
}
