//! Demographic extraction from report header lines.
//!
//! Every line is run through an ordered table of field matchers. A field
//! matched on a later line overwrites the earlier value.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use labscan_core::PatientDemographics;
use regex::Regex;

const NAME_LABEL: &str = "Paciente ";

static CPF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CPF\s+(\d{3}\.\d{3}\.\d{3}-\d{2})").unwrap());

static SEX_BIRTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Sexo\s+([MF])\s+Dt nasc\. (\d{2}/\d{2}/\d{4})").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Identifier,
    SexAndBirth,
}

struct FieldMatcher {
    field: Field,
    /// Not tried on a line where this field already matched.
    unless: Option<Field>,
    apply: fn(&str, &mut PatientDemographics, NaiveDate) -> bool,
}

const MATCHERS: [FieldMatcher; 3] = [
    FieldMatcher {
        field: Field::Name,
        unless: None,
        apply: match_name,
    },
    FieldMatcher {
        field: Field::Identifier,
        unless: None,
        apply: match_identifier,
    },
    FieldMatcher {
        field: Field::SexAndBirth,
        unless: Some(Field::Identifier),
        apply: match_sex_and_birth,
    },
];

/// Scan all lines for name, CPF, sex and birth date. `today` anchors the age.
pub fn extract_patient_info(lines: &[String], today: NaiveDate) -> PatientDemographics {
    let mut demographics = PatientDemographics::default();

    for line in lines {
        let line = line.trim();
        let mut matched: Vec<Field> = Vec::with_capacity(MATCHERS.len());

        for matcher in &MATCHERS {
            if matcher.unless.is_some_and(|field| matched.contains(&field)) {
                continue;
            }
            if (matcher.apply)(line, &mut demographics, today) {
                matched.push(matcher.field);
            }
        }
    }

    tracing::debug!(
        has_name = !demographics.name.is_empty(),
        has_identifier = !demographics.identifier.is_empty(),
        has_sex = !demographics.sex.is_empty(),
        "patient header scanned"
    );

    demographics
}

fn match_name(line: &str, demographics: &mut PatientDemographics, _today: NaiveDate) -> bool {
    let Some(rest) = line.strip_prefix(NAME_LABEL) else {
        return false;
    };
    demographics.name = rest.trim().to_string();
    true
}

fn match_identifier(line: &str, demographics: &mut PatientDemographics, _today: NaiveDate) -> bool {
    let Some(captures) = CPF_PATTERN.captures(line) else {
        return false;
    };
    demographics.identifier = captures[1].to_string();
    true
}

fn match_sex_and_birth(line: &str, demographics: &mut PatientDemographics, today: NaiveDate) -> bool {
    if !(line.contains("Sexo") && line.contains("Dt nasc.")) {
        return false;
    }
    let Some(captures) = SEX_BIRTH_PATTERN.captures(line) else {
        return false;
    };

    demographics.sex = captures[1].to_string();
    // Calendar years start at 1; "0000" is not a birth year.
    demographics.age = NaiveDate::parse_from_str(&captures[2], "%d/%m/%Y")
        .ok()
        .filter(|birth| birth.year() >= 1)
        .map(|birth| age_on(birth, today))
        .unwrap_or(0);
    true
}

/// Completed years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
