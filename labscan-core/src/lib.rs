//! Core data model for lab-report analysis: reference catalog, scan results
//! and patient demographics.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Diagnostic text returned when either the document or the catalog is unusable.
pub const FALLBACK_DIAGNOSTIC: &str = "Erro ao ler o PDF ou as referências.";

/// Knobs for a single analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Reference date for age computation. `None` uses the current local date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

impl AnalysisConfig {
    /// Config with a frozen reference date.
    pub fn on(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    /// Date the run should treat as "today".
    pub fn reference_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Ordered table of known tests, keyed by unique name.
///
/// Serializes as the list of entries; deserializing goes through
/// [`ReferenceCatalog::new`] so duplicate names are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<ReferenceEntry>", into = "Vec<ReferenceEntry>")]
pub struct ReferenceCatalog {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceCatalog {
    /// Build a catalog, keeping declaration order. Test names must be unique.
    pub fn new(entries: Vec<ReferenceEntry>) -> Result<Self, LabscanError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(LabscanError::DuplicateTest(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<ReferenceEntry>> for ReferenceCatalog {
    type Error = LabscanError;

    fn try_from(entries: Vec<ReferenceEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ReferenceCatalog> for Vec<ReferenceEntry> {
    fn from(catalog: ReferenceCatalog) -> Self {
        catalog.entries
    }
}

/// One known test: how to recognise it and how to judge its value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceEntry {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub ideal: Option<IdealRange>,
    #[serde(default)]
    pub medications: Option<Medications>,
}

impl ReferenceEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            synonyms: Vec::new(),
            ideal: None,
            medications: None,
        }
    }

    /// Lower-cased labels used for line matching: the synonyms followed by the
    /// canonical name. A blank label matches any line containing it, so `""`
    /// matches every line.
    pub fn match_terms(&self) -> Vec<String> {
        self.synonyms
            .iter()
            .chain(std::iter::once(&self.name))
            .map(|term| term.to_lowercase())
            .collect()
    }

    /// Range description applicable to the given sex code.
    pub fn resolve_ideal(&self, sex: &str) -> Option<&str> {
        self.ideal.as_ref().and_then(|ideal| ideal.resolve(sex))
    }

    /// Medication suggestion for a classification, if the catalog has one.
    pub fn suggestion_for(&self, status: RangeStatus) -> Option<&str> {
        self.medications
            .as_ref()
            .and_then(|meds| meds.for_status(status))
    }
}

/// Ideal range description, either shared or keyed by sex code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IdealRange {
    Text(String),
    /// `(sex code, range description)` pairs in declaration order.
    BySex(Vec<(String, String)>),
}

impl IdealRange {
    /// Exact sex key first, otherwise the first declared entry.
    pub fn resolve(&self, sex: &str) -> Option<&str> {
        match self {
            IdealRange::Text(text) => Some(text.as_str()),
            IdealRange::BySex(pairs) => pairs
                .iter()
                .find(|(key, _)| key == sex)
                .or_else(|| pairs.first())
                .map(|(_, text)| text.as_str()),
        }
    }
}

/// Suggestions keyed by the direction a value leaves its range.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medications {
    #[serde(default)]
    pub low: Option<String>,
    #[serde(default)]
    pub high: Option<String>,
}

impl Medications {
    pub fn for_status(&self, status: RangeStatus) -> Option<&str> {
        match status {
            RangeStatus::Below => self.low.as_deref(),
            RangeStatus::Above => self.high.as_deref(),
            RangeStatus::Within => None,
        }
    }
}

/// Numeric bounds recovered from a range description.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    /// Bounds are inclusive. No reordering happens when `min > max`.
    pub fn classify(&self, value: f64) -> RangeStatus {
        if value < self.min {
            RangeStatus::Below
        } else if value > self.max {
            RangeStatus::Above
        } else {
            RangeStatus::Within
        }
    }
}

/// Position of a value relative to its ideal range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    Below,
    Within,
    Above,
}

/// Outcome of looking for one catalog entry in the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub test_name: String,
    pub extracted_value: Option<f64>,
    pub matched_line: Option<String>,
    pub resolved_ideal: Option<String>,
    pub suggestion: Option<String>,
}

impl ScanResult {
    /// Result for an entry whose labels appear on no line.
    pub fn not_found(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            extracted_value: None,
            matched_line: None,
            resolved_ideal: None,
            suggestion: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.matched_line.is_some()
    }
}

/// Demographic fields recovered from the document header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientDemographics {
    pub name: String,
    /// `"M"`, `"F"` or empty when unknown.
    pub sex: String,
    /// Whole years at the reference date; 0 when the birth date is unusable.
    pub age: i32,
    /// CPF number as printed (`ddd.ddd.ddd-dd`).
    pub identifier: String,
    /// Never populated by extraction.
    pub phone: String,
}

/// Everything an analysis run hands back to its caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisReport {
    pub diagnostic: String,
    pub prescription: String,
    pub demographics: PatientDemographics,
}

impl AnalysisReport {
    /// Terminal result for an unreadable document or missing catalog.
    pub fn fallback() -> Self {
        Self {
            diagnostic: FALLBACK_DIAGNOSTIC.to_string(),
            ..Self::default()
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.diagnostic == FALLBACK_DIAGNOSTIC
    }
}

/// Errors raised while building pipeline inputs.
#[derive(Debug, thiserror::Error)]
pub enum LabscanError {
    #[error("could not parse input: {0}")]
    Parse(String),
    #[error("duplicate test name in catalog: {0}")]
    DuplicateTest(String),
}
