//! Reference catalog loading from its JSON shape.
//!
//! ```json
//! {
//!   "Glicose": {
//!     "synonyms": ["glicemia"],
//!     "ideal": {"M": "70-99", "F": "65-95"},
//!     "medications": {"low": "...", "high": "..."}
//!   }
//! }
//! ```

use std::fs;
use std::path::Path;

use labscan_core::{IdealRange, LabscanError, Medications, ReferenceCatalog, ReferenceEntry};
use serde_json::{Map, Value};

/// Parse a catalog from a JSON string.
pub fn parse_catalog_str(json: &str) -> Result<ReferenceCatalog, LabscanError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| LabscanError::Parse(err.to_string()))?;
    parse_catalog_value(&value)
}

/// Parse a catalog from a `serde_json::Value`, keeping document order.
pub fn parse_catalog_value(value: &Value) -> Result<ReferenceCatalog, LabscanError> {
    let tests = value
        .as_object()
        .ok_or_else(|| LabscanError::Parse("catalog must be a JSON object".to_string()))?;

    let entries = tests
        .iter()
        .map(|(name, info)| parse_entry(name, info))
        .collect::<Result<Vec<_>, _>>()?;

    ReferenceCatalog::new(entries)
}

/// Read and parse a catalog file. Any failure is logged and yields `None`.
pub fn load_catalog(path: &Path) -> Option<ReferenceCatalog> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "reference catalog unreadable");
            return None;
        }
    };

    match parse_catalog_str(&text) {
        Ok(catalog) => {
            tracing::info!(path = %path.display(), tests = catalog.len(), "reference catalog loaded");
            Some(catalog)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "reference catalog malformed");
            None
        }
    }
}

fn parse_entry(name: &str, info: &Value) -> Result<ReferenceEntry, LabscanError> {
    let info = info
        .as_object()
        .ok_or_else(|| entry_error(name, "entry must be an object"))?;

    Ok(ReferenceEntry {
        name: name.to_string(),
        synonyms: parse_synonyms(name, info)?,
        ideal: parse_ideal(name, info.get("ideal"))?,
        medications: parse_medications(name, info.get("medications"))?,
    })
}

fn parse_synonyms(name: &str, info: &Map<String, Value>) -> Result<Vec<String>, LabscanError> {
    match info.get("synonyms") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| entry_error(name, "synonyms must be strings"))
            })
            .collect(),
        Some(_) => Err(entry_error(name, "synonyms must be a list")),
    }
}

fn parse_ideal(name: &str, value: Option<&Value>) -> Result<Option<IdealRange>, LabscanError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(IdealRange::Text(text.clone()))),
        Some(Value::Object(by_sex)) => by_sex
            .iter()
            .map(|(sex, text)| {
                text.as_str()
                    .map(|text| (sex.clone(), text.to_string()))
                    .ok_or_else(|| entry_error(name, "ideal values must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|pairs| Some(IdealRange::BySex(pairs))),
        Some(_) => Err(entry_error(name, "ideal must be a string or an object")),
    }
}

fn parse_medications(
    name: &str,
    value: Option<&Value>,
) -> Result<Option<Medications>, LabscanError> {
    let meds = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(meds)) => meds,
        Some(_) => return Err(entry_error(name, "medications must be an object")),
    };

    let suggestion = |key: &str| match meds.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(entry_error(name, "medication suggestions must be strings")),
    };

    Ok(Some(Medications {
        low: suggestion("low")?,
        high: suggestion("high")?,
    }))
}

fn entry_error(name: &str, reason: &str) -> LabscanError {
    LabscanError::Parse(format!("{name}: {reason}"))
}
