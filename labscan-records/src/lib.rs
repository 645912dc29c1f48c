//! Patient and consultation records kept as JSON files in a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use labscan_core::PatientDemographics;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

const PATIENTS_FILE: &str = "patients.json";
const CONSULTS_FILE: &str = "consults.json";

/// A registered patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientRecord {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
}

impl PatientRecord {
    pub fn from_demographics(id: u32, demographics: &PatientDemographics) -> Self {
        Self {
            id,
            name: demographics.name.clone(),
            age: demographics.age,
            cpf: demographics.identifier.clone(),
            gender: demographics.sex.clone(),
            phone: demographics.phone.clone(),
        }
    }

    pub fn demographics(&self) -> PatientDemographics {
        PatientDemographics {
            name: self.name.clone(),
            sex: self.gender.clone(),
            age: self.age,
            identifier: self.cpf.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Create/read/update/delete access to patients and their consultations.
pub trait RecordStore {
    fn patients(&self) -> Result<Vec<PatientRecord>, RecordError>;

    fn patient(&self, id: u32) -> Result<Option<PatientRecord>, RecordError> {
        Ok(self.patients()?.into_iter().find(|patient| patient.id == id))
    }

    /// Register a patient and return the new id.
    fn add_patient(&self, demographics: &PatientDemographics) -> Result<u32, RecordError>;

    /// Replace the stored record with the same id. `false` when no such patient.
    fn update_patient(&self, record: &PatientRecord) -> Result<bool, RecordError>;

    /// Remove a patient together with their consultations.
    fn delete_patient(&self, id: u32) -> Result<(), RecordError>;

    fn add_consultation(&self, patient_id: u32, text: &str) -> Result<(), RecordError>;

    /// Consultations in the order they were added.
    fn consultations(&self, patient_id: u32) -> Result<Vec<String>, RecordError>;
}

/// Store backed by `patients.json` and `consults.json` in one directory.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    patients_path: PathBuf,
    consults_path: PathBuf,
}

/// Consultation texts keyed by patient id, in the order patients first got one.
type ConsultMap = Map<String, Value>;

impl JsonRecordStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            patients_path: dir.join(PATIENTS_FILE),
            consults_path: dir.join(CONSULTS_FILE),
        }
    }

    fn save_patients(&self, patients: &[PatientRecord]) -> Result<(), RecordError> {
        write_json(&self.patients_path, &patients)
    }

    fn load_consults(&self) -> Result<ConsultMap, RecordError> {
        Ok(read_json(&self.consults_path)?.unwrap_or_default())
    }
}

impl RecordStore for JsonRecordStore {
    fn patients(&self) -> Result<Vec<PatientRecord>, RecordError> {
        Ok(read_json(&self.patients_path)?.unwrap_or_default())
    }

    fn add_patient(&self, demographics: &PatientDemographics) -> Result<u32, RecordError> {
        let mut patients = self.patients()?;
        let id = patients.iter().map(|patient| patient.id).max().unwrap_or(0) + 1;
        patients.push(PatientRecord::from_demographics(id, demographics));
        self.save_patients(&patients)?;
        tracing::info!(patient_id = id, "patient registered");
        Ok(id)
    }

    fn update_patient(&self, record: &PatientRecord) -> Result<bool, RecordError> {
        let mut patients = self.patients()?;
        let Some(existing) = patients.iter_mut().find(|patient| patient.id == record.id) else {
            return Ok(false);
        };
        *existing = record.clone();
        self.save_patients(&patients)?;
        Ok(true)
    }

    fn delete_patient(&self, id: u32) -> Result<(), RecordError> {
        let mut patients = self.patients()?;
        patients.retain(|patient| patient.id != id);
        self.save_patients(&patients)?;

        if self.consults_path.exists() {
            let mut consults = self.load_consults()?;
            consults.shift_remove(&id.to_string());
            write_json(&self.consults_path, &consults)?;
        }

        tracing::info!(patient_id = id, "patient deleted");
        Ok(())
    }

    fn add_consultation(&self, patient_id: u32, text: &str) -> Result<(), RecordError> {
        let mut consults = self.load_consults()?;
        let entry = consults
            .entry(patient_id.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Some(texts) = entry.as_array_mut() {
            texts.push(Value::String(text.to_string()));
        }
        write_json(&self.consults_path, &consults)
    }

    fn consultations(&self, patient_id: u32) -> Result<Vec<String>, RecordError> {
        let consults = self.load_consults()?;
        Ok(consults
            .get(&patient_id.to_string())
            .and_then(Value::as_array)
            .map(|texts| {
                texts
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, RecordError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RecordError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| RecordError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RecordError> {
    let text = serde_json::to_string_pretty(value).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Failures reading or writing the record files.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record file {path} not accessible: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
