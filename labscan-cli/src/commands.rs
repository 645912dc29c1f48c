//! Record-store actions behind the `edit` and `consult` subcommands.

use anyhow::{bail, Context};
use clap::Args;
use labscan_records::{PatientRecord, RecordStore};

/// Fields to overwrite on a stored patient. Omitted flags keep the stored value.
#[derive(Args, Debug, Default, Clone)]
pub struct PatientEdit {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub age: Option<i32>,
    #[arg(long)]
    pub cpf: Option<String>,
    /// Sex code, usually "M" or "F".
    #[arg(long)]
    pub sex: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

impl PatientEdit {
    pub fn apply(&self, record: &mut PatientRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(cpf) = &self.cpf {
            record.cpf = cpf.clone();
        }
        if let Some(sex) = &self.sex {
            record.gender = sex.clone();
        }
        if let Some(phone) = &self.phone {
            record.phone = phone.clone();
        }
    }
}

/// Update a stored patient and return the saved record.
pub fn edit_patient(
    store: &impl RecordStore,
    id: u32,
    edit: &PatientEdit,
) -> anyhow::Result<PatientRecord> {
    let Some(mut record) = store.patient(id)? else {
        bail!("Paciente não encontrado.");
    };
    edit.apply(&mut record);
    if !store
        .update_patient(&record)
        .with_context(|| format!("could not update patient {id}"))?
    {
        bail!("Paciente não encontrado.");
    }
    Ok(record)
}

/// Append a free-text consultation and return how many the patient now has.
pub fn add_consultation(store: &impl RecordStore, id: u32, text: &str) -> anyhow::Result<usize> {
    if store.patient(id)?.is_none() {
        bail!("Paciente não encontrado.");
    }
    store
        .add_consultation(id, text)
        .with_context(|| format!("could not register consultation for patient {id}"))?;
    Ok(store.consultations(id)?.len())
}
