//! Consultation texts: what gets stored per visit and what is shown back.

use chrono::NaiveDate;
use labscan_core::{AnalysisReport, PatientDemographics};
use serde::{Deserialize, Serialize};

const PRESCRIPTION_HEADING: &str = "Prescrição";

/// Flagged findings and prescriptions pulled back out of a stored consultation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsultationSummary {
    /// Lines reporting a value above or below its ideal range.
    pub flagged: Vec<String>,
    /// Non-blank lines following the prescription heading.
    pub prescription: Vec<String>,
}

/// Text persisted for one consultation.
pub fn format_consultation_record(date: NaiveDate, report: &AnalysisReport) -> String {
    format!(
        "Data: {}\n\nDiagnóstico:\n{}\n\nPrescrição:\n{}",
        date.format("%d-%m-%Y"),
        report.diagnostic,
        report.prescription
    )
}

/// Summary block shown after a report has been analysed and registered.
pub fn render_result_text(report: &AnalysisReport, date: NaiveDate) -> String {
    let patient = &report.demographics;
    format!(
        "\n{}\nConsulta cadastrada em {}.\n\nDiagnóstico:\n{}\n\nPrescrição sugerida:\n{}\n",
        patient_header(patient),
        date.format("%d-%m-%Y"),
        report.diagnostic,
        report.prescription
    )
}

/// Patient header followed by the most recent consultation, if any.
pub fn render_patient_history(patient: &PatientDemographics, consultations: &[String]) -> String {
    match consultations.last() {
        None => format!("Paciente: {}\n\nNenhuma consulta cadastrada.", patient.name),
        Some(latest) => format!(
            "\n{}\nÚltima consulta:\n\n{latest}\n",
            patient_header(patient)
        ),
    }
}

/// Pull flagged findings and the prescription list out of a stored consultation.
pub fn summarize_consultation(text: &str) -> ConsultationSummary {
    let lines: Vec<&str> = text.lines().collect();

    let flagged = lines
        .iter()
        .filter(|line| {
            let upper = line.to_uppercase();
            upper.contains("ACIMA") || upper.contains("ABAIXO")
        })
        .map(|line| line.to_string())
        .collect();

    let prescription = lines
        .iter()
        .position(|line| line.contains(PRESCRIPTION_HEADING))
        .map(|heading| {
            lines[heading + 1..]
                .iter()
                .filter(|line| !line.trim().is_empty())
                .map(|line| line.to_string())
                .collect()
        })
        .unwrap_or_default();

    ConsultationSummary {
        flagged,
        prescription,
    }
}

fn patient_header(patient: &PatientDemographics) -> String {
    format!(
        "Paciente: {}\nIdade: {}\nCPF: {}\nSexo: {}\nTelefone: {}\n",
        patient.name, patient.age, patient.identifier, patient.sex, patient.phone
    )
}
