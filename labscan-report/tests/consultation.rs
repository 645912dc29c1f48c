use chrono::NaiveDate;
use labscan_core::{AnalysisReport, PatientDemographics};
use labscan_report::{
    format_consultation_record, render_patient_history, render_result_text,
    summarize_consultation,
};

fn sample_report() -> AnalysisReport {
    AnalysisReport {
        diagnostic: "Glicose: valor extraído 120.0 está ACIMA do valor ideal (70.0–99.0).\n\
                     TSH: valor extraído 2.1 está dentro do valor ideal (0.4–4.5).\n\
                     Ferro: valor extraído 40.0 está abaixo do valor ideal (50.0–170.0).\n"
            .to_string(),
        prescription: "- Glicose: Metformina 500 mg\n- Ferro: Sulfato ferroso 40 mg\n".to_string(),
        demographics: PatientDemographics {
            name: "Maria Souza".to_string(),
            sex: "F".to_string(),
            age: 33,
            identifier: "123.456.789-09".to_string(),
            phone: String::new(),
        },
    }
}

fn consultation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date")
}

#[test]
fn consultation_record_layout() {
    let record = format_consultation_record(consultation_date(), &sample_report());

    assert!(record.starts_with("Data: 05-03-2024\n\nDiagnóstico:\nGlicose:"));
    assert!(record.ends_with("\n\nPrescrição:\n- Glicose: Metformina 500 mg\n- Ferro: Sulfato ferroso 40 mg\n"));
}

#[test]
fn stored_consultation_summarizes_back() {
    let record = format_consultation_record(consultation_date(), &sample_report());
    let summary = summarize_consultation(&record);

    assert_eq!(summary.flagged.len(), 2);
    assert!(summary.flagged[0].starts_with("Glicose:"));
    assert!(summary.flagged[1].starts_with("Ferro:"));
    assert_eq!(
        summary.prescription,
        vec![
            "- Glicose: Metformina 500 mg".to_string(),
            "- Ferro: Sulfato ferroso 40 mg".to_string(),
        ]
    );
}

#[test]
fn free_text_consultation_without_prescription() {
    let summary = summarize_consultation("Retorno em 30 dias.\nPaciente assintomática.");
    assert!(summary.flagged.is_empty());
    assert!(summary.prescription.is_empty());
}

#[test]
fn result_text_lists_header_and_findings() {
    let text = render_result_text(&sample_report(), consultation_date());

    assert!(text.starts_with(
        "\nPaciente: Maria Souza\nIdade: 33\nCPF: 123.456.789-09\nSexo: F\nTelefone: \n\n"
    ));
    assert!(text.contains("Consulta cadastrada em 05-03-2024.\n\nDiagnóstico:\nGlicose:"));
    assert!(text.contains("\n\nPrescrição sugerida:\n- Glicose: Metformina 500 mg\n"));
}

#[test]
fn patient_history_shows_latest_consultation() {
    let patient = sample_report().demographics;
    let history = render_patient_history(
        &patient,
        &["Data: 01-01-2024".to_string(), "Data: 05-03-2024".to_string()],
    );

    assert!(history.contains("Idade: 33\n"));
    assert!(history.ends_with("Última consulta:\n\nData: 05-03-2024\n"));
}

#[test]
fn patient_history_without_consultations() {
    let patient = sample_report().demographics;
    assert_eq!(
        render_patient_history(&patient, &[]),
        "Paciente: Maria Souza\n\nNenhuma consulta cadastrada."
    );
}
