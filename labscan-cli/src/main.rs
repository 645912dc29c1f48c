mod commands;

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use commands::PatientEdit;
use labscan_core::AnalysisConfig;
use labscan_records::{JsonRecordStore, RecordStore};
use labscan_report::{
    analyze_with, format_consultation_record, load_catalog, read_text_lines,
    render_patient_history, render_result_text, summarize_consultation,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "labscan",
    version,
    about = "Compare lab report values with reference ranges and suggest prescriptions."
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Directory holding patients.json and consults.json.
    #[arg(long, global = true, default_value = ".")]
    store: PathBuf,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "labscan_report=debug").
    #[arg(long = "log-level", global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze the text of a lab report.
    Analyze {
        /// Text file with the lines recovered from the report.
        report: PathBuf,

        /// Reference catalog JSON.
        #[arg(short, long, default_value = "references.json")]
        references: PathBuf,

        /// Date used for age computation and the consultation stamp (YYYY-MM-DD).
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Register the patient and the consultation in the store.
        #[arg(long)]
        save: bool,
    },
    /// List registered patients.
    Patients,
    /// Show a patient and their latest consultation.
    Show { id: u32 },
    /// Flagged findings and prescriptions of every consultation.
    History { id: u32 },
    /// Change a patient's stored details.
    Edit {
        id: u32,
        #[command(flatten)]
        edit: PatientEdit,
    },
    /// Append a free-text consultation to a patient.
    Consult { id: u32, text: String },
    /// Remove a patient and their consultations.
    Delete { id: u32 },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = JsonRecordStore::new(&args.store);

    match args.command {
        Command::Analyze {
            report,
            references,
            today,
            save,
        } => {
            let config = AnalysisConfig { today };
            let date = config.reference_date();
            let lines = read_text_lines(&report);
            let catalog = load_catalog(&references);
            let analysis = analyze_with(&lines, catalog.as_ref(), &config);

            if save {
                if analysis.is_fallback() {
                    bail!("nothing to register: {}", analysis.diagnostic);
                }
                let patient_id = store
                    .add_patient(&analysis.demographics)
                    .context("could not register patient")?;
                store
                    .add_consultation(patient_id, &format_consultation_record(date, &analysis))
                    .context("could not register consultation")?;
            }

            println!("{}", render_result_text(&analysis, date));
        }
        Command::Patients => {
            let patients = store.patients().context("could not list patients")?;
            if patients.is_empty() {
                println!("Nenhum paciente cadastrado.");
            }
            for patient in patients {
                println!(
                    "{:>4}  {}  ({} anos, CPF {})",
                    patient.id, patient.name, patient.age, patient.cpf
                );
            }
        }
        Command::Show { id } => {
            let Some(patient) = store.patient(id)? else {
                bail!("Paciente não encontrado.");
            };
            let consultations = store.consultations(id)?;
            println!(
                "{}",
                render_patient_history(&patient.demographics(), &consultations)
            );
        }
        Command::History { id } => {
            let Some(patient) = store.patient(id)? else {
                bail!("Paciente não encontrado.");
            };
            println!("Paciente: {}", patient.name);
            for (index, consultation) in store.consultations(id)?.iter().enumerate() {
                let summary = summarize_consultation(consultation);
                println!("\nConsulta {}", index + 1);
                for line in &summary.flagged {
                    println!("  {line}");
                }
                for line in &summary.prescription {
                    println!("  {line}");
                }
            }
        }
        Command::Edit { id, edit } => {
            let record = commands::edit_patient(&store, id, &edit)?;
            println!(
                "Paciente {}: {} ({} anos, CPF {}, sexo {}, telefone {})",
                record.id, record.name, record.age, record.cpf, record.gender, record.phone
            );
        }
        Command::Consult { id, text } => {
            let total = commands::add_consultation(&store, id, &text)?;
            println!("Consulta registrada para o paciente {id} ({total} no total).");
        }
        Command::Delete { id } => {
            if store.patient(id)?.is_none() {
                bail!("Paciente não encontrado.");
            }
            store
                .delete_patient(id)
                .with_context(|| format!("could not delete patient {id}"))?;
            println!("Paciente {id} removido.");
        }
    }

    Ok(())
}
