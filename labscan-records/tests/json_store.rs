use std::fs;

use labscan_core::PatientDemographics;
use labscan_records::{JsonRecordStore, PatientRecord, RecordError, RecordStore};
use tempfile::TempDir;

fn demographics(name: &str) -> PatientDemographics {
    PatientDemographics {
        name: name.to_string(),
        sex: "F".to_string(),
        age: 41,
        identifier: "123.456.789-09".to_string(),
        phone: String::new(),
    }
}

fn store() -> (TempDir, JsonRecordStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonRecordStore::new(dir.path());
    (dir, store)
}

#[test]
fn empty_directory_reads_as_no_records() {
    let (_dir, store) = store();
    assert!(store.patients().expect("patients").is_empty());
    assert!(store.patient(1).expect("patient").is_none());
    assert!(store.consultations(1).expect("consultations").is_empty());
}

#[test]
fn ids_continue_after_the_highest_existing_one() {
    let (_dir, store) = store();
    assert_eq!(store.add_patient(&demographics("Ana")).expect("add"), 1);
    assert_eq!(store.add_patient(&demographics("Bruno")).expect("add"), 2);

    store.delete_patient(1).expect("delete");
    assert_eq!(store.add_patient(&demographics("Carla")).expect("add"), 3);

    let names: Vec<String> = store
        .patients()
        .expect("patients")
        .into_iter()
        .map(|patient| patient.name)
        .collect();
    assert_eq!(names, ["Bruno", "Carla"]);
}

#[test]
fn stored_patient_keeps_demographics() {
    let (_dir, store) = store();
    let id = store.add_patient(&demographics("Ana")).expect("add");

    let record = store.patient(id).expect("patient").expect("present");
    assert_eq!(record.cpf, "123.456.789-09");
    assert_eq!(record.gender, "F");
    assert_eq!(record.demographics(), demographics("Ana"));
}

#[test]
fn update_replaces_matching_patient_only() {
    let (_dir, store) = store();
    let id = store.add_patient(&demographics("Ana")).expect("add");

    let mut record = store.patient(id).expect("patient").expect("present");
    record.phone = "(11) 99999-0000".to_string();
    record.age = 42;
    assert!(store.update_patient(&record).expect("update"));

    let reloaded = store.patient(id).expect("patient").expect("present");
    assert_eq!(reloaded.phone, "(11) 99999-0000");
    assert_eq!(reloaded.age, 42);

    let ghost = PatientRecord {
        id: 99,
        ..PatientRecord::default()
    };
    assert!(!store.update_patient(&ghost).expect("update"));
}

#[test]
fn consultations_accumulate_in_order_and_go_with_the_patient() {
    let (_dir, store) = store();
    let ana = store.add_patient(&demographics("Ana")).expect("add");
    let bruno = store.add_patient(&demographics("Bruno")).expect("add");

    store.add_consultation(ana, "Data: 01-01-2024").expect("consult");
    store.add_consultation(ana, "Data: 05-03-2024").expect("consult");
    store.add_consultation(bruno, "Data: 02-02-2024").expect("consult");

    assert_eq!(
        store.consultations(ana).expect("consultations"),
        ["Data: 01-01-2024", "Data: 05-03-2024"]
    );

    store.delete_patient(ana).expect("delete");
    assert!(store.consultations(ana).expect("consultations").is_empty());
    assert_eq!(store.consultations(bruno).expect("consultations").len(), 1);
}

#[test]
fn consultations_are_keyed_by_string_id_on_disk() {
    let (dir, store) = store();
    store.add_consultation(7, "texto").expect("consult");

    let raw = fs::read_to_string(dir.path().join("consults.json")).expect("file written");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(value["7"][0], "texto");
}

#[test]
fn consultation_file_keeps_patient_insertion_order() {
    let (dir, store) = store();
    for id in [2, 10, 3] {
        store.add_consultation(id, "texto").expect("consult");
    }
    store.delete_patient(2).expect("delete");
    store.add_consultation(1, "texto").expect("consult");

    let raw = fs::read_to_string(dir.path().join("consults.json")).expect("file written");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    let keys: Vec<&str> = value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["10", "3", "1"]);
    assert!(raw.find("\"10\"") < raw.find("\"3\""));
}

#[test]
fn corrupt_patient_file_is_reported() {
    let (dir, store) = store();
    fs::write(dir.path().join("patients.json"), "{not json").expect("write");

    let err = store.patients().unwrap_err();
    assert!(matches!(err, RecordError::Json { .. }));
}
