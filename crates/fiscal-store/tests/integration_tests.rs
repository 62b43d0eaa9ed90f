//! Integration tests for fiscal-store
//!
//! These tests load result documents from disk into real database files.

use fiscal_domain::{ExtractedRecord, FiscalRecord, RequestType};
use fiscal_store::{load_json_into, FiscalStore, LoadOutcome, StoreError};
use std::fs;
use tempfile::TempDir;

fn record(name: &str, monto: Option<f64>, tipo: RequestType, file: &str) -> ExtractedRecord {
    FiscalRecord {
        nombre_cliente: name.to_string(),
        monto,
        fecha: "2024-03-01".to_string(),
        tipo_solicitud: tipo,
    }
    .with_source(file)
}

#[test]
fn test_store_initialization() {
    let store = FiscalStore::in_memory();
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_insert_and_list() {
    let mut store = FiscalStore::in_memory().unwrap();
    let records = vec![
        record("Acme", Some(150.5), RequestType::Factura, "a.txt"),
        record("Ana García", None, RequestType::Queja, "queja.docx"),
    ];

    assert_eq!(store.insert_records(&records).unwrap(), 2);

    let rows = store.list().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].nombre_cliente, "Acme");
    assert_eq!(rows[0].monto, Some(150.5));
    assert_eq!(rows[0].tipo_solicitud, "Factura");
    assert_eq!(rows[0].archivo_origen.as_deref(), Some("a.txt"));
    assert_eq!(rows[1].nombre_cliente, "Ana García");
    assert_eq!(rows[1].monto, None);
    assert!(rows[0].id < rows[1].id);
}

#[test]
fn test_repeated_loads_append() {
    let mut store = FiscalStore::in_memory().unwrap();
    let records = vec![record("Acme", Some(1.0), RequestType::Venta, "a.txt")];

    store.insert_records(&records).unwrap();
    store.insert_records(&records).unwrap();

    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn test_load_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("resultado_final.json");
    let db_path = dir.path().join("base_fiscal.db");

    let records = vec![
        record("Acme", Some(150.5), RequestType::Factura, "a.txt"),
        record("Beta", None, RequestType::Venta, "ventas.xlsx"),
    ];
    fs::write(&json_path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

    let outcome = load_json_into(&json_path, &db_path).unwrap();
    assert_eq!(outcome, LoadOutcome::Inserted(2));

    // Reopen to check the data was committed
    let store = FiscalStore::open(&db_path).unwrap();
    let rows = store.list().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].archivo_origen.as_deref(), Some("ventas.xlsx"));
    assert_eq!(rows[1].fecha, "2024-03-01");
}

#[test]
fn test_missing_document_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("resultado_final.json");
    let db_path = dir.path().join("base_fiscal.db");

    let outcome = load_json_into(&json_path, &db_path).unwrap();

    assert_eq!(outcome, LoadOutcome::MissingDocument(json_path));
    assert!(!db_path.exists(), "Database should not be created");
}

#[test]
fn test_empty_document_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("resultado_final.json");
    let db_path = dir.path().join("base_fiscal.db");
    fs::write(&json_path, "[]").unwrap();

    let outcome = load_json_into(&json_path, &db_path).unwrap();

    assert_eq!(outcome, LoadOutcome::EmptyDocument);
    assert!(!db_path.exists(), "Database should not be created");
}

#[test]
fn test_malformed_document_is_error() {
    let dir = TempDir::new().unwrap();
    let json_path = dir.path().join("resultado_final.json");
    let db_path = dir.path().join("base_fiscal.db");
    fs::write(&json_path, r#"{"nombre_cliente": "Acme"}"#).unwrap();

    let result = load_json_into(&json_path, &db_path);

    assert!(matches!(result, Err(StoreError::InvalidData(_))));
    assert!(!db_path.exists());
}
