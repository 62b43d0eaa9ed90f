//! Fiscal Storage Layer
//!
//! Loads extraction results into the `documentos_fiscales` SQLite table.
//!
//! # Examples
//!
//! ```no_run
//! use fiscal_store::{load_json_into, LoadOutcome};
//!
//! match load_json_into("resultado_final.json", "base_fiscal.db").unwrap() {
//!     LoadOutcome::Inserted(n) => println!("Inserted {} records", n),
//!     other => println!("Nothing loaded: {:?}", other),
//! }
//! ```

#![warn(missing_docs)]

use fiscal_domain::{ExtractedRecord, ResultBatch};
use rusqlite::{params, Connection};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The result document could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The result document is not an array of records
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// What a load did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This many rows were inserted
    Inserted(usize),
    /// The result document does not exist; the database was not touched
    MissingDocument(PathBuf),
    /// The result document holds no records; the database was not touched
    EmptyDocument,
}

/// A row of `documentos_fiscales`
///
/// Values are read back as stored, so `tipo_solicitud` is plain text here.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Row id assigned by SQLite
    pub id: i64,
    /// Client name
    pub nombre_cliente: String,
    /// Amount, if any
    pub monto: Option<f64>,
    /// Date as extracted
    pub fecha: String,
    /// Request type
    pub tipo_solicitud: String,
    /// Source file name
    pub archivo_origen: Option<String>,
}

/// SQLite store for extracted fiscal records
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// FiscalStore instance.
pub struct FiscalStore {
    conn: Connection,
}

impl FiscalStore {
    /// Open (creating if needed) the database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Insert every record in one transaction, returning the row count
    ///
    /// Rows are appended as given; nothing is updated or deduplicated.
    pub fn insert_records(&mut self, records: &[ExtractedRecord]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documentos_fiscales (nombre_cliente, monto, fecha, tipo_solicitud, archivo_origen)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for extracted in records {
                let record = &extracted.record;
                stmt.execute(params![
                    &record.nombre_cliente,
                    record.monto,
                    &record.fecha,
                    record.tipo_solicitud.as_str(),
                    &extracted.archivo_origen,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Committed {} rows", records.len());
        Ok(records.len())
    }

    /// Number of rows in the table
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM documentos_fiscales", [], |row| {
                    row.get(0)
                })?;
        Ok(count as usize)
    }

    /// Every row, in insertion order
    pub fn list(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, nombre_cliente, monto, fecha, tipo_solicitud, archivo_origen
             FROM documentos_fiscales ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    nombre_cliente: row.get(1)?,
                    monto: row.get(2)?,
                    fecha: row.get(3)?,
                    tipo_solicitud: row.get(4)?,
                    archivo_origen: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

/// Read a result document written by the extractor
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read_result_document(path: &Path) -> Result<Option<ResultBatch>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| StoreError::InvalidData(format!("{}: {}", path.display(), e)))
}

/// Load a result document into the database at `db_path`
///
/// The document is read first; a missing or empty document returns without
/// opening (or creating) the database.
pub fn load_json_into(
    json_path: impl AsRef<Path>,
    db_path: impl AsRef<Path>,
) -> Result<LoadOutcome, StoreError> {
    let json_path = json_path.as_ref();
    let db_path = db_path.as_ref();

    let Some(records) = read_result_document(json_path)? else {
        warn!("Result document {} not found", json_path.display());
        return Ok(LoadOutcome::MissingDocument(json_path.to_path_buf()));
    };

    if records.is_empty() {
        warn!("Result document {} is empty", json_path.display());
        return Ok(LoadOutcome::EmptyDocument);
    }

    let mut store = FiscalStore::open(db_path)?;
    let inserted = store.insert_records(&records)?;
    info!("Inserted {} records into {}", inserted, db_path.display());

    Ok(LoadOutcome::Inserted(inserted))
}
