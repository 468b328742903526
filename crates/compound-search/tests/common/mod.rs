// Common fixtures for compound search integration tests

use compound_search::{
    Connector, Credentials, Error, Placeholder, QueryShape, Record, Result, SearchConfig, Session,
    Value,
};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A temporary SQLite registry with a molecule table and a batch table
pub struct RegistryFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
}

impl RegistryFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("registry.db");
        let conn = Connection::open(&db_path).expect("Failed to create registry");
        conn.execute_batch(
            "CREATE TABLE MOLECULE (
                 MOL_COMP_ID INTEGER PRIMARY KEY,
                 MOL_REGID TEXT NOT NULL,
                 MOL_WEIGHT REAL,
                 MOL_CTFILE BLOB
             );
             CREATE TABLE BATCH (
                 BATCH_ID INTEGER PRIMARY KEY,
                 BATCH_REGID TEXT NOT NULL,
                 MOL_COMP_ID INTEGER NOT NULL REFERENCES MOLECULE (MOL_COMP_ID)
             );",
        )
        .expect("Failed to create schema");

        Self { temp_dir, db_path }
    }

    /// Inserts a molecule row and returns its key
    pub fn add_molecule(&self, regid: &str, weight: f64) -> i64 {
        let conn = Connection::open(&self.db_path).expect("Failed to open registry");
        let ctfile = format!(
            "{}\n  fixture\n\n  0  0  0  0  0  0  0  0  0  0999 V2000\nM  END\n",
            regid
        );
        conn.execute(
            "INSERT INTO MOLECULE (MOL_REGID, MOL_WEIGHT, MOL_CTFILE) VALUES (?1, ?2, ?3)",
            params![regid, weight, ctfile.into_bytes()],
        )
        .expect("Failed to insert molecule");
        conn.last_insert_rowid()
    }

    #[allow(dead_code)]
    pub fn add_batch(&self, regid: &str, molecule: i64) {
        let conn = Connection::open(&self.db_path).expect("Failed to open registry");
        conn.execute(
            "INSERT INTO BATCH (BATCH_REGID, MOL_COMP_ID) VALUES (?1, ?2)",
            params![regid, molecule],
        )
        .expect("Failed to insert batch");
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.db_path.to_string_lossy(), "reader", "unused")
            .expect("Failed to build credentials")
    }

    /// Molecule lookup by registration id
    pub fn molecule_config(&self) -> SearchConfig {
        SearchConfig::new(
            self.credentials(),
            QueryShape::new("MOLECULE", "MOL_REGID").with_projection([
                "MOL_REGID",
                "MOL_WEIGHT",
                "MOL_CTFILE",
            ]),
        )
    }
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
/// Counters shared between a test and its recording connector
#[derive(Default)]
pub struct Recorder {
    pub opened: AtomicUsize,
    pub released: AtomicUsize,
    pub statements: Mutex<Vec<(String, Vec<String>)>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn statements(&self) -> Vec<(String, Vec<String>)> {
        self.statements.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
/// In-process connector that serves rows from a fixed table and records
/// every session and statement.
pub struct RecordingConnector {
    pub recorder: Arc<Recorder>,
    pub rows: Vec<(String, i64)>,
    pub max_bind_parameters: usize,
    pub refuse_connect: bool,
    /// 1-based statement number that fails, counted per session
    pub fail_on_statement: Option<usize>,
}

#[allow(dead_code)]
impl RecordingConnector {
    pub fn new(rows: &[(&str, i64)]) -> Self {
        Self {
            recorder: Arc::new(Recorder::default()),
            rows: rows.iter().map(|(id, v)| (id.to_string(), *v)).collect(),
            max_bind_parameters: 1000,
            refuse_connect: false,
            fail_on_statement: None,
        }
    }
}

impl Connector for RecordingConnector {
    type Session = RecordingSession;

    fn connect(&self, _credentials: &Credentials) -> Result<RecordingSession> {
        if self.refuse_connect {
            return Err(Error::Connection("connection refused".to_string()));
        }
        self.recorder.opened.fetch_add(1, Ordering::SeqCst);
        Ok(RecordingSession {
            recorder: Arc::clone(&self.recorder),
            rows: self.rows.clone(),
            fail_on_statement: self.fail_on_statement,
            executed: 0,
        })
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Colon
    }

    fn max_bind_parameters(&self) -> usize {
        self.max_bind_parameters
    }
}

#[allow(dead_code)]
pub struct RecordingSession {
    recorder: Arc<Recorder>,
    rows: Vec<(String, i64)>,
    fail_on_statement: Option<usize>,
    executed: usize,
}

impl Session for RecordingSession {
    fn fetch(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Record>> {
        self.executed += 1;
        self.recorder.statements.lock().unwrap().push((
            sql.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        ));
        if self.fail_on_statement == Some(self.executed) {
            return Err(Error::Query("ORA-00904: invalid identifier".to_string()));
        }

        let columns: Arc<[String]> = vec!["ID".to_string(), "VALUE".to_string()].into();
        Ok(self
            .rows
            .iter()
            .filter(|(id, _)| params.contains(&id.as_str()))
            .map(|(id, v)| {
                Record::new(
                    Arc::clone(&columns),
                    vec![Value::from(id.as_str()), Value::from(*v)],
                )
            })
            .collect())
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.recorder.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[allow(dead_code)]
pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
