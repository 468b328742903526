//! SQLite backend.
//!
//! `url` is a file path or a `file:` URI. SQLite has no user accounts, so
//! the user name and secret are required by configuration but unused here.

use crate::config::Credentials;
use crate::connector::{Connector, Session};
use compound_core::{Error, Record, Result, Value};
use compound_query::Placeholder;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::sync::Arc;
use std::time::Duration;

/// SQLite's default `SQLITE_MAX_VARIABLE_NUMBER` since 3.32
pub const SQLITE_MAX_BIND_PARAMETERS: usize = 32766;

/// Default time to wait on a locked database (5 seconds)
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens read-only SQLite sessions.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    busy_timeout: Duration,
}

impl SqliteConnector {
    /// Creates a connector with the default busy timeout
    pub fn new() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Set how long a statement waits on a locked database
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

impl Default for SqliteConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for SqliteConnector {
    type Session = SqliteSession;

    fn connect(&self, credentials: &Credentials) -> Result<SqliteSession> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let connection = Connection::open_with_flags(credentials.url(), flags)
            .map_err(|err| Error::Connection(format!("{}: {}", credentials.url(), err)))?;
        connection
            .busy_timeout(self.busy_timeout)
            .map_err(|err| Error::Connection(err.to_string()))?;
        // Opening is lazy; a file that is not a database only fails on first read.
        connection
            .query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
            .map_err(|err| Error::Connection(format!("{}: {}", credentials.url(), err)))?;
        tracing::trace!(url = credentials.url(), "sqlite session opened");
        Ok(SqliteSession { connection })
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::QuestionNumbered
    }

    fn max_bind_parameters(&self) -> usize {
        SQLITE_MAX_BIND_PARAMETERS
    }
}

/// An open read-only SQLite connection.
pub struct SqliteSession {
    connection: Connection,
}

impl Session for SqliteSession {
    fn fetch(&mut self, sql: &str, params: &[&str]) -> Result<Vec<Record>> {
        let mut stmt = self.connection.prepare(sql).map_err(query_error)?;
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(params)).map_err(query_error)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(query_error)? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(convert(row.get_ref(index).map_err(query_error)?));
            }
            records.push(Record::new(Arc::clone(&columns), values));
        }
        Ok(records)
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        tracing::trace!("sqlite session released");
    }
}

fn convert(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

fn query_error(err: rusqlite::Error) -> Error {
    Error::Query(err.to_string())
}
