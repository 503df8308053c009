use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use rusqlite::types::{Value as SqliteValue, ValueRef};

use crate::error::SQLError;
use crate::traits::{Row, SQLExec, SQLStore, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// One connection behind a mutex: statements are serialized, which is
/// what keeps `atomic` blocks from interleaving.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        // WAL for concurrent readers from other processes (backups, sqlite3 shell).
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl From<&Value> for SqliteValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => SqliteValue::Null,
            Value::Integer(i) => SqliteValue::Integer(*i),
            Value::Real(f) => SqliteValue::Real(*f),
            Value::Text(s) => SqliteValue::Text(s.clone()),
            Value::Blob(b) => SqliteValue::Blob(b.clone()),
        }
    }
}

fn from_value_ref(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let bound = rusqlite::params_from_iter(params.iter().map(SqliteValue::from));
    let rows = stmt
        .query_map(bound, |row| {
            let mut columns = Vec::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                columns.push((name.clone(), from_value_ref(row.get_ref(i)?)));
            }
            Ok(Row { columns })
        })
        .map_err(|e| SQLError::Query(e.to_string()))?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
    }
    Ok(result)
}

fn run_exec(conn: &Connection, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
    let bound = rusqlite::params_from_iter(params.iter().map(SqliteValue::from));
    let affected = conn
        .execute(sql, bound)
        .map_err(|e| SQLError::Execution(e.to_string()))?;
    Ok(affected as u64)
}

/// Executor handed to `atomic` bodies; borrows the open transaction.
struct TxExec<'a> {
    conn: &'a Connection,
}

impl SQLExec for TxExec<'_> {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        run_query(self.conn, sql, params)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        run_exec(self.conn, sql, params)
    }
}

impl SQLExec for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Query(e.to_string()))?;
        run_query(&conn, sql, params)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        run_exec(&conn, sql, params)
    }
}

impl SQLStore for SqliteStore {
    fn atomic(
        &self,
        body: &mut dyn FnMut(&dyn SQLExec) -> Result<(), SQLError>,
    ) -> Result<(), SQLError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| SQLError::Execution(e.to_string()))?;
        let tx = conn
            .transaction()
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        // Dropping `tx` on the error path rolls back.
        body(&TxExec { conn: &tx })?;

        tx.commit()
            .map_err(|e| SQLError::Execution(e.to_string()))
    }
}
