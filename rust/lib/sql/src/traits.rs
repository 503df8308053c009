use crate::error::SQLError;

/// A dynamically-typed SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(if b { 1 } else { 0 })
    }
}

/// A row returned from a SQL query: column name to value.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a text column value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get an integer column value by name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Text column that must be present.
    pub fn text(&self, name: &str) -> Result<String, SQLError> {
        self.get_str(name)
            .map(str::to_string)
            .ok_or_else(|| SQLError::Column(name.to_string()))
    }

    /// Integer column that must be present.
    pub fn int(&self, name: &str) -> Result<i64, SQLError> {
        self.get_i64(name)
            .ok_or_else(|| SQLError::Column(name.to_string()))
    }

    /// Integer column read as a 0/1 flag.
    pub fn flag(&self, name: &str) -> Result<bool, SQLError> {
        self.int(name).map(|v| v != 0)
    }
}

/// Statement execution against a connection or an open transaction.
pub trait SQLExec {
    /// Execute a query and return rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError>;

    /// Execute a statement (INSERT/UPDATE/DELETE) and return affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError>;
}

/// SQLStore provides a SQL execution interface backed by an embedded database.
pub trait SQLStore: SQLExec + Send + Sync {
    /// Run `body` inside a single transaction.
    ///
    /// The transaction commits when `body` returns `Ok` and rolls back
    /// otherwise. No other statement on this store interleaves with it.
    fn atomic(
        &self,
        body: &mut dyn FnMut(&dyn SQLExec) -> Result<(), SQLError>,
    ) -> Result<(), SQLError>;
}
