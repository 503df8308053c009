use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("column '{0}' missing or of unexpected type")]
    Column(String),
}

impl SQLError {
    /// Whether the failure came from a UNIQUE / PRIMARY KEY constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SQLError::Execution(msg) => msg.contains("UNIQUE constraint"),
            _ => false,
        }
    }
}
