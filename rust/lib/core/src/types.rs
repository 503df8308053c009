use serde::{Deserialize, Serialize};

/// Pagination parameters for list operations (`?offset=0&limit=10`).
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Number of rows to skip.
    #[serde(default)]
    pub offset: usize,

    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Upper bound applied to any caller-supplied `limit`.
pub const MAX_LIMIT: usize = 100;

fn default_limit() -> usize {
    10
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl ListParams {
    /// The limit clamped to `1..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// The offset as a SQL integer, or `None` past `i64::MAX`.
    pub fn sql_offset(&self) -> Option<i64> {
        i64::try_from(self.offset).ok()
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Body returned by create/update endpoints: just the affected id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

impl IdResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Generate a time-sortable ID (ULID, 26 chars Crockford base32).
pub fn new_sortable_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
