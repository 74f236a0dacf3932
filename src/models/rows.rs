use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContractStatus;

/// A saved project, as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub created_date: DateTime<Utc>,
}

/// One contract snapshot, as read back from the store.
///
/// A logical contract has one row per save; rows of the same contract share
/// `name` and `created_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRow {
    pub id: i64,
    pub name: String,
    pub created_date: DateTime<Utc>,
    pub status: ContractStatus,
    pub signing_date: Option<DateTime<Utc>>,
    pub project_id: Option<i64>,
    /// Name of the linked project, `None` when unlinked or the project row is missing.
    pub project_name: Option<String>,
}
