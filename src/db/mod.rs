mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

pub use schema::SCHEMA;

use crate::error::Result;
use crate::models::*;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "contracts_projects.db";

/// Append-only durable record of every project and contract snapshot.
///
/// Each call runs exactly one statement in auto-commit mode. A file-backed
/// store opens a fresh connection per call; the in-memory store shares one
/// connection because a new `:memory:` connection would be a new database.
#[derive(Clone)]
pub struct Store {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    File(PathBuf),
    Memory(Arc<Mutex<Connection>>),
}

const CONTRACT_COLUMNS: &str =
    "c.id, c.name, c.created_date, c.status, c.signing_date, c.project_id, p.name";

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        // Fail early on an unusable path rather than at the first prompt
        Connection::open(&path)?;
        Ok(Self {
            backend: Backend::File(path),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            backend: Backend::Memory(Arc::new(Mutex::new(conn))),
        })
    }

    /// Path of the database file, `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::File(path) => Some(path),
            Backend::Memory(_) => None,
        }
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        match &self.backend {
            Backend::File(path) => {
                let conn = Connection::open(path)?;
                f(&conn)
            }
            Backend::Memory(conn) => {
                let conn = conn.lock().expect("database lock poisoned");
                f(&conn)
            }
        }
    }

    /// Ensure both tables exist. Safe on every start.
    pub fn initialize(&self) -> Result<()> {
        self.with_conn(schema::initialize)
    }

    // ============================================================
    // Writes
    // ============================================================

    pub fn insert_project(&self, name: &str, created_date: DateTime<Utc>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO projects (name, created_date) VALUES (?, ?)",
                (name, created_date.to_rfc3339()),
            )?;
            let id = conn.last_insert_rowid();
            tracing::debug!(table = "projects", id, name, "Inserted row");
            Ok(id)
        })
    }

    /// The only write path for contracts: every save appends a new row.
    pub fn insert_contract(
        &self,
        name: &str,
        created_date: DateTime<Utc>,
        status: ContractStatus,
        signing_date: Option<DateTime<Utc>>,
        project_id: Option<i64>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contracts (name, created_date, status, signing_date, project_id)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    name,
                    created_date.to_rfc3339(),
                    status.as_str(),
                    signing_date.map(|d| d.to_rfc3339()),
                    project_id,
                ),
            )?;
            let id = conn.last_insert_rowid();
            tracing::debug!(
                table = "contracts",
                id,
                name,
                status = status.as_str(),
                ?project_id,
                "Inserted row"
            );
            Ok(id)
        })
    }

    // ============================================================
    // Lookups
    // ============================================================

    pub fn find_project_name(&self, project_id: i64) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let name = conn
                .query_row(
                    "SELECT name FROM projects WHERE id = ?",
                    [project_id],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()?;
            Ok(name.map(Option::unwrap_or_default))
        })
    }

    pub fn project_rows(&self) -> Result<Vec<ProjectRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, created_date FROM projects ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(ProjectRow {
                        id: row.get(0)?,
                        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        created_date: parse_datetime(row.get::<_, Option<String>>(2)?),
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Every contract snapshot in insertion order.
    pub fn contract_log(&self) -> Result<Vec<ContractRow>> {
        self.query_contracts(&format!(
            "SELECT {CONTRACT_COLUMNS}
             FROM contracts c LEFT JOIN projects p ON p.id = c.project_id
             ORDER BY c.id"
        ))
    }

    /// Last-write-wins view: the newest snapshot of each logical contract.
    ///
    /// Snapshots of one contract share its name and construction timestamp.
    pub fn latest_contracts(&self) -> Result<Vec<ContractRow>> {
        self.query_contracts(&format!(
            "SELECT {CONTRACT_COLUMNS}
             FROM contracts c LEFT JOIN projects p ON p.id = c.project_id
             WHERE c.id IN (SELECT MAX(id) FROM contracts GROUP BY name, created_date)
             ORDER BY c.id"
        ))
    }

    fn query_contracts(&self, sql: &str) -> Result<Vec<ContractRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(ContractRow {
                        id: row.get(0)?,
                        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                        created_date: parse_datetime(row.get::<_, Option<String>>(2)?),
                        status: row
                            .get::<_, Option<String>>(3)?
                            .as_deref()
                            .and_then(ContractStatus::from_label)
                            .unwrap_or(ContractStatus::Draft),
                        signing_date: row
                            .get::<_, Option<String>>(4)?
                            .map(|s| parse_datetime(Some(s))),
                        project_id: row.get(5)?,
                        project_name: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn parse_datetime(s: Option<String>) -> DateTime<Utc> {
    s.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
