use rusqlite::Connection;

use crate::error::Result;

/// Both tables are created if absent and never altered or dropped.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY,
    name TEXT,
    created_date DATETIME
);

CREATE TABLE IF NOT EXISTS contracts (
    id INTEGER PRIMARY KEY,
    name TEXT,
    created_date DATETIME,
    status TEXT,
    signing_date DATETIME,
    project_id INTEGER,
    FOREIGN KEY (project_id) REFERENCES projects (id)
);
"#;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    tracing::info!("Schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i32 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('projects', 'contracts')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_creates_both_tables() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        assert_eq!(table_count(&conn), 2);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn.execute(
            "INSERT INTO projects (name, created_date) VALUES ('Alpha', '2024-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();

        initialize(&conn).unwrap(); // Should not fail or drop rows

        let rows: i32 = conn
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(table_count(&conn), 2);
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_existing_tables_are_left_alone() {
        let conn = Connection::open_in_memory().unwrap();

        // A database written before this program, with an extra column
        conn.execute_batch(
            "CREATE TABLE projects (id INTEGER PRIMARY KEY, name TEXT, created_date DATETIME, note TEXT);",
        )
        .unwrap();

        initialize(&conn).unwrap();

        let columns: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('projects')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(columns, 4);
        assert_eq!(table_count(&conn), 2);
    }
}
