//! Read-only views over the stored snapshot log.

use std::fmt::Write;

use crate::error::Result;
use crate::models::{ContractRow, ProjectRow};
use crate::session::{NO_PROJECT, PROJECT_NOT_FOUND};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn render_projects(rows: &[ProjectRow], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(rows)? + "\n");
    }

    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "#{} {} (создан {})",
            row.id,
            row.name,
            row.created_date.format(DATE_FORMAT)
        );
    }
    Ok(out)
}

pub fn render_contracts(rows: &[ContractRow], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(rows)? + "\n");
    }

    let mut out = String::new();
    for row in rows {
        let project = match (row.project_id, &row.project_name) {
            (None, _) => NO_PROJECT,
            (Some(_), Some(name)) => name.as_str(),
            (Some(_), None) => PROJECT_NOT_FOUND,
        };
        let signed = row
            .signing_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "#{} {} ({}) - Проект: {} (создан {}, подписан {})",
            row.id,
            row.name,
            row.status,
            project,
            row.created_date.format(DATE_FORMAT),
            signed
        );
    }
    Ok(out)
}
