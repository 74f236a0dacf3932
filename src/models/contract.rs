use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Project;
use crate::db::Store;
use crate::error::Result;

/// An agreement that may be attached to one project while it is in force.
///
/// # Lifecycle
/// Contracts progress Draft → Active → Finished and never return to Draft.
/// Confirming moves a draft to Active and links it to a project; finishing
/// clears the link whatever it was.
///
/// `id` is the row id of the most recent save. Every save inserts a new row,
/// so the id changes each time.
#[derive(Debug, Clone)]
pub struct Contract {
    id: Option<i64>,
    name: String,
    created_date: DateTime<Utc>,
    status: ContractStatus,
    signing_date: Option<DateTime<Utc>>,
    project_id: Option<i64>,
}

/// The lifecycle state of a contract.
///
/// Stored and displayed by its Russian label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Active,
    Finished,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Черновик",
            Self::Active => "Активен",
            Self::Finished => "Завершен",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Черновик" => Some(Self::Draft),
            "Активен" => Some(Self::Active),
            "Завершен" => Some(Self::Finished),
            _ => None,
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`Contract::confirm_contract`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    /// Only drafts can be confirmed; nothing was changed.
    NotDraft(ContractStatus),
}

impl Confirmation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

impl Contract {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_project_id(name, None)
    }

    /// Construct a draft that already carries a project reference.
    pub fn with_project_id(name: impl Into<String>, project_id: Option<i64>) -> Self {
        Self {
            id: None,
            name: name.into(),
            created_date: Utc::now(),
            status: ContractStatus::Draft,
            signing_date: None,
            project_id,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_date(&self) -> DateTime<Utc> {
        self.created_date
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    pub fn signing_date(&self) -> Option<DateTime<Utc>> {
        self.signing_date
    }

    pub fn project_id(&self) -> Option<i64> {
        self.project_id
    }

    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }

    /// Sign a draft and link it to `project`. Does not save.
    pub fn confirm_contract(&mut self, project: &Project) -> Confirmation {
        if self.status != ContractStatus::Draft {
            return Confirmation::NotDraft(self.status);
        }
        self.status = ContractStatus::Active;
        self.signing_date = Some(Utc::now());
        self.project_id = project.id();
        Confirmation::Confirmed
    }

    /// Close the contract and drop any project link, then save.
    pub fn finish_contract(&mut self, store: &Store) -> Result<i64> {
        self.project_id = None;
        self.status = ContractStatus::Finished;
        self.save_to_store(store)
    }

    /// Append the current state as a new row and remember its id.
    pub fn save_to_store(&mut self, store: &Store) -> Result<i64> {
        let id = store.insert_contract(
            &self.name,
            self.created_date,
            self.status,
            self.signing_date,
            self.project_id,
        )?;
        self.id = Some(id);
        Ok(id)
    }

    pub(super) fn set_project_id(&mut self, project_id: Option<i64>) {
        self.project_id = project_id;
    }
}
