use chrono::{DateTime, Utc};

use super::{Contract, ContractKey};
use crate::db::Store;
use crate::error::Result;

/// A project that contracts are attached to.
///
/// `contracts` lists the contracts associated with the project during the
/// running session. It is never rebuilt from the store, and dropping a key
/// from it leaves the contract itself alone.
#[derive(Debug, Clone)]
pub struct Project {
    id: Option<i64>,
    name: String,
    created_date: DateTime<Utc>,
    contracts: Vec<ContractKey>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            created_date: Utc::now(),
            contracts: Vec::new(),
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

    pub fn contracts(&self) -> &[ContractKey] {
        &self.contracts
    }

    pub fn lists(&self, key: ContractKey) -> bool {
        self.contracts.contains(&key)
    }

    /// Whether any listed contract is Active. `all` is the session contract list.
    pub fn has_active_contract(&self, all: &[Contract]) -> bool {
        self.listed(all).any(Contract::is_active)
    }

    /// Whether a listed contract is named exactly `name`.
    pub fn has_contract_named(&self, all: &[Contract], name: &str) -> bool {
        self.listed(all).any(|c| c.name() == name)
    }

    fn listed<'a>(&'a self, all: &'a [Contract]) -> impl Iterator<Item = &'a Contract> + 'a {
        self.contracts.iter().filter_map(|key| all.get(key.index()))
    }

    pub(super) fn push_contract(&mut self, key: ContractKey) {
        self.contracts.push(key);
    }

    pub(super) fn drop_contract(&mut self, key: ContractKey) -> bool {
        let before = self.contracts.len();
        self.contracts.retain(|k| *k != key);
        self.contracts.len() != before
    }

    /// Append the project as a new row and remember its id.
    ///
    /// Saving twice writes two rows.
    pub fn save_to_store(&mut self, store: &Store) -> Result<i64> {
        let id = store.insert_project(&self.name, self.created_date)?;
        self.id = Some(id);
        Ok(id)
    }
}
