use super::{Confirmation, Contract, Project};
use crate::db::Store;
use crate::error::Result;

/// Session-local handle to a project in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectKey(usize);

/// Session-local handle to a contract in a [`Registry`].
///
/// Store ids change on every save, so contracts are identified by key instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractKey(usize);

impl ContractKey {
    pub(super) fn index(self) -> usize {
        self.0
    }
}

/// Why [`Registry::add_contract`] refused to attach a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachRejection {
    /// Only Active contracts can be attached.
    NotActive,
    /// The project already lists an Active contract.
    ProjectHasActiveContract,
    /// The contract already references a project.
    AlreadyLinked,
    /// The project already lists this contract.
    AlreadyListed,
}

/// Result of [`Registry::add_contract`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Attached,
    Rejected(AttachRejection),
}

impl AttachOutcome {
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached)
    }
}

/// The projects and contracts created during one session.
///
/// This is the source of truth while the program runs; the store only keeps
/// a history of snapshots and is never read back into it. Keys handed out by
/// one registry must not be used with another.
#[derive(Debug, Default)]
pub struct Registry {
    projects: Vec<Project>,
    contracts: Vec<Contract>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    pub fn project(&self, key: ProjectKey) -> &Project {
        &self.projects[key.0]
    }

    pub fn contract(&self, key: ContractKey) -> &Contract {
        &self.contracts[key.0]
    }

    /// Key of the project at a 0-based position in the session list.
    pub fn project_key(&self, index: usize) -> Option<ProjectKey> {
        (index < self.projects.len()).then_some(ProjectKey(index))
    }

    /// Key of the contract at a 0-based position in the session list.
    pub fn contract_key(&self, index: usize) -> Option<ContractKey> {
        (index < self.contracts.len()).then_some(ContractKey(index))
    }

    pub fn push_project(&mut self, project: Project) -> ProjectKey {
        self.projects.push(project);
        ProjectKey(self.projects.len() - 1)
    }

    pub fn push_contract(&mut self, contract: Contract) -> ContractKey {
        self.contracts.push(contract);
        ContractKey(self.contracts.len() - 1)
    }

    pub fn has_active_contract(&self, project: ProjectKey) -> bool {
        self.projects[project.0].has_active_contract(&self.contracts)
    }

    pub fn has_contract_named(&self, project: ProjectKey, name: &str) -> bool {
        self.projects[project.0].has_contract_named(&self.contracts, name)
    }

    /// Attach an Active, unlinked contract to a project with no Active contract.
    ///
    /// On success the contract is listed, linked to the project's id and saved.
    /// A rejection changes nothing.
    pub fn add_contract(
        &mut self,
        project: ProjectKey,
        contract: ContractKey,
        store: &Store,
    ) -> Result<AttachOutcome> {
        if let Some(reason) = self.attach_rejection(project, contract) {
            tracing::info!(
                project = self.projects[project.0].name(),
                contract = self.contracts[contract.0].name(),
                ?reason,
                "Contract not attached"
            );
            return Ok(AttachOutcome::Rejected(reason));
        }

        let target = &mut self.projects[project.0];
        target.push_contract(contract);
        let project_id = target.id();

        let entry = &mut self.contracts[contract.0];
        entry.set_project_id(project_id);
        entry.save_to_store(store)?;
        Ok(AttachOutcome::Attached)
    }

    fn attach_rejection(&self, project: ProjectKey, contract: ContractKey) -> Option<AttachRejection> {
        let target = &self.projects[project.0];
        let entry = &self.contracts[contract.0];

        if !entry.is_active() {
            Some(AttachRejection::NotActive)
        } else if target.has_active_contract(&self.contracts) {
            Some(AttachRejection::ProjectHasActiveContract)
        } else if entry.project_id().is_some() {
            Some(AttachRejection::AlreadyLinked)
        } else if target.lists(contract) {
            Some(AttachRejection::AlreadyListed)
        } else {
            None
        }
    }

    /// Detach a listed contract from a project and save it unlinked.
    ///
    /// Returns `false` without saving when the project does not list it.
    /// The contract's status is left as it was.
    pub fn remove_contract(
        &mut self,
        project: ProjectKey,
        contract: ContractKey,
        store: &Store,
    ) -> Result<bool> {
        if !self.projects[project.0].drop_contract(contract) {
            return Ok(false);
        }
        let entry = &mut self.contracts[contract.0];
        entry.set_project_id(None);
        entry.save_to_store(store)?;
        Ok(true)
    }

    /// Confirm a contract against a project. Does not save.
    ///
    /// The project's contract list is not touched.
    pub fn confirm(&mut self, contract: ContractKey, project: ProjectKey) -> Confirmation {
        let target = &self.projects[project.0];
        self.contracts[contract.0].confirm_contract(target)
    }

    /// Finish a contract and save it. Project lists keep their key for it.
    pub fn finish(&mut self, contract: ContractKey, store: &Store) -> Result<i64> {
        self.contracts[contract.0].finish_contract(store)
    }

    pub fn save_project(&mut self, project: ProjectKey, store: &Store) -> Result<i64> {
        self.projects[project.0].save_to_store(store)
    }

    pub fn save_contract(&mut self, contract: ContractKey, store: &Store) -> Result<i64> {
        self.contracts[contract.0].save_to_store(store)
    }

    /// Active contracts with their 0-based position in the session list.
    pub fn active_contracts(&self) -> impl Iterator<Item = (usize, &Contract)> {
        self.contracts
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContractStatus;

    fn store() -> Store {
        let store = Store::open_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    /// An Active contract with no project link: confirmed against a project
    /// that was never saved.
    fn active_unlinked(registry: &mut Registry, name: &str) -> ContractKey {
        let key = registry.push_contract(Contract::new(name));
        let scratch = registry.push_project(Project::new("scratch"));
        assert!(registry.confirm(key, scratch).is_confirmed());
        key
    }

    #[test]
    fn test_attach_links_lists_and_saves() {
        let store = store();
        let mut registry = Registry::new();
        let alpha = registry.push_project(Project::new("Alpha"));
        registry.save_project(alpha, &store).unwrap();
        let c1 = active_unlinked(&mut registry, "C1");

        let outcome = registry.add_contract(alpha, c1, &store).unwrap();

        assert!(outcome.is_attached());
        assert!(registry.project(alpha).lists(c1));
        assert_eq!(registry.contract(c1).project_id(), registry.project(alpha).id());
        assert!(registry.contract(c1).id().is_some());
        assert!(registry.has_active_contract(alpha));
    }

    #[test]
    fn test_attach_rejects_draft_without_mutation() {
        let store = store();
        let mut registry = Registry::new();
        let alpha = registry.push_project(Project::new("Alpha"));
        registry.save_project(alpha, &store).unwrap();
        let c1 = registry.push_contract(Contract::new("C1"));

        let outcome = registry.add_contract(alpha, c1, &store).unwrap();

        assert_eq!(outcome, AttachOutcome::Rejected(AttachRejection::NotActive));
        assert!(registry.project(alpha).contracts().is_empty());
        assert!(registry.contract(c1).id().is_none());
        assert_eq!(registry.contract(c1).status(), ContractStatus::Draft);
    }

    #[test]
    fn test_second_active_contract_is_rejected() {
        let store = store();
        let mut registry = Registry::new();
        let alpha = registry.push_project(Project::new("Alpha"));
        registry.save_project(alpha, &store).unwrap();
        let c1 = active_unlinked(&mut registry, "C1");
        let c2 = active_unlinked(&mut registry, "C2");

        let _ = registry.add_contract(alpha, c1, &store).unwrap();
        let outcome = registry.add_contract(alpha, c2, &store).unwrap();

        assert_eq!(
            outcome,
            AttachOutcome::Rejected(AttachRejection::ProjectHasActiveContract)
        );
        assert_eq!(registry.project(alpha).contracts(), &[c1]);
        assert!(registry.contract(c2).project_id().is_none());
    }

    #[test]
    fn test_remove_unlists_and_unlinks() {
        let store = store();
        let mut registry = Registry::new();
        let alpha = registry.push_project(Project::new("Alpha"));
        registry.save_project(alpha, &store).unwrap();
        let c1 = active_unlinked(&mut registry, "C1");
        let _ = registry.add_contract(alpha, c1, &store).unwrap();

        assert!(registry.remove_contract(alpha, c1, &store).unwrap());
        assert!(!registry.project(alpha).lists(c1));
        assert!(registry.contract(c1).project_id().is_none());
        assert_eq!(registry.contract(c1).status(), ContractStatus::Active);

        assert!(!registry.remove_contract(alpha, c1, &store).unwrap());
    }

    #[test]
    fn test_key_lookup_is_bounded() {
        let mut registry = Registry::new();
        registry.push_project(Project::new("Alpha"));
        assert!(registry.project_key(0).is_some());
        assert!(registry.project_key(1).is_none());
        assert!(registry.contract_key(0).is_none());
    }
}
