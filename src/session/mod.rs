//! The interactive menu loop.
//!
//! A session holds the [`Registry`] for one run and dispatches each numbered
//! menu choice to one unit of work, then returns to the main menu.

mod console;

use std::io::{BufRead, Write};

pub use console::Console;

use crate::db::Store;
use crate::error::Result;
use crate::models::*;

const MENU: &[&str] = &[
    "Главное меню:",
    "1. Создать проект",
    "2. Создать договор",
    "3. Подтвердить договор",
    "4. Завершить договор",
    "5. Просмотреть список проектов",
    "6. Просмотреть список договоров",
    "7. Завершить работу с программой",
];

/// Shown in place of a project name when a contract has no project.
pub const NO_PROJECT: &str = "Нет";

/// Shown when a contract references a project id with no stored row.
pub const PROJECT_NOT_FOUND: &str = "Проект не найден";

/// Where the menu loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    CreatingProject,
    CreatingContract,
    ConfirmingContract,
    FinishingContract,
    ListingProjects,
    ListingContracts,
    Terminated,
}

impl MenuState {
    /// State selected by a main menu answer, `None` for anything but exactly 1-7.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Self::CreatingProject),
            "2" => Some(Self::CreatingContract),
            "3" => Some(Self::ConfirmingContract),
            "4" => Some(Self::FinishingContract),
            "5" => Some(Self::ListingProjects),
            "6" => Some(Self::ListingContracts),
            "7" => Some(Self::Terminated),
            _ => None,
        }
    }
}

pub struct Session<R, W> {
    store: Store,
    registry: Registry,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(store: Store, input: R, output: W) -> Self {
        Self::with_registry(store, Registry::new(), input, output)
    }

    /// Start from existing session state.
    pub fn with_registry(store: Store, registry: Registry, input: R, output: W) -> Self {
        Self {
            store,
            registry,
            console: Console::new(input, output),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_parts(self) -> (Registry, W) {
        (self.registry, self.console.into_output())
    }

    /// Run until the user picks 7 or the input closes at the main menu.
    ///
    /// An unparsable number at any prompt ends the session with an error.
    pub fn run(&mut self) -> Result<()> {
        let mut state = MenuState::MainMenu;
        while state != MenuState::Terminated {
            state = self.step(state)?;
        }
        tracing::info!(
            projects = self.registry.projects().len(),
            contracts = self.registry.contracts().len(),
            "Session ended"
        );
        Ok(())
    }

    /// Perform the work of `state` and return the next state.
    pub fn step(&mut self, state: MenuState) -> Result<MenuState> {
        match state {
            MenuState::MainMenu => return self.main_menu(),
            MenuState::CreatingProject => self.create_project()?,
            MenuState::CreatingContract => self.create_contract()?,
            MenuState::ConfirmingContract => self.confirm_contract()?,
            MenuState::FinishingContract => self.finish_contract()?,
            MenuState::ListingProjects => self.list_projects()?,
            MenuState::ListingContracts => self.list_contracts()?,
            MenuState::Terminated => return Ok(MenuState::Terminated),
        }
        Ok(MenuState::MainMenu)
    }

    fn main_menu(&mut self) -> Result<MenuState> {
        for line in MENU {
            self.console.say(line)?;
        }
        match self.console.read_line("Выберите действие: ")? {
            Some(choice) => Ok(MenuState::from_choice(&choice).unwrap_or(MenuState::MainMenu)),
            None => {
                tracing::info!("Input closed at main menu");
                Ok(MenuState::Terminated)
            }
        }
    }

    fn create_project(&mut self) -> Result<()> {
        let name = self.console.ask("Введите название проекта: ")?;
        let key = self.registry.push_project(Project::new(name));
        self.registry.save_project(key, &self.store)?;

        let name = self.registry.project(key).name().to_string();
        self.console
            .say(format!("Проект '{name}' создан и сохранен в базе данных."))
    }

    fn create_contract(&mut self) -> Result<()> {
        if self.registry.projects().is_empty() {
            return self.console.say("Сначала создайте проекты.");
        }

        self.print_projects()?;
        let project = self
            .console
            .ask_position(
                "Выберите проект для договора: ",
                self.registry.projects().len(),
            )?
            .and_then(|index| self.registry.project_key(index));
        let Some(project) = project else {
            return self.console.say("Недопустимый выбор.");
        };

        let name = self.console.ask("Введите название договора: ")?;
        if self.registry.has_contract_named(project, &name) {
            tracing::info!(name = %name, "Duplicate contract name");
            return self
                .console
                .say(format!("Договор с названием '{name}' уже существует."));
        }

        // A fresh contract is a draft, so this attach is expected to be refused;
        // contracts join a project list only through an explicit attach.
        let contract = self.registry.push_contract(Contract::new(name));
        let outcome = self
            .registry
            .add_contract(project, contract, &self.store)?;
        let name = self.registry.contract(contract).name().to_string();
        if outcome.is_attached() {
            let project_name = self.registry.project(project).name().to_string();
            self.console.say(format!(
                "Договор '{name}' создан и привязан к проекту '{project_name}'."
            ))?;
        }

        self.registry.save_contract(contract, &self.store)?;
        self.console
            .say(format!("Договор '{name}' создан и сохранен в базе данных."))
    }

    fn confirm_contract(&mut self) -> Result<()> {
        for (position, contract) in self.registry.contracts().iter().enumerate() {
            let line = format!("{}. {} ({})", position + 1, contract.name(), contract.status());
            self.console.say(line)?;
        }
        let contract = self
            .console
            .ask_position(
                "Выберите договор для подтверждения: ",
                self.registry.contracts().len(),
            )?
            .and_then(|index| self.registry.contract_key(index));
        let Some(contract) = contract else {
            return self.console.say("Недопустимый выбор договора.");
        };

        for (position, project) in self.registry.projects().iter().enumerate() {
            let line = format!("{}. {}", position + 1, project.name());
            self.console.say(line)?;
        }
        let project = self
            .console
            .ask_position(
                "Выберите проект для договора: ",
                self.registry.projects().len(),
            )?
            .and_then(|index| self.registry.project_key(index));
        let Some(project) = project else {
            return self.console.say("Недопустимый выбор проекта.");
        };

        let confirmation = self.registry.confirm(contract, project);
        self.registry.save_contract(contract, &self.store)?;

        let name = self.registry.contract(contract).name().to_string();
        match confirmation {
            Confirmation::Confirmed => {
                let project_name = self.registry.project(project).name().to_string();
                self.console.say(format!(
                    "Договор '{name}' подтвержден и привязан к проекту '{project_name}'."
                ))
            }
            Confirmation::NotDraft(status) => {
                tracing::info!(name = %name, %status, "Confirm skipped, not a draft");
                self.console.say(format!(
                    "Договор '{name}' не является черновиком ({status}) и не может быть подтвержден."
                ))
            }
        }
    }

    fn finish_contract(&mut self) -> Result<()> {
        self.console
            .say("Список доступных для завершения договоров:")?;
        for (index, contract) in self.registry.active_contracts() {
            let line = format!("{}. {} ({})", index + 1, contract.name(), contract.status());
            self.console.say(line)?;
        }

        // Positions index the full contract list, not only the Active ones shown.
        let contract = self
            .console
            .ask_position(
                "Выберите договор для завершения: ",
                self.registry.contracts().len(),
            )?
            .and_then(|index| self.registry.contract_key(index));
        let Some(contract) = contract else {
            return self.console.say("Недопустимый выбор договора.");
        };

        self.registry.finish(contract, &self.store)?;
        let name = self.registry.contract(contract).name().to_string();
        self.console.say(format!("Договор '{name}' завершен."))
    }

    fn list_projects(&mut self) -> Result<()> {
        self.print_projects()
    }

    fn print_projects(&mut self) -> Result<()> {
        self.console.say("Список проектов:")?;
        for (position, project) in self.registry.projects().iter().enumerate() {
            let line = format!("{}. {}", position + 1, project.name());
            self.console.say(line)?;
        }
        Ok(())
    }

    fn list_contracts(&mut self) -> Result<()> {
        self.console.say("Список договоров:")?;
        for (index, contract) in self.registry.contracts().iter().enumerate() {
            let project = match contract.project_id() {
                Some(id) => self
                    .store
                    .find_project_name(id)?
                    .unwrap_or_else(|| PROJECT_NOT_FOUND.to_string()),
                None => NO_PROJECT.to_string(),
            };
            let line = format!(
                "{}. {} ({}) - Проект: {}",
                index + 1,
                contract.name(),
                contract.status(),
                project
            );
            self.console.say(line)?;
        }
        Ok(())
    }
}
