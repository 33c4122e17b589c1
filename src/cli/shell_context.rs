use dialoguer::theme::ColorfulTheme;

use crate::{config::ConfigManager, core::Orchard};

use super::commands;
use super::core::{CliError, CommandError};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
    orchard: Orchard,
}

impl ShellContext {
    /// Opens the configured dataset.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let orchard = Orchard::from_config(&config_manager)?;
        tracing::debug!(config = %config_manager.path().display(), "shell dataset ready");
        Ok(Self::with_orchard(mode, orchard))
    }

    pub fn with_orchard(mode: CliMode, orchard: Orchard) -> Self {
        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }
        Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
            orchard,
        }
    }

    pub fn orchard(&self) -> &Orchard {
        &self.orchard
    }

    pub fn orchard_mut(&mut self) -> &mut Orchard {
        &mut self.orchard
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        "orchard> ".to_string()
    }

    pub(crate) fn require_interactive(&self, command: &str) -> Result<(), CommandError> {
        if self.mode == CliMode::Interactive {
            Ok(())
        } else {
            Err(CommandError::InvalidArguments(format!(
                "`{command}` is only available in interactive mode"
            )))
        }
    }
}
