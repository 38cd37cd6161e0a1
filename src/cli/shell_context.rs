//! Shared runtime state for CLI interactions and command execution.

use fintrack_core::{time::Clock, SessionReport};
use fintrack_storage_json::JsonLedgerStore;

use crate::cli::{
    commands,
    core::CommandError,
    formatters::CliFormatters,
    output::{self, OutputPreferences},
    registry::CommandRegistry,
    system_clock,
};
use crate::config::{self, Config, ConfigManager};
use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: JsonLedgerStore,
    pub clock: Box<dyn Clock>,
    pub formatters: CliFormatters,
    pub user: Option<String>,
    /// Result of the last refresh for `user`.
    pub session: Option<SessionReport>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_manager(mode, config::default_manager()?, system_clock::clock_from_env())
    }

    pub fn with_manager(
        mode: CliMode,
        config_manager: ConfigManager,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let store = JsonLedgerStore::new(config.resolve_ledger_root(config_manager.base_dir()))?;
        let formatters = CliFormatters::from_config(&config);
        let user = config.last_user.clone();
        output::set_preferences(OutputPreferences {
            color: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        Ok(Self {
            mode,
            registry: CommandRegistry::from_entries(commands::all_definitions()),
            config_manager,
            config,
            store,
            clock,
            formatters,
            user,
            session: None,
            running: true,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// Saves the config and re-derives everything built from it.
    pub fn apply_config(&mut self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        self.formatters = CliFormatters::from_config(&self.config);
        output::set_preferences(OutputPreferences {
            color: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
        let root = self
            .config
            .resolve_ledger_root(self.config_manager.base_dir());
        if root.as_path() != self.store.ledger_root() {
            self.store = JsonLedgerStore::new(root)?;
            self.session = None;
        }
        Ok(())
    }

    /// Switches the active user and remembers it for the next start.
    pub fn switch_user(&mut self, user: &str) -> Result<(), CommandError> {
        self.user = Some(user.to_string());
        self.session = None;
        self.config.last_user = Some(user.to_string());
        self.config_manager.save(&self.config)?;
        Ok(())
    }
}
