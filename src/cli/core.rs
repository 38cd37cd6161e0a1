//! Command dispatch, error reporting and session refresh for the shell.

use chrono::{DateTime, Utc};
use thiserror::Error;

use fintrack_config::ConfigError;
use fintrack_core::{CoreError, LedgerService, SessionReport, ValidationError};
use fintrack_domain::Ledger;

use crate::cli::output;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::errors::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single command. The shell reports it and keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No active user. Use `user <name>` first.")]
    NoActiveUser,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Core(CoreError::Validation(err))
    }
}

/// How much of a refresh report gets printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshNotice {
    /// Only newly materialized transactions.
    Quiet,
    /// Everything, including scheduler issues and rejected records.
    Full,
}

impl ShellContext {
    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some((handler, refresh)) = self
            .registry
            .get(command)
            .map(|entry| (entry.handler, entry.refresh))
        else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };

        if refresh && self.user.is_some() {
            self.refresh(RefreshNotice::Quiet)?;
        }

        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.suggest(input) {
            output::hint(format!("Did you mean `{best}`?"));
        }
    }

    pub fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NoActiveUser => {
                output::error(CommandError::NoActiveUser);
                output::hint("Try `user demo` to get started.");
            }
            other => output::error(other),
        }
        Ok(())
    }

    /// Runs the session flow for the active user: load, materialize due
    /// rules, apply the goal policy and reload.
    pub fn refresh(&mut self, notice: RefreshNotice) -> Result<&SessionReport, CommandError> {
        let user = self.user.clone().ok_or(CommandError::NoActiveUser)?;
        let report =
            LedgerService::refresh(&self.store, &user, self.now(), self.config.goal_funding)?;

        if report.materialized > 0 {
            output::success(format!(
                "Recorded {} recurring transaction(s).",
                report.materialized
            ));
        }
        if notice == RefreshNotice::Full {
            if report.duplicates_skipped > 0 {
                output::info(format!(
                    "{} occurrence(s) were already stored and skipped.",
                    report.duplicates_skipped
                ));
            }
            if report.recomputed_goals > 0 {
                output::info(format!(
                    "Recomputed {} savings goal total(s).",
                    report.recomputed_goals
                ));
            }
            for issue in &report.issues {
                output::warning(issue);
            }
            for rejected in &report.rejected {
                output::warning(format!(
                    "Ignored stored {} #{}: {}",
                    rejected.collection, rejected.position, rejected.error
                ));
            }
            for warning in &report.warnings {
                output::warning(warning);
            }
        }

        Ok(self.session.insert(report))
    }

    pub fn active_user(&self) -> Result<&str, CommandError> {
        self.user.as_deref().ok_or(CommandError::NoActiveUser)
    }

    /// Snapshot from the most recent refresh.
    pub fn ledger(&self) -> Result<&Ledger, CommandError> {
        self.session
            .as_ref()
            .map(|report| &report.ledger)
            .ok_or(CommandError::NoActiveUser)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Confirmation prompt in interactive mode; scripts always proceed.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => crate::cli::io::confirm_action(prompt, false),
        }
    }

    pub fn prompt(&self) -> String {
        match &self.user {
            Some(user) => format!("fintrack({user})> "),
            None => "fintrack> ".to_string(),
        }
    }
}
