use std::collections::HashMap;

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Suggestions further away than this are not worth showing.
const MAX_SUGGESTION_DISTANCE: usize = 3;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// Whether the active user's ledger is refreshed before the handler runs.
    pub refresh: bool,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            refresh: true,
        }
    }

    /// Marks a command that never touches ledger data.
    pub const fn standalone(mut self) -> Self {
        self.refresh = false;
        self
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CommandEntry>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(entry);
        }
        registry
    }

    /// Registers `entry`, replacing any command with the same name.
    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    /// Closest registered name by edit distance, first registered wins ties.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        CommandRegistry::from_entries([
            CommandEntry::new("summary", "", "", noop),
            CommandEntry::new("sync", "", "", noop),
            CommandEntry::new("help", "", "", noop).standalone(),
        ])
    }

    #[test]
    fn keeps_registration_order_and_flags() {
        let registry = registry();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["summary", "sync", "help"]);
        assert!(registry.get("sync").map(|entry| entry.refresh).unwrap_or(false));
        assert!(!registry.get("help").map(|entry| entry.refresh).unwrap_or(true));
    }

    #[test]
    fn suggests_close_names_only() {
        let registry = registry();
        assert_eq!(registry.suggest("sumary"), Some("summary"));
        assert_eq!(registry.suggest("HELP"), Some("help"));
        assert_eq!(registry.suggest("completely-different"), None);
    }
}
