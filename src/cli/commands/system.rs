use fintrack_domain::ledger::CURRENT_SCHEMA_VERSION;

use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help)
            .standalone(),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version).standalone(),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).standalone(),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(name) => match context.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
        None => help::print_overview(&context.registry),
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("fintrack {}", meta.version));
    output::field("Ledger schema", format!("v{CURRENT_SCHEMA_VERSION}"));
    output::field("Build", format!("{} ({})", meta.git_hash, meta.git_status));
    output::field("Built at", meta.timestamp);
    output::field("Target", meta.target);
    output::field("Profile", meta.profile);
    output::field("Rustc", meta.rustc);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
