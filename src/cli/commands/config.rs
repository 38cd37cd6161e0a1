use crate::cli::core::CommandResult;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::config::SETTING_KEYS;

use super::{invalid, split_subcommand, usage_error};

const USAGE: &str = "config show
config set <key> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        USAGE,
        cmd_config,
    )
    .standalone()]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return config_show(context);
    }
    let (sub, rest) = split_subcommand(args, USAGE)?;
    match sub.as_str() {
        "show" => config_show(context),
        "set" => config_set(context, rest),
        other => Err(invalid(format!("unknown config action `{other}`"))),
    }
}

fn config_show(context: &mut ShellContext) -> CommandResult {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        output::field(key, value);
    }
    output::field(
        "base directory",
        context.config_manager.base_dir().display(),
    );
    output::field(
        "config file",
        context.config_manager.config_path().display(),
    );
    Ok(())
}

fn config_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value @ ..] = args else {
        return Err(usage_error("config set <key> <value>"));
    };
    if value.is_empty() {
        return Err(usage_error("config set <key> <value>"));
    }
    let key = key.to_lowercase();
    if !SETTING_KEYS.contains(&key.as_str()) {
        output::hint(format!("Known keys: {}", SETTING_KEYS.join(", ")));
    }
    context.config.set(&key, &value.join(" "))?;
    context.apply_config()?;

    let shown = context
        .config
        .entries()
        .into_iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value)
        .unwrap_or_default();
    output::success(format!("Set {key} = {shown}."));
    Ok(())
}
